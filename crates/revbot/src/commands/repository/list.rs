use std::io::Write;

use async_trait::async_trait;
use clap::Parser;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// List known repositories
#[derive(Parser)]
pub(crate) struct RepositoryListCommand;

#[async_trait]
impl Command for RepositoryListCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let repos = ctx.db_service.repositories_all().await?;
        if repos.is_empty() {
            writeln!(ctx.writer.write().await, "No repository known.")?;
        } else {
            for repo in repos {
                let state = if repo.is_active { "active" } else { "inactive" };
                writeln!(ctx.writer.write().await, "- {} ({})", repo.full_name, state)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use revbot_database_interface::DbService;
    use revbot_models::Repository;

    use crate::testutils::{test_command, CommandContextTest};

    #[actix_rt::test]
    async fn list_no_repositories() {
        let ctx = CommandContextTest::new();

        assert_eq!(
            test_command(ctx, &["repositories", "list"]).await,
            "No repository known.\n"
        );
    }

    #[actix_rt::test]
    async fn list_repositories() {
        let ctx = CommandContextTest::new();
        ctx.db_service
            .repositories_create(Repository {
                full_name: "me/repo".into(),
                is_active: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            test_command(ctx, &["repositories", "list"]).await,
            "- me/repo (active)\n"
        );
    }
}
