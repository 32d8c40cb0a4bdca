//! Repository commands.

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use self::{index::RepositoryIndexCommand, list::RepositoryListCommand};
use super::{Command, CommandContext};
use crate::Result;

mod index;
mod list;

/// Manage repositories
#[derive(Parser)]
pub(crate) struct RepositoryCommand {
    #[clap(subcommand)]
    inner: RepositorySubCommand,
}

#[async_trait]
impl Command for RepositoryCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        self.inner.execute(ctx).await
    }
}

#[derive(Subcommand)]
pub(crate) enum RepositorySubCommand {
    List(RepositoryListCommand),
    Index(RepositoryIndexCommand),
}

#[async_trait]
impl Command for RepositorySubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::List(sub) => sub.execute(ctx).await,
            Self::Index(sub) => sub.execute(ctx).await,
        }
    }
}
