use std::{
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use clap::Parser;
use revbot_core::use_cases::retrieval::IndexFileChunksInterface;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Index a local checkout of a repository for context retrieval
#[derive(Parser)]
pub(crate) struct RepositoryIndexCommand {
    /// Repository path (e.g. `MyOrganization/my-project`)
    repository_path: String,
    /// Local directory containing the repository files
    directory: PathBuf,
}

#[async_trait]
impl Command for RepositoryIndexCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let repository = ctx
            .db_service
            .repositories_get_from_full_name_expect(&self.repository_path)
            .await?;

        // Re-indexing replaces the previous vectors.
        ctx.db_service
            .embedding_chunks_delete_for_repository(repository.id)
            .await?;

        let core_ctx = ctx.as_core_context();
        let indexer: &dyn IndexFileChunksInterface = core_ctx.core_module.resolve_ref();

        let mut files = Vec::new();
        collect_files(&self.directory, &mut files)?;
        files.sort();

        let mut total_chunks = 0;
        let mut indexed_files = 0;
        for path in files {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                // Binary or unreadable files are skipped.
                Err(_) => continue,
            };

            let relative_path = path
                .strip_prefix(&self.directory)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            total_chunks += indexer
                .run(&core_ctx, repository.id, &relative_path, &content)
                .await?;
            indexed_files += 1;
        }

        writeln!(
            ctx.writer.write().await,
            "Indexed {} chunk(s) from {} file(s) for repository '{}'.",
            total_chunks,
            indexed_files,
            repository.full_name
        )?;

        Ok(())
    }
}

fn collect_files(root: &Path, output: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().map(|name| name == ".git").unwrap_or(false) {
                continue;
            }
            collect_files(&path, output)?;
        } else {
            output.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use revbot_database_interface::DbService;
    use revbot_models::Repository;

    use crate::testutils::{test_command, CommandContextTest};

    fn temp_tree(files: &[(&str, &[u8])]) -> std::path::PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let root = std::env::temp_dir().join(format!(
            "revbot-index-test-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        for (name, content) in files {
            let path = root.join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        root
    }

    #[actix_rt::test]
    async fn index_skips_binary_files() {
        let mut ctx = CommandContextTest::new();
        ctx.config.retrieval.chunk_max_chars = 1024;
        ctx.db_service
            .repositories_create(Repository {
                full_name: "me/repo".into(),
                is_active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        ctx.llm_service
            .expect_embed_text()
            .times(1)
            .returning(|_, _| Ok(vec![1.0, 0.0]));

        let root = temp_tree(&[
            ("src/lib.rs", b"pub fn answer() -> u32 { 42 }\n".as_slice()),
            ("logo.bin", &[0xff_u8, 0xfe, 0x00][..]),
        ]);

        let output = test_command(
            ctx,
            &["repositories", "index", "me/repo", root.to_str().unwrap()],
        )
        .await;

        std::fs::remove_dir_all(&root).unwrap();
        assert_eq!(
            output,
            "Indexed 1 chunk(s) from 1 file(s) for repository 'me/repo'.\n"
        );
    }

    #[actix_rt::test]
    async fn index_replaces_previous_chunks() {
        let mut ctx = CommandContextTest::new();
        ctx.config.retrieval.chunk_max_chars = 1024;
        let repository = ctx
            .db_service
            .repositories_create(Repository {
                full_name: "me/repo".into(),
                is_active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        ctx.db_service
            .embedding_chunks_create(revbot_models::EmbeddingChunk {
                repository_id: repository.id,
                file_path: "stale.rs".into(),
                content: "old".into(),
                embedding: vec![0.0, 1.0],
                ..Default::default()
            })
            .await
            .unwrap();
        ctx.llm_service
            .expect_embed_text()
            .returning(|_, _| Ok(vec![1.0, 0.0]));

        let root = temp_tree(&[("README.md", b"Hello.\n".as_slice())]);
        let output = test_command(
            ctx,
            &["repositories", "index", "me/repo", root.to_str().unwrap()],
        )
        .await;

        std::fs::remove_dir_all(&root).unwrap();
        assert_eq!(
            output,
            "Indexed 1 chunk(s) from 1 file(s) for repository 'me/repo'.\n"
        );
    }
}
