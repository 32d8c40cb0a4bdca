use async_trait::async_trait;
use revbot_models::EmbeddingChunk;
use shaku::{Component, Interface};

use super::chunking::split_into_chunks;
use crate::{CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait IndexFileChunksInterface: Interface {
    /// Chunks one file, embeds each chunk and stores the vectors.
    ///
    /// Returns the number of stored chunks.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        file_path: &str,
        content: &str,
    ) -> Result<usize>;
}

#[derive(Component)]
#[shaku(interface = IndexFileChunksInterface)]
pub(crate) struct IndexFileChunks;

#[async_trait]
impl IndexFileChunksInterface for IndexFileChunks {
    #[tracing::instrument(skip(self, ctx, content), fields(repository_id, file_path), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        file_path: &str,
        content: &str,
    ) -> Result<usize> {
        let chunks = split_into_chunks(content, ctx.config.retrieval.chunk_max_chars);
        let count = chunks.len();

        for chunk in chunks {
            let embedding = ctx
                .llm_service
                .embed_text(&ctx.config.llm.gemini.embedding_model, &chunk)
                .await?;

            ctx.db_service
                .embedding_chunks_create(EmbeddingChunk {
                    repository_id,
                    file_path: file_path.into(),
                    content: chunk,
                    embedding,
                    ..Default::default()
                })
                .await?;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_database_interface::DbService;

    use super::*;
    use crate::context::tests::CoreContextTest;

    #[tokio::test]
    async fn each_chunk_is_embedded_and_stored() {
        let mut ctx = CoreContextTest::new();
        ctx.config.retrieval.chunk_max_chars = 16;
        ctx.llm_service
            .expect_embed_text()
            .times(2)
            .returning(|_, _| Ok(vec![1.0, 0.0]));

        let count = IndexFileChunks
            .run(
                &ctx.as_context(),
                1,
                "src/lib.rs",
                "first line here\nsecond line here",
            )
            .await
            .unwrap();

        assert_eq!(count, 2);

        let stored = ctx
            .db_service
            .embedding_chunks_search(1, &[1.0, 0.0], 10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].file_path, "src/lib.rs");
    }

    #[tokio::test]
    async fn empty_file_stores_nothing() {
        let mut ctx = CoreContextTest::new();
        ctx.llm_service.expect_embed_text().never();

        let count = IndexFileChunks
            .run(&ctx.as_context(), 1, "src/lib.rs", "")
            .await
            .unwrap();

        assert_eq!(count, 0);
    }
}
