use async_trait::async_trait;
use shaku::{Component, Interface};

use crate::{CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait RetrieveSimilarChunksInterface: Interface {
    /// Formats the chunks nearest to the query as fenced context blocks.
    ///
    /// Returns an empty string when the repository has no indexed chunks.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        query: &str,
    ) -> Result<String>;
}

#[derive(Component)]
#[shaku(interface = RetrieveSimilarChunksInterface)]
pub(crate) struct RetrieveSimilarChunks;

#[async_trait]
impl RetrieveSimilarChunksInterface for RetrieveSimilarChunks {
    #[tracing::instrument(skip(self, ctx, query), fields(repository_id))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository_id: u64,
        query: &str,
    ) -> Result<String> {
        let embedding = ctx
            .llm_service
            .embed_text(&ctx.config.llm.gemini.embedding_model, query)
            .await?;

        let chunks = ctx
            .db_service
            .embedding_chunks_search(repository_id, &embedding, ctx.config.retrieval.top_k)
            .await?;

        let mut context = String::new();
        for chunk in chunks {
            context.push_str(&format!(
                "File: {}\n```\n{}\n```\n\n",
                chunk.file_path, chunk.content
            ));
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_database_interface::DbService;
    use revbot_models::EmbeddingChunk;

    use super::*;
    use crate::context::tests::CoreContextTest;

    #[tokio::test]
    async fn nearest_chunks_are_formatted_in_distance_order() {
        let mut ctx = CoreContextTest::new();
        ctx.llm_service
            .expect_embed_text()
            .once()
            .returning(|_, _| Ok(vec![1.0, 0.0]));

        for (file_path, embedding) in [
            ("src/far.rs", vec![0.0, 1.0]),
            ("src/near.rs", vec![1.0, 0.1]),
        ] {
            ctx.db_service
                .embedding_chunks_create(EmbeddingChunk {
                    repository_id: 1,
                    file_path: file_path.into(),
                    content: "fn code() {}".into(),
                    embedding,
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let context = RetrieveSimilarChunks
            .run(&ctx.as_context(), 1, "query")
            .await
            .unwrap();

        let near = context.find("src/near.rs").unwrap();
        let far = context.find("src/far.rs").unwrap();
        assert!(near < far);
        assert!(context.contains("```\nfn code() {}\n```"));
    }

    #[tokio::test]
    async fn empty_index_yields_an_empty_context() {
        let mut ctx = CoreContextTest::new();
        ctx.llm_service
            .expect_embed_text()
            .once()
            .returning(|_, _| Ok(vec![1.0, 0.0]));

        let context = RetrieveSimilarChunks
            .run(&ctx.as_context(), 1, "query")
            .await
            .unwrap();

        assert_eq!(context, "");
    }
}
