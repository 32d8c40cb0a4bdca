use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use revbot_worker::{run_worker_pools, WorkerContext};

use super::{Command, CommandContext};
use crate::Result;

/// Start worker pools
#[derive(Parser)]
pub(crate) struct WorkerCommand;

#[async_trait]
impl Command for WorkerCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let worker_context = Arc::new(WorkerContext {
            config: ctx.config,
            core_module: ctx.core_module,
            db_service: Arc::from(ctx.db_service),
            api_service: Arc::from(ctx.api_service),
            queue_service: Arc::from(ctx.queue_service),
            llm_service: Arc::from(ctx.llm_service),
        });

        run_worker_pools(worker_context).await;

        Ok(())
    }
}
