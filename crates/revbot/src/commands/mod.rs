//! Commands.

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use clap::Subcommand;
use revbot_config::Config;
use revbot_core::{CoreContext, CoreModule};
use revbot_database_interface::DbService;
use revbot_ghapi_interface::ApiService;
use revbot_llm_interface::LlmService;
use revbot_queue_interface::QueueService;
use tokio::sync::RwLock;

use self::{repository::RepositoryCommand, server::ServerCommand, worker::WorkerCommand};
use crate::Result;

mod repository;
mod server;
mod worker;

pub(crate) struct CommandContext {
    pub config: Config,
    pub db_service: Box<dyn DbService>,
    pub api_service: Box<dyn ApiService>,
    pub queue_service: Box<dyn QueueService>,
    pub llm_service: Box<dyn LlmService>,
    pub core_module: CoreModule,
    pub writer: Arc<RwLock<dyn Write + Send + Sync>>,
}

impl CommandContext {
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            api_service: self.api_service.as_ref(),
            db_service: self.db_service.as_ref(),
            queue_service: self.queue_service.as_ref(),
            llm_service: self.llm_service.as_ref(),
        }
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: CommandContext) -> Result<()>;
}

/// Command
#[derive(Subcommand)]
pub(crate) enum SubCommand {
    Server(ServerCommand),
    Worker(WorkerCommand),
    Repositories(RepositoryCommand),
}

#[async_trait]
impl Command for SubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::Server(sub) => sub.execute(ctx).await,
            Self::Worker(sub) => sub.execute(ctx).await,
            Self::Repositories(sub) => sub.execute(ctx).await,
        }
    }
}
