use std::{io::Write, sync::Arc};

use clap::Parser;
use revbot_config::Config;
use revbot_core::CoreModule;
use revbot_database_memory::MemoryDb;
use revbot_ghapi_interface::MockApiService;
use revbot_llm_interface::MockLlmService;
use revbot_queue_memory::MemoryQueue;
use revbot_server::server::lane_configs;
use tokio::sync::RwLock;

use crate::{
    args::{Args, CommandExecutor},
    commands::CommandContext,
};

pub(crate) struct CommandContextTest {
    pub config: Config,
    pub core_module: CoreModule,
    pub api_service: MockApiService,
    pub db_service: MemoryDb,
    pub queue_service: MemoryQueue,
    pub llm_service: MockLlmService,
}

impl CommandContextTest {
    pub fn new() -> Self {
        let config = Config::from_env_no_version();
        let queue_service = MemoryQueue::new(lane_configs(&config));

        Self {
            config,
            core_module: CoreModule::builder().build(),
            db_service: MemoryDb::new(),
            api_service: MockApiService::new(),
            queue_service,
            llm_service: MockLlmService::new(),
        }
    }

    pub fn into_context(self, writer: Arc<RwLock<dyn Write + Send + Sync>>) -> CommandContext {
        CommandContext {
            config: self.config,
            core_module: self.core_module,
            db_service: Box::new(self.db_service),
            api_service: Box::new(self.api_service),
            queue_service: Box::new(self.queue_service),
            llm_service: Box::new(self.llm_service),
            writer,
        }
    }
}

pub(crate) async fn test_command(ctx: CommandContextTest, command_args: &[&str]) -> String {
    let buf = Arc::new(RwLock::new(Vec::new()));

    {
        let command_args = {
            let mut tmp_args = vec!["bot"];
            tmp_args.extend(command_args);
            tmp_args
        };

        let args = Args::try_parse_from(command_args);
        match args {
            Ok(args) => CommandExecutor::parse_args_async(args, ctx.into_context(buf.clone()))
                .await
                .unwrap(),
            Err(e) => {
                eprintln!("{}", e);
                panic!("Parse error.")
            }
        }
    }

    let vec = buf.read().await.to_vec();
    std::str::from_utf8(&vec).unwrap().to_string()
}
