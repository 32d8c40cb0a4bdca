use std::sync::Arc;

use clap::Parser;
use revbot_config::{ApiDriver, Config, DatabaseDriver, LlmDriver, QueueDriver};
use revbot_core::CoreModule;
use revbot_database_interface::DbService;
use revbot_database_memory::MemoryDb;
use revbot_database_pg::{establish_pool_connection, run_migrations, PostgresDb};
use revbot_ghapi_interface::ApiService;
use revbot_ghapi_null::NullApiService;
use revbot_llm_interface::LlmService;
use revbot_llm_null::NullLlmService;
use revbot_queue_interface::QueueService;
use revbot_queue_memory::MemoryQueue;
use revbot_sentry::with_sentry_configuration;
use revbot_server::{
    ghapi::MetricsApiService, llm::MetricsLlmService, queue::MetricsQueueService,
    server::lane_configs,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    commands::{Command, CommandContext, SubCommand},
    Result,
};

#[derive(Parser)]
#[command(about = None, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    cmd: SubCommand,
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn parse_args(config: Config, args: Args) -> Result<()> {
        let sync = |config: Config, args: Args| async move {
            let core_module = CoreModule::builder().build();
            let db_service: Box<dyn DbService> = {
                if config.database.driver == DatabaseDriver::Postgres {
                    info!("Using PostgresDb database driver");

                    let pool = establish_pool_connection(&config).await?;
                    run_migrations(&pool).await?;

                    Box::new(PostgresDb::new(pool))
                } else {
                    info!("Using MemoryDb database driver");
                    Box::new(MemoryDb::new())
                }
            };

            let api_service: Box<dyn ApiService> = {
                if config.api.driver == ApiDriver::GitHub {
                    info!("Using MetricsApiService API driver");
                    Box::new(MetricsApiService::new(config.clone())?)
                } else {
                    info!("Using NullApiService API driver");
                    Box::new(NullApiService::new())
                }
            };

            let queue_service: Box<dyn QueueService> = {
                if config.queue.driver == QueueDriver::Redis {
                    info!("Using MetricsQueueService queue driver");
                    Box::new(MetricsQueueService::new(
                        &config.queue.redis.address,
                        lane_configs(&config),
                    ))
                } else {
                    info!("Using MemoryQueue queue driver");
                    Box::new(MemoryQueue::new(lane_configs(&config)))
                }
            };

            let llm_service: Box<dyn LlmService> = {
                if config.llm.driver == LlmDriver::Gemini {
                    info!("Using MetricsLlmService LLM driver");
                    Box::new(MetricsLlmService::new(config.clone())?)
                } else {
                    info!("Using NullLlmService LLM driver");
                    Box::new(NullLlmService::new())
                }
            };

            let ctx = CommandContext {
                config: config.clone(),
                db_service,
                api_service,
                queue_service,
                llm_service,
                core_module,
                writer: Arc::new(RwLock::new(std::io::stdout())),
            };

            with_sentry_configuration(&config.clone(), || async {
                Self::parse_args_async(args, ctx).await
            })
            .await
        };

        actix_rt::System::with_tokio_rt(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
        })
        .block_on(sync(config, args))?;

        Ok(())
    }

    pub(crate) async fn parse_args_async(args: Args, ctx: CommandContext) -> Result<()> {
        args.cmd.execute(ctx).await
    }
}
