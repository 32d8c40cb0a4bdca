//! Server module.

use std::collections::HashMap;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error,
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use revbot_config::Config;
use revbot_core::{CoreContext, CoreModule};
use revbot_database_interface::DbService;
use revbot_database_pg::{DbPool, PostgresDb};
use revbot_ghapi_interface::ApiService;
use revbot_llm_interface::LlmService;
use revbot_models::QueueLane;
use revbot_queue_interface::{LaneConfig, QueueService};
use sentry_actix::Sentry;
use tracing::info;

use crate::{
    ghapi::MetricsApiService, health::health_check_route, llm::MetricsLlmService,
    metrics::build_metrics_handler, middlewares::VerifySignature, queue::MetricsQueueService,
    webhook::configure_webhook_handlers, Result, ServerError,
};

/// Per-lane queue configuration out of the tuning sections.
pub fn lane_configs(config: &Config) -> HashMap<QueueLane, LaneConfig> {
    HashMap::from([
        (
            QueueLane::Free,
            LaneConfig {
                max_attempts: config.queue.free_lane.max_attempts,
                backoff_base_delay: config.queue.free_lane.backoff_base_delay,
                keep_completed: config.queue.free_lane.keep_completed,
                keep_failed: config.queue.free_lane.keep_failed,
            },
        ),
        (
            QueueLane::Pro,
            LaneConfig {
                max_attempts: config.queue.pro_lane.max_attempts,
                backoff_base_delay: config.queue.pro_lane.backoff_base_delay,
                keep_completed: config.queue.pro_lane.keep_completed,
                keep_failed: config.queue.pro_lane.keep_failed,
            },
        ),
    ])
}

/// App context.
pub struct AppContext {
    /// Config.
    pub config: Config,
    /// Core module.
    pub core_module: CoreModule,
    /// Database adapter.
    pub db_service: Box<dyn DbService>,
    /// API adapter.
    pub api_service: Box<dyn ApiService>,
    /// Queue adapter.
    pub queue_service: Box<dyn QueueService>,
    /// LLM adapter.
    pub llm_service: Box<dyn LlmService>,
}

impl AppContext {
    /// Create new app context.
    pub fn new(config: Config, core_module: CoreModule, pool: DbPool) -> Result<Self> {
        Ok(Self {
            core_module,
            db_service: Box::new(PostgresDb::new(pool)),
            api_service: Box::new(
                MetricsApiService::new(config.clone())
                    .map_err(|e| ServerError::ApiError { source: e })?,
            ),
            queue_service: Box::new(MetricsQueueService::new(
                &config.queue.redis.address,
                lane_configs(&config),
            )),
            llm_service: Box::new(
                MetricsLlmService::new(config.clone())
                    .map_err(|e| ServerError::LlmError { source: e })?,
            ),
            config,
        })
    }

    /// Create new app context using adapters.
    pub fn new_with_adapters(
        config: Config,
        core_module: CoreModule,
        db_service: Box<dyn DbService>,
        api_service: Box<dyn ApiService>,
        queue_service: Box<dyn QueueService>,
        llm_service: Box<dyn LlmService>,
    ) -> Self {
        Self {
            config,
            core_module,
            db_service,
            api_service,
            queue_service,
            llm_service,
        }
    }

    /// Convert the context for the core module.
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

/// Build Actix app.
pub fn build_actix_app(
    context: Data<AppContext>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let prometheus = build_metrics_handler();

    App::new()
        .app_data(context.clone())
        .wrap(prometheus.clone())
        .wrap(Sentry::new())
        .wrap(Logger::default())
        .service(
            web::scope("/webhooks")
                .wrap(VerifySignature::new(&context.config))
                .configure(configure_webhook_handlers),
        )
        .route("/health", web::get().to(health_check_route))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({"message": "Welcome on revbot!" }))
            }),
        )
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            // Display Bad Request response on invalid JSON data
            error::InternalError::from_response(
                "",
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": err.to_string()
                })),
            )
            .into()
        }))
}

/// Run bot server.
pub async fn run_bot_server(context: AppContext) -> Result<()> {
    let address = get_bind_address(&context.config);

    info!(
        version = context.config.version,
        address = %address,
        message = "Starting bot server",
    );

    run_bot_server_internal(address, context).await
}

fn get_bind_address(config: &Config) -> String {
    format!("{}:{}", config.server.bind_ip, config.server.bind_port)
}

async fn run_bot_server_internal(ip_with_port: String, context: AppContext) -> Result<()> {
    let context = Data::new(context);
    let cloned_context = context.clone();

    let mut server = HttpServer::new(move || build_actix_app(context.clone()));

    if let Some(workers) = cloned_context.config.server.workers_count {
        server = server.workers(workers as usize);
    }

    server
        .bind(ip_with_port)
        .map_err(|e| ServerError::IoError { source: e })?
        .run()
        .await
        .map_err(|e| ServerError::IoError { source: e })
}
