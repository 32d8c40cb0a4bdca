use revbot_config::Config;
use revbot_database_interface::DbService;
use revbot_ghapi_interface::ApiService;
use revbot_llm_interface::LlmService;
use revbot_queue_interface::QueueService;

use crate::CoreModule;

pub struct CoreContext<'a> {
    pub config: &'a Config,
    pub core_module: &'a CoreModule,
    pub api_service: &'a (dyn ApiService + 'a),
    pub db_service: &'a (dyn DbService + 'a),
    pub queue_service: &'a (dyn QueueService + 'a),
    pub llm_service: &'a (dyn LlmService + 'a),
}

#[cfg(any(test, feature = "testkit"))]
pub(crate) mod tests {
    use revbot_config::Config;
    use revbot_database_memory::MemoryDb;
    use revbot_ghapi_interface::MockApiService;
    use revbot_llm_interface::MockLlmService;
    use revbot_queue_memory::MemoryQueue;

    use crate::{CoreContext, CoreModule};

    #[allow(dead_code)]
    pub struct CoreContextTest {
        pub config: Config,
        pub core_module: CoreModule,
        pub api_service: MockApiService,
        pub db_service: MemoryDb,
        pub queue_service: MemoryQueue,
        pub llm_service: MockLlmService,
    }

    impl CoreContextTest {
        #[allow(dead_code)]
        pub fn new() -> Self {
            Self {
                config: Config::from_env_no_version(),
                core_module: CoreModule::builder().build(),
                api_service: MockApiService::new(),
                db_service: MemoryDb::new(),
                queue_service: MemoryQueue::default(),
                llm_service: MockLlmService::new(),
            }
        }

        #[allow(dead_code)]
        pub fn as_context(&self) -> CoreContext {
            CoreContext {
                config: &self.config,
                core_module: &self.core_module,
                api_service: &self.api_service,
                db_service: &self.db_service,
                queue_service: &self.queue_service,
                llm_service: &self.llm_service,
            }
        }
    }
}
