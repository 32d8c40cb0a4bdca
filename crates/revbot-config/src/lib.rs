//! Config module.

mod drivers;

use std::{env, str::FromStr};

pub use drivers::{ApiDriver, DatabaseDriver, DriverError, LlmDriver, QueueDriver};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database driver.
    pub driver: DatabaseDriver,
    /// Postgres options.
    pub pg: DatabasePgConfig,
}

#[derive(Debug, Clone)]
pub struct DatabasePgConfig {
    /// Database URL.
    pub url: String,
    /// Database pool size.
    pub pool_size: u32,
    /// Database connection timeout (in seconds)
    pub connection_timeout: u32,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API driver.
    pub driver: ApiDriver,
    /// GitHub options.
    pub github: ApiGitHubConfig,
}

#[derive(Debug, Clone)]
pub struct ApiGitHubConfig {
    /// GitHub API connect timeout (in milliseconds).
    pub connect_timeout: u64,
    /// GitHub API request timeout (in milliseconds).
    pub request_timeout: u64,
    /// GitHub API root URL.
    pub root_url: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// LLM driver.
    pub driver: LlmDriver,
    /// Gemini options.
    pub gemini: LlmGeminiConfig,
}

#[derive(Debug, Clone)]
pub struct LlmGeminiConfig {
    /// Gemini API root URL.
    pub root_url: String,
    /// Gemini API key.
    pub api_key: String,
    /// Model used for basic reviews.
    pub basic_model: String,
    /// Model used for full reviews.
    pub full_model: String,
    /// Model used for embeddings.
    pub embedding_model: String,
    /// Request timeout (in milliseconds).
    pub request_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Queue driver.
    pub driver: QueueDriver,
    /// Redis options.
    pub redis: QueueRedisConfig,
    /// Free lane options.
    pub free_lane: LaneTuning,
    /// Pro lane options.
    pub pro_lane: LaneTuning,
}

#[derive(Debug, Clone)]
pub struct QueueRedisConfig {
    /// Redis address.
    pub address: String,
}

/// Per-lane queue and worker tuning.
#[derive(Debug, Clone)]
pub struct LaneTuning {
    /// Delivery attempts before a job is parked as failed.
    pub max_attempts: u32,
    /// Exponential backoff base delay (in milliseconds).
    pub backoff_base_delay: u64,
    /// Completed job records kept per lane.
    pub keep_completed: usize,
    /// Failed job records kept per lane.
    pub keep_failed: usize,
    /// Worker pool concurrency.
    pub concurrency: usize,
    /// Idle delay before polling an empty lane again (in milliseconds).
    pub drain_delay: u64,
}

#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry URL.
    pub url: String,
    /// Traces sample rate (between 0 and 1) for Sentry
    pub traces_sample_rate: f32,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Use bunyan logging.
    pub use_bunyan: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind IP.
    pub bind_ip: String,
    /// Server bind port.
    pub bind_port: u16,
    /// Server workers count.
    pub workers_count: Option<u16>,
    /// Server webhook secret.
    pub webhook_secret: String,
    /// Disable webhook signature verification.
    pub disable_webhook_signature: bool,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Character budget per embedding chunk.
    pub chunk_max_chars: usize,
    /// Chunks returned by a similarity search.
    pub top_k: usize,
    /// Embedding vector dimensions.
    pub embedding_dimensions: usize,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot name.
    pub name: String,
    /// Database options.
    pub database: DatabaseConfig,
    /// API options.
    pub api: ApiConfig,
    /// LLM options.
    pub llm: LlmConfig,
    /// Queue options.
    pub queue: QueueConfig,
    /// Retrieval options.
    pub retrieval: RetrievalConfig,
    /// Logging options.
    pub logging: LoggingConfig,
    /// Sentry options.
    pub sentry: SentryConfig,
    /// Server options.
    pub server: ServerConfig,
    /// App version
    pub version: String,
}

impl Config {
    /// Create configuration from environment.
    pub fn from_env(version: String) -> Config {
        Config {
            name: env_to_str("REVBOT_NAME", "revbot"),
            database: DatabaseConfig {
                driver: DatabaseDriver::from_str(&env_to_str("REVBOT_DATABASE_DRIVER", "pg"))
                    .unwrap(),
                pg: DatabasePgConfig {
                    url: env_to_str("REVBOT_DATABASE_PG_URL", ""),
                    pool_size: env_to_u32("REVBOT_DATABASE_PG_POOL_SIZE", 20),
                    connection_timeout: env_to_u32("REVBOT_DATABASE_PG_CONNECTION_TIMEOUT", 5),
                },
            },
            api: ApiConfig {
                driver: ApiDriver::from_str(&env_to_str("REVBOT_API_DRIVER", "github")).unwrap(),
                github: ApiGitHubConfig {
                    connect_timeout: env_to_u64("REVBOT_API_GITHUB_CONNECT_TIMEOUT", 5000),
                    request_timeout: env_to_u64("REVBOT_API_GITHUB_REQUEST_TIMEOUT", 30000),
                    root_url: env_to_str("REVBOT_API_GITHUB_ROOT_URL", "https://api.github.com"),
                },
            },
            llm: LlmConfig {
                driver: LlmDriver::from_str(&env_to_str("REVBOT_LLM_DRIVER", "gemini")).unwrap(),
                gemini: LlmGeminiConfig {
                    root_url: env_to_str(
                        "REVBOT_LLM_GEMINI_ROOT_URL",
                        "https://generativelanguage.googleapis.com/v1beta",
                    ),
                    api_key: env_to_str("REVBOT_LLM_GEMINI_API_KEY", ""),
                    basic_model: env_to_str(
                        "REVBOT_LLM_GEMINI_BASIC_MODEL",
                        "gemini-2.0-flash-lite",
                    ),
                    full_model: env_to_str("REVBOT_LLM_GEMINI_FULL_MODEL", "gemini-2.0-flash"),
                    embedding_model: env_to_str(
                        "REVBOT_LLM_GEMINI_EMBEDDING_MODEL",
                        "gemini-embedding-001",
                    ),
                    request_timeout: env_to_u64("REVBOT_LLM_GEMINI_REQUEST_TIMEOUT", 60000),
                },
            },
            queue: QueueConfig {
                driver: QueueDriver::from_str(&env_to_str("REVBOT_QUEUE_DRIVER", "redis")).unwrap(),
                redis: QueueRedisConfig {
                    address: env_to_str("REVBOT_QUEUE_REDIS_ADDRESS", "redis://localhost"),
                },
                // 30s backoff base: faster retries hammer the LLM rate limits.
                free_lane: LaneTuning {
                    max_attempts: env_to_u32("REVBOT_QUEUE_FREE_MAX_ATTEMPTS", 2),
                    backoff_base_delay: env_to_u64("REVBOT_QUEUE_FREE_BACKOFF_BASE_DELAY", 30_000),
                    keep_completed: env_to_usize("REVBOT_QUEUE_FREE_KEEP_COMPLETED", 50),
                    keep_failed: env_to_usize("REVBOT_QUEUE_FREE_KEEP_FAILED", 20),
                    concurrency: env_to_usize("REVBOT_QUEUE_FREE_CONCURRENCY", 2),
                    drain_delay: env_to_u64("REVBOT_QUEUE_FREE_DRAIN_DELAY", 5000),
                },
                // Longer base delay on the pro lane: a full review makes more
                // external calls per job, so retries are spaced further apart.
                pro_lane: LaneTuning {
                    max_attempts: env_to_u32("REVBOT_QUEUE_PRO_MAX_ATTEMPTS", 2),
                    backoff_base_delay: env_to_u64("REVBOT_QUEUE_PRO_BACKOFF_BASE_DELAY", 60_000),
                    keep_completed: env_to_usize("REVBOT_QUEUE_PRO_KEEP_COMPLETED", 100),
                    keep_failed: env_to_usize("REVBOT_QUEUE_PRO_KEEP_FAILED", 50),
                    concurrency: env_to_usize("REVBOT_QUEUE_PRO_CONCURRENCY", 5),
                    drain_delay: env_to_u64("REVBOT_QUEUE_PRO_DRAIN_DELAY", 5000),
                },
            },
            retrieval: RetrievalConfig {
                chunk_max_chars: env_to_usize("REVBOT_RETRIEVAL_CHUNK_MAX_CHARS", 1000),
                top_k: env_to_usize("REVBOT_RETRIEVAL_TOP_K", 5),
                embedding_dimensions: env_to_usize("REVBOT_RETRIEVAL_EMBEDDING_DIMENSIONS", 768),
            },
            logging: LoggingConfig {
                use_bunyan: env_to_bool("REVBOT_LOGGING_USE_BUNYAN", false),
            },
            sentry: SentryConfig {
                url: env_to_str("REVBOT_SENTRY_URL", ""),
                traces_sample_rate: env_to_f32("REVBOT_SENTRY_TRACES_SAMPLE_RATE", 0.0),
            },
            server: ServerConfig {
                bind_ip: env_to_str("REVBOT_SERVER_BIND_IP", "127.0.0.1"),
                bind_port: env_to_u16("REVBOT_SERVER_BIND_PORT", 8008),
                workers_count: env_to_optional_u16("REVBOT_SERVER_WORKERS_COUNT", None),
                webhook_secret: env_to_str("REVBOT_SERVER_WEBHOOK_SECRET", ""),
                disable_webhook_signature: env_to_bool(
                    "REVBOT_SERVER_DISABLE_WEBHOOK_SIGNATURE",
                    false,
                ),
            },
            version,
        }
    }

    pub fn from_env_no_version() -> Self {
        Self::from_env("0.0.0".into())
    }
}

fn env_to_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_optional_u16(name: &str, default: Option<u16>) -> Option<u16> {
    env::var(name)
        .map(|e| e.parse::<u16>().map(Some).unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_bool(name: &str, default: bool) -> bool {
    env::var(name).map(|e| !e.is_empty()).unwrap_or(default)
}

fn env_to_str(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_e| default.to_string())
        .replace("\\n", "\n")
}
