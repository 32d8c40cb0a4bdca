//! Validation utilities.

use std::fmt::Write;

use revbot_config::{Config, DatabaseDriver, LlmDriver, QueueDriver};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Errors on environment variables:\n{}", errors)]
    EnvVarsError { errors: String },
}

fn validate_env_vars(config: &Config) -> Result<(), ValidationError> {
    #[inline]
    fn _missing(error: &mut String, name: &str) {
        error.push('\n');
        write!(error, "  - Missing env. var.: {}", name).unwrap();
    }

    let mut error = String::new();

    // Check server configuration
    if config.server.bind_ip.is_empty() {
        _missing(&mut error, "REVBOT_SERVER_BIND_IP");
    }
    if config.server.bind_port == 0 {
        _missing(&mut error, "REVBOT_SERVER_BIND_PORT");
    }
    if config.name.is_empty() {
        _missing(&mut error, "REVBOT_NAME");
    }
    if !config.server.disable_webhook_signature && config.server.webhook_secret.is_empty() {
        _missing(&mut error, "REVBOT_SERVER_WEBHOOK_SECRET");
    }

    // Check PG configuration
    if config.database.driver == DatabaseDriver::Postgres && config.database.pg.url.is_empty() {
        _missing(&mut error, "REVBOT_DATABASE_PG_URL");
    }

    // Check redis configuration
    if config.queue.driver == QueueDriver::Redis && config.queue.redis.address.is_empty() {
        _missing(&mut error, "REVBOT_QUEUE_REDIS_ADDRESS");
    }

    // Check LLM configuration
    if config.llm.driver == LlmDriver::Gemini && config.llm.gemini.api_key.is_empty() {
        _missing(&mut error, "REVBOT_LLM_GEMINI_API_KEY");
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::EnvVarsError { errors: error })
    }
}

/// Validate configuration.
pub fn validate_configuration(config: &Config) -> Result<(), ValidationError> {
    validate_env_vars(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_webhook_secret_is_an_error() {
        let mut config = Config::from_env_no_version();
        config.server.disable_webhook_signature = false;
        config.server.webhook_secret = String::new();

        let result = validate_env_vars(&config);
        assert!(matches!(
            result,
            Err(ValidationError::EnvVarsError { errors }) if errors.contains("REVBOT_SERVER_WEBHOOK_SECRET")
        ));
    }

    #[test]
    fn disabled_signature_does_not_require_a_secret() {
        let mut config = Config::from_env_no_version();
        config.database.driver = DatabaseDriver::Memory;
        config.llm.driver = LlmDriver::Null;
        config.server.disable_webhook_signature = true;
        config.server.webhook_secret = String::new();

        assert!(validate_env_vars(&config).is_ok());
    }

    #[test]
    fn gemini_driver_requires_an_api_key() {
        let mut config = Config::from_env_no_version();
        config.server.disable_webhook_signature = true;
        config.llm.driver = LlmDriver::Gemini;
        config.llm.gemini.api_key = String::new();

        let result = validate_env_vars(&config);
        assert!(matches!(
            result,
            Err(ValidationError::EnvVarsError { errors }) if errors.contains("REVBOT_LLM_GEMINI_API_KEY")
        ));
    }
}
