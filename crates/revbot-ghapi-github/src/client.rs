//! Client utilities.

use std::time::Duration;

use http::{header, HeaderMap};
use reqwest::ClientBuilder;
use revbot_config::Config;

/// Get a GitHub client builder with bounded timeouts.
pub fn get_client_builder(config: &Config) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/vnd.github+json"),
    );

    ClientBuilder::new()
        .connect_timeout(Duration::from_millis(config.api.github.connect_timeout))
        .timeout(Duration::from_millis(config.api.github.request_timeout))
        .user_agent(format!("revbot/{}", config.version))
        .default_headers(headers)
}

/// Build a GitHub URL.
pub fn build_github_url<T: Into<String>>(config: &Config, path: T) -> String {
    format!("{}{}", config.api.github.root_url, path.into())
}
