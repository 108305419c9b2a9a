//! HTTP client construction
//!
//! Creates the client used to fetch community pages.

use reqwest::{Client, Proxy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Optional proxy URL (http, https or socks5h)
    pub proxy: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Fixed user agent; a browser one is picked at random when unset
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

/// Errors from fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Received a status code of {0}")]
    Status(u16),
}

/// Desktop browser user agents. Community pages are only fully rendered
/// for browsers; other agents get a stripped page with no post containers.
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Pick one of [`BROWSER_USER_AGENTS`]
pub fn random_user_agent() -> &'static str {
    use rand::seq::SliceRandom;
    BROWSER_USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(BROWSER_USER_AGENTS[0])
}

/// The agent a client built from `config` will send
pub fn user_agent_for(config: &HttpConfig) -> &str {
    config.user_agent.as_deref().unwrap_or_else(|| random_user_agent())
}

/// Create an HTTP client for page fetches
pub fn create_client(config: &HttpConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(user_agent_for(config));

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy).map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert!(config.proxy.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_random_user_agent() {
        let ua = random_user_agent();
        assert!(BROWSER_USER_AGENTS.contains(&ua));
    }

    #[test]
    fn test_configured_user_agent_wins() {
        let config = HttpConfig {
            user_agent: Some("community-relay/0.1".to_string()),
            ..Default::default()
        };
        assert_eq!(user_agent_for(&config), "community-relay/0.1");
        assert!(create_client(&config).is_ok());

        assert!(BROWSER_USER_AGENTS.contains(&user_agent_for(&HttpConfig::default())));
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(FetchError::Status(503).to_string(), "Received a status code of 503");
    }
}
