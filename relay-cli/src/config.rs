//! Relay configuration file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use relay_core::{CommunityKey, DEFAULT_BASE_URL, DEFAULT_STORE_PATH};
use relay_runtime::{DEFAULT_DELIVERY_DELAY, DEFAULT_POLL_INTERVAL};
use relay_scrape::{ExtractConfig, HttpConfig, MalformedPostPolicy, ScanConfig};

/// Settings read from `config.json`
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Webhook endpoint posts are delivered to
    pub webhook: String,
    pub community: String,
    #[serde(default)]
    pub stream: Option<String>,
    /// Image used for posts without one
    pub default_banner: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_known_posts")]
    pub known_posts: PathBuf,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_delivery_delay_ms")]
    pub delivery_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub on_malformed_post: MalformedPostPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_known_posts() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_delivery_delay_ms() -> u64 {
    DEFAULT_DELIVERY_DELAY.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    HttpConfig::default().timeout_secs
}

impl RelayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.webhook.is_empty(), "webhook must not be empty");
        anyhow::ensure!(!self.community.is_empty(), "community must not be empty");
        anyhow::ensure!(self.poll_interval_secs > 0, "poll_interval_secs must be positive");
        Ok(())
    }

    pub fn community_key(&self) -> CommunityKey {
        CommunityKey::new(&self.community, self.stream.clone())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            extract: ExtractConfig::new(&self.default_banner).with_base_url(&self.base_url),
            http: HttpConfig {
                proxy: self.proxy.clone(),
                timeout_secs: self.request_timeout_secs,
                user_agent: self.user_agent.clone(),
            },
            on_malformed_post: self.on_malformed_post,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
