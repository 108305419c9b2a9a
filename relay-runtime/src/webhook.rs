//! Webhook delivery
//!
//! Each post is sent as the only element of an `embeds` list.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use relay_core::Post;

/// Errors from a single webhook delivery
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to build webhook client: {0}")]
    ClientBuild(String),

    /// Connection refused, DNS failure or timeout; nothing reached the endpoint
    #[error("Webhook unreachable: {0}")]
    Unreachable(String),

    #[error("Posting webhook failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            DeliveryError::Unreachable(err.to_string())
        } else {
            DeliveryError::Request(err)
        }
    }
}

/// Request body for one delivery
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub embeds: &'a [Post],
}

impl<'a> WebhookPayload<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            embeds: std::slice::from_ref(post),
        }
    }
}

/// Destination for delivered posts
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// Deliver one post, returning the response status code
    async fn send(&self, post: &Post) -> Result<u16, DeliveryError>;
}

/// Webhook endpoint reached over HTTP
pub struct HttpWebhook {
    client: Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn send(&self, post: &Post) -> Result<u16, DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::new(post))
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}
