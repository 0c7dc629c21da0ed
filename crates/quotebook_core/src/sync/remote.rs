//! Remote quote source contract and its HTTP implementation.

use super::{SyncError, SyncResult};
use crate::config::SyncConfig;
use crate::model::quote::Quote;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Category given to quotes decoded from the placeholder payload.
const SERVER_CATEGORY: &str = "Server";

/// How the body of a fetch response is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Ignore the body; a successful fetch yields the configured quotes.
    #[default]
    Substitute,
    /// Map each post's `title` into a quote.
    Decode,
}

/// Server acknowledgement of a published quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    pub status: u16,
    /// Identifier the server assigned, when it returned one.
    pub remote_id: Option<i64>,
}

/// A place quotes are pulled from and pushed to.
#[async_trait]
pub trait RemoteQuoteSource: Send + Sync {
    /// Returns the server's authoritative quotes.
    async fn fetch_server_quotes(&self) -> SyncResult<Vec<Quote>>;
    /// Publishes one quote; the local record is never touched.
    async fn post_quote(&self, quote: &Quote) -> SyncResult<PostReceipt>;
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Serialize)]
struct OutgoingPost<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[derive(Debug, Deserialize)]
struct PostAck {
    id: Option<i64>,
}

/// JSON-over-HTTP source pointed at a placeholder content endpoint.
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
    mode: PayloadMode,
    payload_limit: usize,
    server_quotes: Vec<Quote>,
}

impl HttpQuoteSource {
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            mode: config.payload_mode,
            payload_limit: config.payload_limit,
            server_quotes: config.server_quotes.clone(),
        })
    }
}

#[async_trait]
impl RemoteQuoteSource for HttpQuoteSource {
    async fn fetch_server_quotes(&self) -> SyncResult<Vec<Quote>> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        match self.mode {
            PayloadMode::Substitute => Ok(self.server_quotes.clone()),
            PayloadMode::Decode => {
                let posts: Vec<RemotePost> = response.json().await?;
                debug!(
                    "event=sync_fetch module=sync status=decoded posts={}",
                    posts.len()
                );
                Ok(posts_to_quotes(posts, self.payload_limit))
            }
        }
    }

    async fn post_quote(&self, quote: &Quote) -> SyncResult<PostReceipt> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&OutgoingPost {
                title: &quote.text,
                body: &quote.category,
                user_id: 1,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        // Ack bodies are informational; a missing or odd body is not a failure.
        let remote_id = response
            .json::<PostAck>()
            .await
            .ok()
            .and_then(|ack| ack.id);
        Ok(PostReceipt {
            status: status.as_u16(),
            remote_id,
        })
    }
}

fn posts_to_quotes(posts: Vec<RemotePost>, limit: usize) -> Vec<Quote> {
    posts
        .into_iter()
        .filter_map(|post| Quote::new(post.title, SERVER_CATEGORY).ok())
        .take(limit)
        .collect()
}
