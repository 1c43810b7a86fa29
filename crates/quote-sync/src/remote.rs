//! Remote quote source
//!
//! The remote is a generic JSON placeholder API repurposed to simulate a
//! quote server: posts are read back as quotes and the local list is posted
//! as an acknowledgement-only write.

use crate::error::RemoteError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quote_model::Quote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Public placeholder API used when nothing else is configured
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Posts requested per fetch
pub const DEFAULT_FETCH_LIMIT: usize = 5;

/// Request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Category assigned to quotes read from the remote
pub const SERVER_CATEGORY: &str = "Server";

/// Acknowledgement of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReceipt {
    /// Identifier the remote assigned, if any
    pub id: Option<u64>,

    /// Number of quotes sent
    pub pushed: usize,

    /// When the acknowledgement arrived
    pub acknowledged_at: DateTime<Utc>,
}

/// Remote side of a sync
#[async_trait]
pub trait RemoteQuoteSource: Send + Sync + fmt::Debug {
    /// Current remote snapshot
    ///
    /// # Errors
    /// Transport or status failure.
    async fn fetch(&self) -> Result<Vec<Quote>, RemoteError>;

    /// Send the local list; the response only acknowledges receipt
    ///
    /// # Errors
    /// Transport or status failure.
    async fn push(&self, quotes: &[Quote]) -> Result<PushReceipt, RemoteError>;
}

/// Hardcoded remote snapshot used when a fetch fails
#[must_use]
pub fn fallback_server_quotes() -> Vec<Quote> {
    let stamp = Utc::now().to_rfc3339();
    [
        ("fallback-1", "The best way to predict the future is to invent it."),
        ("fallback-2", "Programs must be written for people to read."),
        ("fallback-3", "Make it work, make it right, make it fast."),
    ]
    .into_iter()
    .map(|(id, text)| {
        Quote::new(text, SERVER_CATEGORY)
            .with_id(id)
            .with_timestamp(stamp.clone())
    })
    .collect()
}

#[derive(Debug, Deserialize)]
struct Post {
    id: u64,
    title: String,
}

impl Post {
    fn into_quote(self, fetched_at: &str) -> Quote {
        Quote::new(self.title, SERVER_CATEGORY)
            .with_id(format!("server-{}", self.id))
            .with_timestamp(fetched_at)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushBody<'a> {
    title: &'static str,
    body: &'a [Quote],
    user_id: u32,
}

#[derive(Debug, Deserialize)]
struct PushAck {
    #[serde(default)]
    id: Option<u64>,
}

/// [`RemoteQuoteSource`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl HttpRemote {
    /// Remote rooted at `base_url` (a trailing `/` is ignored)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit: DEFAULT_FETCH_LIMIT,
        }
    }

    /// Posts requested per fetch
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Use a preconfigured client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }
}

impl Default for HttpRemote {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_URL)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl RemoteQuoteSource for HttpRemote {
    async fn fetch(&self) -> Result<Vec<Quote>, RemoteError> {
        let url = self.posts_url();
        let response = self
            .client
            .get(&url)
            .query(&[("_limit", self.limit)])
            .send()
            .await?;
        let posts: Vec<Post> = check_status(response, &url)?.json().await?;

        let fetched_at = Utc::now().to_rfc3339();
        tracing::debug!(url = %url, count = posts.len(), "fetched remote quotes");
        Ok(posts.into_iter().map(|p| p.into_quote(&fetched_at)).collect())
    }

    async fn push(&self, quotes: &[Quote]) -> Result<PushReceipt, RemoteError> {
        let url = self.posts_url();
        let body = PushBody {
            title: "quotes",
            body: quotes,
            user_id: 1,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        let ack: PushAck = check_status(response, &url)?.json().await?;

        Ok(PushReceipt {
            id: ack.id,
            pushed: quotes.len(),
            acknowledged_at: Utc::now(),
        })
    }
}
