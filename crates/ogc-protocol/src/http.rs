//! HTTP transport abstraction for OGC requests.
//!
//! Identify code only needs "GET this URL, give me status and body". Keeping
//! that behind a trait lets tests script server responses without a network.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{OgcError, OgcResult};

const USER_AGENT: &str = concat!("ogc-identify/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP GET.
///
/// Any status code is a successful exchange; only failures to complete the
/// exchange (connect, TLS, body read) are errors.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str, accept: &str) -> OgcResult<HttpResponse>;
}

/// [`HttpFetcher`] backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a client. `None` means no request timeout.
    pub fn new(timeout: Option<Duration>) -> OgcResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| OgcError::Transport {
            url: String::new(),
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, accept: &str) -> OgcResult<HttpResponse> {
        let response = match self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
        {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(OgcError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| OgcError::Transport {
            url: url.to_string(),
            message: format!("Failed to read response: {}", e),
        })?;

        Ok(HttpResponse { status, body })
    }
}
