//! Default transport backed by `reqwest`.
//!
//! Enabled by the `http-transport` feature. Without it, [`ReqwestTransport`]
//! still exists but every request fails with
//! [`TiliaError::Unimplemented`].

#[cfg(feature = "http-transport")]
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{HttpRequest, HttpResponse, HttpTransport};
#[cfg(feature = "http-transport")]
use super::traits::HttpMethod;
use crate::{Result, TiliaError};

/// [`HttpTransport`] over a pooled `reqwest` client with rustls.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    timeout_secs: u64,
    #[cfg(feature = "http-transport")]
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout_secs`.
    #[cfg(feature = "http-transport")]
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TiliaError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            timeout_secs,
            client,
        })
    }

    /// Create a transport (stub when feature disabled).
    #[cfg(not(feature = "http-transport"))]
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self { timeout_secs })
    }

    /// Per-request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Map reqwest errors to TiliaError.
    #[cfg(feature = "http-transport")]
    fn map_reqwest_error(&self, request: &HttpRequest, e: reqwest::Error) -> TiliaError {
        if e.is_timeout() {
            TiliaError::ConnectionTimeout {
                operation: format!("{} {}", request.method, request.url),
                timeout_ms: self.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            TiliaError::ConnectionFailed {
                target: request.url.clone(),
                reason: e.to_string(),
            }
        } else {
            TiliaError::Transport(format!("{} {} failed: {}", request.method, request.url, e))
        }
    }
}

#[cfg(feature = "http-transport")]
#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.method.has_body() {
            builder = builder.body(request.body.clone().unwrap_or_default());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(&request, e))?;

        let status = response.status();
        let error = if status.is_success() {
            None
        } else {
            Some(format!("HTTP {}", status))
        };
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(&request, e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
            error,
        })
    }
}

#[cfg(not(feature = "http-transport"))]
#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
        Err(TiliaError::Unimplemented(
            "reqwest transport not compiled - enable the 'http-transport' feature",
        ))
    }
}
