//! Builds, sends and interprets API requests.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::TiliaConfig;
use crate::protocol::Envelope;
use crate::token::AccessToken;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::{Result, TiliaError, SDK_VERSION};

/// Content type of request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of the token exchange.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client-identification header names.
pub mod headers {
    pub const SDK_VERSION: &str = "X-Tilia-SDK-Version";
    pub const RUNTIME_VERSION: &str = "X-Tilia-Runtime-Version";
    pub const PLATFORM: &str = "X-Tilia-Platform";
    pub const PRODUCT_NAME: &str = "X-Tilia-Product-Name";
    pub const PRODUCT_VERSION: &str = "X-Tilia-Product-Version";
}

/// The server answers 500 without a usable body.
const BODILESS_FAILURE_STATUS: u16 = 500;

/// Sends requests through an [`HttpTransport`] and turns responses into
/// envelopes.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    config: Arc<TiliaConfig>,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(transport: Arc<dyn HttpTransport>, config: Arc<TiliaConfig>) -> Self {
        Self { transport, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &TiliaConfig {
        &self.config
    }

    /// Send an API request and parse the response envelope.
    ///
    /// A 500 response becomes a synthesized `Failed` envelope and an empty
    /// body becomes an envelope without status. A body that is not JSON is
    /// a [`TiliaError::Decode`].
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        token: Option<&AccessToken>,
    ) -> Result<Envelope> {
        let content_type = body.as_ref().map(|_| JSON_CONTENT_TYPE);
        let request = self.build_request(method, url, body, content_type, token);
        let response = self.execute(request).await?;

        if response.status == BODILESS_FAILURE_STATUS {
            return Ok(Envelope::synthesized_failure(response.status));
        }
        if response.body.trim().is_empty() {
            return Ok(Envelope::empty(response.status));
        }

        let envelope = Envelope::parse(&response.body).map_err(|e| {
            error!(%method, url, status = response.status, error = %e, "undecodable response body");
            TiliaError::Decode {
                status: response.status,
                reason: e.to_string(),
            }
        })?;
        Ok(envelope.with_transport_code(response.status))
    }

    /// Reduced path for the token exchange: form content type, no
    /// authorization, raw JSON document back.
    pub(crate) async fn send_token_request(&self, url: &str) -> Result<(u16, Value)> {
        let request = self.build_request(
            HttpMethod::Post,
            url,
            None,
            Some(FORM_CONTENT_TYPE),
            None,
        );
        let response = self.execute(request).await?;

        if response.status == BODILESS_FAILURE_STATUS || response.body.trim().is_empty() {
            return Err(TiliaError::Auth(format!(
                "token endpoint returned HTTP {} without a body",
                response.status
            )));
        }
        let document = serde_json::from_str(&response.body).map_err(|e| {
            error!(status = response.status, error = %e, "undecodable token response");
            TiliaError::Auth(format!("undecodable token response: {}", e))
        })?;
        Ok((response.status, document))
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        content_type: Option<&str>,
        token: Option<&AccessToken>,
    ) -> HttpRequest {
        let info = &self.config.client_info;
        let mut pairs = Vec::with_capacity(8);

        if let Some(content_type) = content_type {
            pairs.push(("Content-Type".to_string(), content_type.to_string()));
        }
        pairs.push(("Accept".to_string(), JSON_CONTENT_TYPE.to_string()));
        if let Some(token) = token.filter(|t| t.is_valid()) {
            pairs.push(("Authorization".to_string(), token.authorization()));
        }
        for (name, value) in [
            (headers::SDK_VERSION, SDK_VERSION),
            (headers::RUNTIME_VERSION, info.runtime_version.as_str()),
            (headers::PLATFORM, info.platform.as_str()),
            (headers::PRODUCT_NAME, info.product_name.as_str()),
            (headers::PRODUCT_VERSION, info.product_version.as_str()),
        ] {
            pairs.push((name.to_string(), value.to_string()));
        }

        let body = if method.has_body() {
            Some(body.unwrap_or_default())
        } else {
            None
        };

        HttpRequest {
            method,
            url: url.to_string(),
            headers: pairs,
            body,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        if self.config.should_log_payloads() {
            debug!(%method, %url, body = request.body.as_deref().unwrap_or(""), "sending request");
        } else {
            debug!(%method, url = %redact_query(&url), "sending request");
        }

        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(%method, url = %redact_query(&url), error = %e, "request failed");
            e
        })?;

        if !response.is_success() {
            warn!(
                %method,
                url = %redact_query(&url),
                status = response.status,
                error = response.error.as_deref(),
                "non-success status"
            );
        }
        if self.config.should_log_payloads() {
            debug!(status = response.status, body = %response.body, "received response");
        } else {
            debug!(status = response.status, "received response");
        }

        Ok(response)
    }
}

/// Strip the query string so credentials in the token URL never reach logs.
fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
