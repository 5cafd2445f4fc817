//! Shared helpers for `TiliaClient` integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tilia_lib::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, Result, TiliaClient, TiliaConfig,
    TiliaError,
};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const TOKEN: &str = "tok-1";

struct Rule {
    method: HttpMethod,
    url_fragment: String,
    response: std::result::Result<HttpResponse, String>,
    remaining: Option<usize>,
}

/// In-memory transport that records every request and answers from a list
/// of canned responses.
///
/// Rules are matched in registration order on verb and URL substring.
/// Unmatched requests get an empty 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    rules: Arc<Mutex<Vec<Rule>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every matching request with `response`.
    pub fn respond(&self, method: HttpMethod, url_fragment: &str, response: HttpResponse) {
        self.push(method, url_fragment, Ok(response), None);
    }

    /// Answer only the next matching request with `response`.
    pub fn respond_once(&self, method: HttpMethod, url_fragment: &str, response: HttpResponse) {
        self.push(method, url_fragment, Ok(response), Some(1));
    }

    /// Answer matching requests with a connection failure.
    pub fn fail(&self, method: HttpMethod, url_fragment: &str, reason: &str) {
        self.push(method, url_fragment, Err(reason.to_string()), None);
    }

    /// Answer matching requests with a JSON body.
    pub fn respond_json(&self, method: HttpMethod, url_fragment: &str, status: u16, body: Value) {
        self.respond(method, url_fragment, HttpResponse::new(status, body.to_string()));
    }

    /// Serve a valid token from the auth service.
    pub fn with_token(self) -> Self {
        self.respond_json(
            HttpMethod::Post,
            "auth.staging.tilia-inc.com/token",
            200,
            json!({
                "access_token": TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "read_invoices"
            }),
        );
        self
    }

    fn push(
        &self,
        method: HttpMethod,
        url_fragment: &str,
        response: std::result::Result<HttpResponse, String>,
        remaining: Option<usize>,
    ) {
        self.rules.lock().unwrap().push(Rule {
            method,
            url_fragment: url_fragment.to_string(),
            response,
            remaining,
        });
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to the token endpoint.
    pub fn token_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains("/token?"))
            .collect()
    }

    /// Requests sent anywhere but the token endpoint.
    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !r.url.contains("/token?"))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        // Suspend like a real round trip so concurrent callers interleave.
        tokio::task::yield_now().await;

        let mut rules = self.rules.lock().unwrap();
        let position = rules.iter().position(|rule| {
            rule.method == request.method
                && request.url.contains(&rule.url_fragment)
                && rule.remaining != Some(0)
        });
        let Some(index) = position else {
            return Ok(HttpResponse::new(404, ""));
        };

        let rule = &mut rules[index];
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        match &rule.response {
            Ok(response) => Ok(response.clone()),
            Err(reason) => Err(TiliaError::ConnectionFailed {
                target: request.url.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// A staging configuration with test credentials.
pub fn config() -> TiliaConfig {
    TiliaConfig::staging(CLIENT_ID, CLIENT_SECRET)
}

/// A client wired to `transport`.
pub fn client(transport: &MockTransport) -> TiliaClient {
    TiliaClient::with_transport(config(), Arc::new(transport.clone())).unwrap()
}

/// A `Success` envelope around `payload`.
pub fn success(payload: Value) -> Value {
    json!({
        "status": "Success",
        "message": [],
        "codes": [],
        "payload": payload
    })
}
