//! Client configuration.
//!
//! A [`TiliaConfig`] carries one [`EnvironmentConfig`] per Tilia environment
//! and a switch selecting which one is active, so the same configuration file
//! can be flipped between staging and production.
//!
//! # Environment Variables
//!
//! [`TiliaConfig::from_env`] reads:
//! - `TILIA_ENVIRONMENT` - `staging` or `production` (default: staging)
//! - `TILIA_CLIENT_ID` - client id for the active environment
//! - `TILIA_CLIENT_SECRET` - client secret for the active environment
//! - `TILIA_API_HOST` - base host, e.g. `staging.tilia-inc.com`
//! - `TILIA_WIDGET_URL` - URL of the page hosting the widget loader
//! - `TILIA_LOG_PAYLOADS` - `true` to log request/response bodies (staging only)
//!
//! # Example
//!
//! ```bash
//! export TILIA_ENVIRONMENT=staging
//! export TILIA_CLIENT_ID=my-integration
//! export TILIA_CLIENT_SECRET=...
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::protocol::resolve_scope;
use crate::{Result, TiliaError};

/// Default staging API host.
pub const STAGING_API_HOST: &str = "staging.tilia-inc.com";

/// Default production API host.
pub const PRODUCTION_API_HOST: &str = "tilia-inc.com";

/// Default staging widget page.
pub const STAGING_WIDGET_URL: &str =
    "https://web.staging.tilia-inc.com/ui/unity-sdk-integrator-v1.html";

/// Default production widget page.
pub const PRODUCTION_WIDGET_URL: &str = "https://web.tilia-inc.com/ui/unity-sdk-integrator-v1.html";

/// Tilia environment selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Staging (sandbox) environment.
    #[default]
    Staging,
    /// Production environment.
    Production,
}

impl Environment {
    /// Get the environment name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Credentials and endpoints for a single environment.
///
/// The whole value is wiped from memory when dropped.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EnvironmentConfig {
    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Base host that service sub-domains are prefixed onto.
    pub api_host: String,

    /// Page that exposes the `LoadTiliaWidget` entry point.
    pub widget_url: String,
}

impl EnvironmentConfig {
    /// Create an environment configuration without credentials.
    pub fn new(api_host: impl Into<String>, widget_url: impl Into<String>) -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_host: api_host.into(),
            widget_url: widget_url.into(),
        }
    }

    /// Default staging endpoints.
    pub fn staging() -> Self {
        Self::new(STAGING_API_HOST, STAGING_WIDGET_URL)
    }

    /// Default production endpoints.
    pub fn production() -> Self {
        Self::new(PRODUCTION_API_HOST, PRODUCTION_WIDGET_URL)
    }

    /// Set client credentials.
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("widget_url", &self.widget_url)
            .finish()
    }
}

/// Host application identity, sent as client-identification headers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Host product name.
    pub product_name: String,
    /// Host product version.
    pub product_version: String,
    /// Platform the host runs on.
    pub platform: String,
    /// Host runtime version.
    pub runtime_version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            product_name: "unknown".to_string(),
            product_version: "unknown".to_string(),
            platform: std::env::consts::OS.to_string(),
            runtime_version: "rust".to_string(),
        }
    }
}

/// Top-level client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TiliaConfig {
    /// Which environment requests are sent to.
    #[serde(default)]
    pub environment: Environment,

    /// Staging credentials and endpoints.
    #[serde(default = "EnvironmentConfig::staging")]
    pub staging: EnvironmentConfig,

    /// Production credentials and endpoints.
    #[serde(default = "EnvironmentConfig::production")]
    pub production: EnvironmentConfig,

    /// Permission scopes requested with each token. Empty requests all of them.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Log request and response bodies. Honored in staging only.
    #[serde(default)]
    pub log_payloads: bool,

    /// Client-identification header values.
    #[serde(default)]
    pub client_info: ClientInfo,
}

fn default_timeout() -> u64 {
    30
}

impl Default for TiliaConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            staging: EnvironmentConfig::staging(),
            production: EnvironmentConfig::production(),
            scopes: Vec::new(),
            timeout_secs: default_timeout(),
            log_payloads: false,
            client_info: ClientInfo::default(),
        }
    }
}

impl TiliaConfig {
    /// Staging configuration with the given credentials.
    pub fn staging(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.staging = config.staging.with_credentials(client_id, client_secret);
        config
    }

    /// Production configuration with the given credentials.
    pub fn production(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let mut config = Self::default().with_environment(Environment::Production);
        config.production = config.production.with_credentials(client_id, client_secret);
        config
    }

    /// Load configuration from `TILIA_*` environment variables.
    ///
    /// Values that are not set keep their defaults; call [`validate`](Self::validate)
    /// before use.
    pub fn from_env() -> Self {
        let environment = std::env::var("TILIA_ENVIRONMENT")
            .ok()
            .and_then(|s| parse_environment(&s))
            .unwrap_or_default();

        let mut config = Self::default().with_environment(environment);
        let active = config.active_mut();

        if let Ok(client_id) = std::env::var("TILIA_CLIENT_ID") {
            active.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("TILIA_CLIENT_SECRET") {
            active.client_secret = client_secret;
        }
        if let Ok(host) = std::env::var("TILIA_API_HOST") {
            active.api_host = host;
        }
        if let Ok(url) = std::env::var("TILIA_WIDGET_URL") {
            active.widget_url = url;
        }
        if let Ok(flag) = std::env::var("TILIA_LOG_PAYLOADS") {
            config.log_payloads = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Select the active environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the API host of the active environment.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.active_mut().api_host = host.into();
        self
    }

    /// Override the widget URL of the active environment.
    pub fn with_widget_url(mut self, url: impl Into<String>) -> Self {
        self.active_mut().widget_url = url.into();
        self
    }

    /// Set the requested permission scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable or disable body logging.
    pub fn with_log_payloads(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// Set the client-identification header values.
    pub fn with_client_info(mut self, info: ClientInfo) -> Self {
        self.client_info = info;
        self
    }

    /// Settings for the active environment.
    pub fn active(&self) -> &EnvironmentConfig {
        match self.environment {
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }

    fn active_mut(&mut self) -> &mut EnvironmentConfig {
        match self.environment {
            Environment::Staging => &mut self.staging,
            Environment::Production => &mut self.production,
        }
    }

    /// Base host of the active environment.
    pub fn api_host(&self) -> &str {
        &self.active().api_host
    }

    /// Widget page URL of the active environment.
    pub fn widget_url(&self) -> &str {
        &self.active().widget_url
    }

    /// Comma-separated scope string sent with the token exchange.
    pub fn scope(&self) -> String {
        resolve_scope(&self.scopes)
    }

    /// Whether request and response bodies may be logged.
    pub fn should_log_payloads(&self) -> bool {
        self.log_payloads && self.environment == Environment::Staging
    }

    /// Check that the active environment is usable.
    pub fn validate(&self) -> Result<()> {
        let active = self.active();
        let env = self.environment.as_str();

        if active.client_id.trim().is_empty() {
            return Err(TiliaError::InvalidConfig(format!(
                "client_id is empty for {}",
                env
            )));
        }
        if active.client_secret.trim().is_empty() {
            return Err(TiliaError::InvalidConfig(format!(
                "client_secret is empty for {}",
                env
            )));
        }
        if active.api_host.trim().is_empty() {
            return Err(TiliaError::InvalidConfig(format!(
                "api_host is empty for {}",
                env
            )));
        }
        if self.timeout_secs == 0 {
            return Err(TiliaError::InvalidConfig(
                "timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse an environment name string.
fn parse_environment(s: &str) -> Option<Environment> {
    match s.trim().to_lowercase().as_str() {
        "staging" | "stage" | "sandbox" => Some(Environment::Staging),
        "production" | "prod" => Some(Environment::Production),
        _ => None,
    }
}
