//! Bearer token lifecycle.
//!
//! Tokens come from a client-credentials exchange against the auth service.
//! One token is cached per client; it is replaced wholesale on refresh and
//! never mutated in place.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::dispatcher::Dispatcher;
use crate::protocol::{fields, request_url, token_resource, Service};
use crate::{Result, TiliaError};

/// Seconds before actual expiry at which a token stops being used.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// A bearer token and when it was issued.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct AccessToken {
    access_token: String,
    token_type: String,
    scope: String,
    expires_in: i64,
    issued_at: DateTime<Utc>,
}

impl AccessToken {
    pub(crate) fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        scope: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            scope: scope.into(),
            expires_in,
            issued_at,
        }
    }

    /// Read a token response: `access_token`, `token_type`, `expires_in`, `scope`.
    ///
    /// Token responses carry no envelope `status`.
    pub(crate) fn from_json(document: &Value, issued_at: DateTime<Utc>) -> Self {
        Self::new(
            fields::string(document, "access_token").unwrap_or_default(),
            fields::string(document, "token_type")
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            fields::string(document, "scope").unwrap_or_default(),
            fields::int(document, "expires_in").unwrap_or_default(),
            issued_at,
        )
    }

    /// Moment after which the token is no longer used.
    ///
    /// `None` when `expires_in` is out of the representable date range.
    pub(crate) fn usable_until(&self) -> Option<DateTime<Utc>> {
        let lifetime = self.expires_in.checked_sub(EXPIRY_MARGIN_SECS)?;
        self.issued_at.checked_add_signed(Duration::try_seconds(lifetime)?)
    }

    /// Valid iff non-empty and `at` is strictly before [`usable_until`](Self::usable_until).
    /// A token whose expiry cannot be computed is never valid.
    pub(crate) fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.usable_until().is_some_and(|until| at < until)
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// `Authorization` header value.
    pub(crate) fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    pub(crate) fn scope(&self) -> &str {
        &self.scope
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Caches the client's token and refreshes it when it stops being valid.
///
/// The cache lock is held across a refresh, so concurrent callers wait for
/// a single exchange instead of each issuing their own.
#[derive(Default)]
pub(crate) struct TokenManager {
    slot: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if valid, otherwise exchange credentials for
    /// a new one.
    pub(crate) async fn ensure_valid_token(
        &self,
        dispatcher: &Dispatcher,
        scope: &str,
    ) -> Result<AccessToken> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.clone());
        }

        let token = exchange(dispatcher, scope).await?;
        info!(
            scope = token.scope(),
            usable_until = ?token.usable_until(),
            "access token replaced"
        );
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call performs a fresh exchange.
    pub(crate) async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

async fn exchange(dispatcher: &Dispatcher, scope: &str) -> Result<AccessToken> {
    let config = dispatcher.config();
    let credentials = config.active();
    let url = request_url(
        config.api_host(),
        Service::Auth,
        None,
        &token_resource(&credentials.client_id, &credentials.client_secret, scope),
    );

    let issued_at = Utc::now();
    let (status, document) = dispatcher.send_token_request(&url).await?;
    let token = AccessToken::from_json(&document, issued_at);

    if token.is_valid_at(issued_at) {
        return Ok(token);
    }

    let detail = fields::string_list(&document, "message").join("; ");
    error!(status, detail = %detail, "token exchange did not yield a usable token");
    Err(TiliaError::Auth(if detail.is_empty() {
        format!("token exchange failed with HTTP {}", status)
    } else {
        format!("token exchange failed with HTTP {}: {}", status, detail)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn token(access_token: &str, expires_in: i64, issued_at: DateTime<Utc>) -> AccessToken {
        AccessToken::new(access_token, "Bearer", "user_info", expires_in, issued_at)
    }

    #[test]
    fn test_from_json() {
        let now = Utc::now();
        let token = AccessToken::from_json(
            &json!({"access_token": "abc", "token_type": "Bearer", "expires_in": 3600, "scope": "read_kycs"}),
            now,
        );
        assert!(token.is_valid_at(now));
        assert_eq!(token.authorization(), "Bearer abc");
        assert_eq!(token.scope(), "read_kycs");
        assert_eq!(token.usable_until(), Some(now + Duration::seconds(3300)));
    }

    #[test]
    fn test_missing_token_type_defaults_to_bearer() {
        let token = AccessToken::from_json(&json!({"access_token": "abc", "expires_in": 900}), Utc::now());
        assert_eq!(token.authorization(), "Bearer abc");
    }

    #[test]
    fn test_short_lived_token_is_never_valid() {
        let now = Utc::now();
        assert!(!token("abc", 300, now).is_valid_at(now));
        assert!(!token("abc", 0, now).is_valid_at(now));
    }

    #[test]
    fn test_out_of_range_lifetime_is_not_valid() {
        let now = Utc::now();
        for expires_in in [i64::MIN, i64::MAX, 10_000_000_000_000] {
            let t = token("abc", expires_in, now);
            assert_eq!(t.usable_until(), None, "expires_in = {}", expires_in);
            assert!(!t.is_valid_at(now));
            assert!(!t.is_valid());
        }
    }

    #[test]
    fn test_out_of_range_lifetime_from_json() {
        let now = Utc::now();
        let t = AccessToken::from_json(
            &json!({"access_token": "abc", "expires_in": 10_000_000_000_000i64}),
            now,
        );
        assert!(!t.is_valid_at(now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", token("secret-token", 3600, Utc::now()));
        assert!(!rendered.contains("secret-token"));
    }

    proptest! {
        #[test]
        fn prop_empty_token_is_never_valid(expires_in in 0i64..1_000_000, offset in -1_000_000i64..1_000_000) {
            let issued = Utc::now();
            let at = issued + Duration::seconds(offset);
            prop_assert!(!token("", expires_in, issued).is_valid_at(at));
        }

        #[test]
        fn prop_any_lifetime_is_checked_without_panic(expires_in in any::<i64>()) {
            let issued = Utc::now();
            let t = token("abc", expires_in, issued);
            let _ = t.is_valid_at(issued);
        }

        #[test]
        fn prop_validity_ends_at_margin(expires_in in 301i64..1_000_000) {
            let issued = Utc::now();
            let boundary = issued + Duration::seconds(expires_in - EXPIRY_MARGIN_SECS);
            let t = token("abc", expires_in, issued);
            prop_assert!(t.is_valid_at(boundary - Duration::milliseconds(1)));
            prop_assert!(!t.is_valid_at(boundary));
            prop_assert!(!t.is_valid_at(boundary + Duration::seconds(1)));
        }
    }
}
