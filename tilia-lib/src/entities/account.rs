use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::{boolean, string, timestamp};

/// Result of registering a new user.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Registration {
    pub account_id: Option<String>,
    pub autologin_id: Option<String>,
    pub metadata: Option<String>,
    pub tracking_id: Option<String>,
}

/// Account details of a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct User {
    pub account_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub integrator: Option<String>,
    pub is_blocked: Option<bool>,
    pub created: Option<DateTime<Utc>>,
}

/// Identity verification state of an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KycStatus {
    pub account_id: Option<String>,
    pub state: Option<String>,
}

/// A one-time redirect that logs a user into the Tilia web experience.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserAuth {
    pub nonce_auth_id: Option<String>,
    pub redirect: Option<String>,
}

impl EntityDecoder for Registration {
    const KIND: EntityKind = EntityKind::Registration;

    fn from_json(payload: &Value) -> Self {
        Self {
            account_id: string(payload, "account_id"),
            autologin_id: string(payload, "autologin_id"),
            metadata: string(payload, "metadata"),
            tracking_id: string(payload, "tracking_id"),
        }
    }
}

impl EntityDecoder for User {
    const KIND: EntityKind = EntityKind::User;

    fn from_json(payload: &Value) -> Self {
        Self {
            account_id: string(payload, "account_id"),
            username: string(payload, "username"),
            email: string(payload, "email"),
            integrator: string(payload, "integrator"),
            is_blocked: boolean(payload, "is_blocked"),
            created: timestamp(payload, "created"),
        }
    }
}

impl EntityDecoder for KycStatus {
    const KIND: EntityKind = EntityKind::Kyc;

    fn from_json(payload: &Value) -> Self {
        Self {
            account_id: string(payload, "account_id"),
            state: string(payload, "state"),
        }
    }
}

impl EntityDecoder for UserAuth {
    const KIND: EntityKind = EntityKind::UserAuth;

    fn from_json(payload: &Value) -> Self {
        Self {
            nonce_auth_id: string(payload, "nonce_auth_id"),
            redirect: string(payload, "redirect"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::decode;
    use crate::protocol::Envelope;
    use serde_json::json;

    #[test]
    fn test_decode_user() {
        let env = Envelope::from_value(json!({
            "status": "Success",
            "payload": {"account_id": "acc-1", "username": "sam", "is_blocked": false}
        }));
        let user = decode::<User>(&env);
        assert_eq!(user.account_id.as_deref(), Some("acc-1"));
        assert_eq!(user.is_blocked, Some(false));
        assert!(user.created.is_none());
    }

    #[test]
    fn test_user_without_status_still_decodes_payload() {
        let env = Envelope::from_value(json!({"payload": {"username": "sam"}}));
        let user = decode::<User>(&env);
        assert!(!user.received());
        assert_eq!(user.username.as_deref(), Some("sam"));
    }

    #[test]
    fn test_decode_kyc_and_user_auth() {
        let env = Envelope::from_value(json!({
            "status": "Success",
            "payload": {"account_id": "acc-1", "state": "ACCEPT"}
        }));
        assert_eq!(decode::<KycStatus>(&env).state.as_deref(), Some("ACCEPT"));

        let env = Envelope::from_value(json!({
            "status": "Success",
            "payload": {"nonce_auth_id": "n-1", "redirect": "https://example/login"}
        }));
        let auth = decode::<UserAuth>(&env);
        assert_eq!(auth.nonce_auth_id.as_deref(), Some("n-1"));
        assert_eq!(auth.redirect.as_deref(), Some("https://example/login"));
    }
}
