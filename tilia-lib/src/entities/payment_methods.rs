use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::{self, int, string, timestamp};

/// A payment method stored on an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountPaymentMethod {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub method_class: Option<String>,
    pub display_string: Option<String>,
    pub provider: Option<String>,
    pub psp_reference: Option<String>,
    pub psp_hash_code: Option<String>,
    pub processing_currency: Option<String>,
    pub pm_state: Option<String>,
    pub integrator: Option<String>,
    /// Only meaningful for wallets.
    pub wallet_balance: i64,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Payment methods of one account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PaymentMethods {
    pub payment_methods: Vec<AccountPaymentMethod>,
}

impl AccountPaymentMethod {
    fn from_json(method: &Value) -> Self {
        Self {
            id: string(method, "id"),
            account_id: string(method, "account_id"),
            method_class: string(method, "method_class"),
            display_string: string(method, "display_string"),
            provider: string(method, "provider"),
            psp_reference: string(method, "psp_reference"),
            psp_hash_code: string(method, "psp_hash_code"),
            processing_currency: string(method, "processing_currency"),
            pm_state: string(method, "pm_state"),
            integrator: string(method, "integrator"),
            wallet_balance: int(method, "wallet_balance").unwrap_or_default(),
            created: timestamp(method, "created"),
            updated: timestamp(method, "updated"),
        }
    }
}

impl EntityDecoder for PaymentMethods {
    const KIND: EntityKind = EntityKind::PaymentMethods;

    fn from_json(payload: &Value) -> Self {
        Self {
            payment_methods: fields::elements(payload)
                .into_iter()
                .filter(|method| method.is_object())
                .map(AccountPaymentMethod::from_json)
                .collect(),
        }
    }
}

impl PaymentMethods {
    /// Find a method by id.
    pub fn find(&self, id: &str) -> Option<&AccountPaymentMethod> {
        self.payment_methods
            .iter()
            .find(|method| method.id.as_deref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::decode;
    use crate::protocol::Envelope;
    use serde_json::json;

    #[test]
    fn test_decode_payment_methods() {
        let env = Envelope::from_value(json!({
            "status": "Success",
            "payload": [
                {"id": "pm-1", "method_class": "wallet", "wallet_balance": "1200"},
                {"id": "pm-2", "method_class": "card", "display_string": "Visa 4242"}
            ]
        }));
        let methods = decode::<PaymentMethods>(&env);
        assert_eq!(methods.payment_methods.len(), 2);
        assert_eq!(methods.find("pm-1").unwrap().wallet_balance, 1200);
        assert_eq!(
            methods.find("pm-2").unwrap().display_string.as_deref(),
            Some("Visa 4242")
        );
        assert!(methods.find("pm-3").is_none());
    }

    #[test]
    fn test_missing_payload_yields_empty_list() {
        let env = Envelope::from_value(json!({"status": "Success"}));
        assert!(decode::<PaymentMethods>(&env).payment_methods.is_empty());
    }
}
