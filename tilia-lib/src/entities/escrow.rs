use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::{string, timestamp};

/// An escrow and the invoices tied to its lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Escrow {
    pub id: Option<String>,
    pub account_id: Option<String>,
    /// Invoice that funds the escrow.
    pub escrow_invoice_id: Option<String>,
    /// Invoice created when the escrow is committed.
    pub commit_invoice_id: Option<String>,
    /// Invoice created when the escrow is canceled.
    pub cancel_invoice_id: Option<String>,
    pub status: Option<String>,
    pub integrator: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl EntityDecoder for Escrow {
    const KIND: EntityKind = EntityKind::Escrow;

    fn from_json(payload: &Value) -> Self {
        Self {
            id: string(payload, "id"),
            account_id: string(payload, "account_id"),
            escrow_invoice_id: string(payload, "escrow_invoice_id"),
            commit_invoice_id: string(payload, "commit_invoice_id"),
            cancel_invoice_id: string(payload, "cancel_invoice_id"),
            status: string(payload, "status"),
            integrator: string(payload, "integrator"),
            created: timestamp(payload, "created"),
            updated: timestamp(payload, "updated"),
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
    fn test_decode_escrow() {
        let env = Envelope::from_value(json!({
            "status": "Success",
            "payload": {
                "id": "esc-1",
                "escrow_invoice_id": "inv-1",
                "status": "open",
                "created": "2023-05-06 07:08:09"
            }
        }));
        let escrow = decode::<Escrow>(&env);
        assert_eq!(escrow.id.as_deref(), Some("esc-1"));
        assert_eq!(escrow.escrow_invoice_id.as_deref(), Some("inv-1"));
        assert_eq!(escrow.status.as_deref(), Some("open"));
        assert!(escrow.created.is_some());
        assert!(escrow.commit_invoice_id.is_none());
    }
}
