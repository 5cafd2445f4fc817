use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::{self, field, int, string, timestamp};
use crate::protocol::Envelope;

/// A payout from an account wallet to an external payment method.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Payout {
    /// `payout_id` from the single-payout endpoint, `payout_status_id` from the list.
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub credit_id: Option<String>,
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub credit: Option<Credit>,
}

/// Credit detail of a payout.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Credit {
    pub destination_payment_method_id: Option<String>,
    pub amount: i64,
    pub fee_amount: i64,
    pub currency: Option<String>,
    pub status: Option<String>,
}

/// Payouts of one account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PayoutList {
    pub payouts: Vec<Payout>,
}

/// Payout endpoints sometimes omit the payload wrapper; the document itself
/// is then the payout (or the list of payouts).
fn payload_or_root(envelope: &Envelope) -> Option<&Value> {
    if envelope.failed() {
        return None;
    }
    envelope
        .payload
        .as_ref()
        .or_else(|| Some(envelope.root()).filter(|root| !root.is_null()))
}

fn is_single_payout(value: &Value) -> bool {
    field(value, "payout_id").is_some() || field(value, "payout_status_id").is_some()
}

impl EntityDecoder for Payout {
    const KIND: EntityKind = EntityKind::Payout;

    fn from_json(payload: &Value) -> Self {
        Self {
            id: string(payload, "payout_id").or_else(|| string(payload, "payout_status_id")),
            account_id: string(payload, "account_id"),
            credit_id: string(payload, "credit_id"),
            status: string(payload, "status"),
            created: timestamp(payload, "created"),
            updated: timestamp(payload, "updated"),
            credit: field(payload, "credit").map(Credit::from_json),
        }
    }

    fn payload_root(envelope: &Envelope) -> Option<&Value> {
        payload_or_root(envelope)
    }
}

impl Credit {
    fn from_json(credit: &Value) -> Self {
        Self {
            destination_payment_method_id: string(credit, "destination_payment_method_id"),
            amount: int(credit, "amount").unwrap_or_default(),
            fee_amount: int(credit, "fee_amount").unwrap_or_default(),
            currency: string(credit, "currency"),
            status: string(credit, "status"),
        }
    }
}

impl EntityDecoder for PayoutList {
    const KIND: EntityKind = EntityKind::PayoutList;

    fn from_json(root: &Value) -> Self {
        let payouts = if is_single_payout(root) {
            vec![Payout::from_json(root)]
        } else {
            fields::elements(root)
                .into_iter()
                .filter(|item| item.is_object())
                .map(Payout::from_json)
                .collect()
        };
        Self { payouts }
    }

    fn payload_root(envelope: &Envelope) -> Option<&Value> {
        payload_or_root(envelope)
    }
}

impl PayoutList {
    /// Number of payouts.
    pub fn len(&self) -> usize {
        self.payouts.len()
    }

    /// Whether no payouts were returned.
    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }
}
