use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::{boolean, field, int, list, string, timestamp};

/// An invoice, as returned by the invoice and escrow endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Invoice {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub failure_reason: Option<String>,
    pub summary: Option<InvoiceSummary>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub line_items: Vec<LineItem>,
    pub payment_methods: Vec<InvoicePaymentMethod>,
    pub subitems: Vec<SubItem>,
}

/// Totals across the whole invoice.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub total_amount: i64,
    pub currency: Option<String>,
    pub display_amount: Option<String>,
}

/// One purchased line.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LineItem {
    pub id: Option<String>,
    pub amount: i64,
    pub currency: Option<String>,
    pub transaction_type: Option<String>,
    pub product_sku: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub subitems: Vec<SubItem>,
    pub recipients: Vec<Recipient>,
}

/// A party receiving part of a line item.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Recipient {
    pub amount: i64,
    pub currency: Option<String>,
    pub integrator_revenue: bool,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub source_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
}

/// A single money movement inside an invoice.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SubItem {
    pub id: Option<String>,
    pub amount: i64,
    pub currency: Option<String>,
    pub display_amount: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub source_account_id: Option<String>,
    pub source_payment_method_id: Option<String>,
    pub source_wallet_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub destination_payment_method_id: Option<String>,
    pub destination_wallet_id: Option<String>,
}

/// A payment method charged by an invoice.
///
/// Unrelated to [`AccountPaymentMethod`](super::AccountPaymentMethod), which
/// describes a method stored on an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InvoicePaymentMethod {
    pub id: Option<String>,
    pub currency: Option<String>,
    pub amount: i64,
    pub authorized_amount: i64,
    pub display_amount: Option<String>,
    pub subitems: Vec<SubItem>,
}

impl EntityDecoder for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;

    fn from_json(payload: &Value) -> Self {
        Self {
            id: string(payload, "invoice_id"),
            account_id: string(payload, "account_id"),
            reference_type: string(payload, "reference_type"),
            reference_id: string(payload, "reference_id"),
            state: string(payload, "state"),
            description: string(payload, "description"),
            metadata: string(payload, "metadata"),
            failure_reason: string(payload, "failure_reason"),
            summary: field(payload, "summary").map(InvoiceSummary::from_json),
            created: timestamp(payload, "created"),
            updated: timestamp(payload, "updated"),
            line_items: list(payload, "line_items")
                .into_iter()
                .map(LineItem::from_json)
                .collect(),
            payment_methods: list(payload, "payment_methods")
                .into_iter()
                .map(InvoicePaymentMethod::from_json)
                .collect(),
            subitems: subitems(payload),
        }
    }
}

impl InvoiceSummary {
    fn from_json(summary: &Value) -> Self {
        Self {
            total_amount: int(summary, "total_amount").unwrap_or_default(),
            currency: string(summary, "currency"),
            display_amount: string(summary, "display_amount"),
        }
    }
}

impl LineItem {
    fn from_json(item: &Value) -> Self {
        Self {
            id: string(item, "line_item_id"),
            amount: int(item, "amount").unwrap_or_default(),
            currency: string(item, "currency"),
            transaction_type: string(item, "transaction_type"),
            product_sku: string(item, "product_sku"),
            reference_type: string(item, "reference_type"),
            reference_id: string(item, "reference_id"),
            description: string(item, "description"),
            metadata: string(item, "metadata"),
            subitems: subitems(item),
            recipients: list(item, "recipients")
                .into_iter()
                .map(Recipient::from_json)
                .collect(),
        }
    }
}

impl Recipient {
    fn from_json(recipient: &Value) -> Self {
        Self {
            amount: int(recipient, "amount").unwrap_or_default(),
            currency: string(recipient, "currency"),
            integrator_revenue: boolean(recipient, "integrator_revenue").unwrap_or_default(),
            reference_type: string(recipient, "reference_type"),
            reference_id: string(recipient, "reference_id"),
            description: string(recipient, "description"),
            metadata: string(recipient, "metadata"),
            source_wallet_id: string(recipient, "source_wallet_id"),
            destination_wallet_id: string(recipient, "destination_wallet_id"),
        }
    }
}

impl SubItem {
    fn from_json(item: &Value) -> Self {
        Self {
            id: string(item, "subitem_id"),
            amount: int(item, "amount").unwrap_or_default(),
            currency: string(item, "currency"),
            display_amount: string(item, "display_amount"),
            reference_type: string(item, "reference_type"),
            reference_id: string(item, "reference_id"),
            description: string(item, "description"),
            metadata: string(item, "metadata"),
            source_account_id: string(item, "source_account_id"),
            source_payment_method_id: string(item, "source_payment_method_id"),
            source_wallet_id: string(item, "source_wallet_id"),
            destination_account_id: string(item, "destination_account_id"),
            destination_payment_method_id: string(item, "destination_payment_method_id"),
            destination_wallet_id: string(item, "destination_wallet_id"),
        }
    }
}

impl InvoicePaymentMethod {
    fn from_json(method: &Value) -> Self {
        Self {
            id: string(method, "payment_method_id"),
            currency: string(method, "currency"),
            amount: int(method, "amount").unwrap_or_default(),
            authorized_amount: int(method, "authorized_amount").unwrap_or_default(),
            display_amount: string(method, "display_amount"),
            subitems: subitems(method),
        }
    }
}

fn subitems(parent: &Value) -> Vec<SubItem> {
    list(parent, "subitems")
        .into_iter()
        .map(SubItem::from_json)
        .collect()
}
