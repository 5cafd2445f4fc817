//! Request bodies.

use serde::Serialize;

const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// A user to register.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Terms of service accepted. Omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tos: Option<bool>,
    #[serde(skip_serializing_if = "is_blank")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tracking_id: Option<String>,
}

impl NewUser {
    /// Create a registration request.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Record terms of service acceptance.
    pub fn with_tos(mut self, accepted: bool) -> Self {
        self.tos = Some(accepted);
        self
    }

    /// Attach integrator metadata.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Attach a tracking id.
    pub fn with_tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }
}

/// An amount to charge against one payment method.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub payment_method_id: String,
    pub amount: i64,
}

impl PaymentRequest {
    /// Charge `amount` to `payment_method_id`.
    pub fn new(payment_method_id: impl Into<String>, amount: i64) -> Self {
        Self {
            payment_method_id: payment_method_id.into(),
            amount,
        }
    }
}

/// An invoice (or escrow) to create.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewInvoice {
    pub account_id: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub payment_methods: Vec<PaymentRequest>,
    pub line_items: Vec<NewLineItem>,
}

impl NewInvoice {
    /// Create an empty invoice for `account_id`.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    /// Set the integrator reference.
    pub fn with_reference(
        mut self,
        reference_type: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        self.reference_type = Some(reference_type.into());
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a payment method.
    pub fn with_payment(mut self, payment: PaymentRequest) -> Self {
        self.payment_methods.push(payment);
        self
    }

    /// Add a line item.
    pub fn with_line_item(mut self, item: NewLineItem) -> Self {
        self.line_items.push(item);
        self
    }
}

/// A line of a new invoice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewLineItem {
    pub amount: i64,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub product_sku: Option<String>,
    pub transaction_type: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub recipients: Vec<NewRecipient>,
}

impl Default for NewLineItem {
    fn default() -> Self {
        Self {
            amount: 0,
            currency: default_currency(),
            description: None,
            metadata: None,
            product_sku: None,
            transaction_type: None,
            reference_type: None,
            reference_id: None,
            recipients: Vec::new(),
        }
    }
}

impl NewLineItem {
    /// A line of `amount` in USD.
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the product SKU.
    pub fn with_product_sku(mut self, sku: impl Into<String>) -> Self {
        self.product_sku = Some(sku.into());
        self
    }

    /// Set the transaction type, e.g. `user_to_integrator`.
    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// Set the integrator reference.
    pub fn with_reference(
        mut self,
        reference_type: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        self.reference_type = Some(reference_type.into());
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Add a recipient.
    pub fn with_recipient(mut self, recipient: NewRecipient) -> Self {
        self.recipients.push(recipient);
        self
    }
}

/// A party paid out of a new line item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewRecipient {
    pub amount: i64,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub currency: String,
    pub source_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub integrator_revenue: bool,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
}

impl Default for NewRecipient {
    fn default() -> Self {
        Self {
            amount: 0,
            description: None,
            metadata: None,
            currency: default_currency(),
            source_wallet_id: None,
            destination_wallet_id: None,
            integrator_revenue: false,
            reference_type: None,
            reference_id: None,
        }
    }
}

impl NewRecipient {
    /// A recipient of `amount` in USD.
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Route between two wallets.
    pub fn with_wallets(
        mut self,
        source_wallet_id: impl Into<String>,
        destination_wallet_id: impl Into<String>,
    ) -> Self {
        self.source_wallet_id = Some(source_wallet_id.into());
        self.destination_wallet_id = Some(destination_wallet_id.into());
        self
    }

    /// Mark the amount as integrator revenue.
    pub fn with_integrator_revenue(mut self, integrator_revenue: bool) -> Self {
        self.integrator_revenue = integrator_revenue;
        self
    }
}

/// A payout to create.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPayout {
    pub source_payment_method_id: String,
    pub destination_payment_method_id: String,
    pub amount: i64,
    pub currency: String,
}

impl NewPayout {
    /// Move `amount` USD from one payment method to another.
    pub fn new(
        source_payment_method_id: impl Into<String>,
        destination_payment_method_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            source_payment_method_id: source_payment_method_id.into(),
            destination_payment_method_id: destination_payment_method_id.into(),
            amount,
            currency: default_currency(),
        }
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Body of the user redirect request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct RedirectRequest<'a> {
    pub account_id: &'a str,
    pub scopes: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_new_user_omits_unset_optionals() {
        let user = NewUser::new("sam", "pw", "sam@example.com").with_metadata("");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"username": "sam", "password": "pw", "email": "sam@example.com"})
        );

        let user = user.with_tos(true).with_tracking_id("t-1");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["tos"], json!(true));
        assert_eq!(value["tracking_id"], json!("t-1"));
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_new_invoice_wire_shape() {
        let invoice = NewInvoice::new("acc-1")
            .with_reference("order", "o-1")
            .with_payment(PaymentRequest::new("pm-1", 500))
            .with_line_item(
                NewLineItem::new(500)
                    .with_product_sku("sku-1")
                    .with_transaction_type("user_to_integrator")
                    .with_recipient(NewRecipient::new(50).with_integrator_revenue(true)),
            );
        let value = serde_json::to_value(&invoice).unwrap();

        assert_eq!(value["account_id"], json!("acc-1"));
        assert_eq!(value["description"], Value::Null);
        assert_eq!(
            value["payment_methods"],
            json!([{"payment_method_id": "pm-1", "amount": 500}])
        );
        let line = &value["line_items"][0];
        assert_eq!(line["currency"], json!("USD"));
        assert_eq!(line["product_sku"], json!("sku-1"));
        assert_eq!(line["recipients"][0]["integrator_revenue"], json!(true));
        assert_eq!(line["recipients"][0]["currency"], json!("USD"));
    }

    #[test]
    fn test_new_payout_wire_shape() {
        let payout = NewPayout::new("src", "dst", 1000);
        assert_eq!(
            serde_json::to_value(&payout).unwrap(),
            json!({
                "source_payment_method_id": "src",
                "destination_payment_method_id": "dst",
                "amount": 1000,
                "currency": "USD"
            })
        );
    }

    #[test]
    fn test_redirect_request() {
        let scopes = vec!["user_info".to_string()];
        let body = RedirectRequest {
            account_id: "acc-1",
            scopes: &scopes,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"account_id": "acc-1", "scopes": ["user_info"]})
        );
    }
}
