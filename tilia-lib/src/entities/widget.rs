use std::fmt;
use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;

use super::{EntityDecoder, EntityKind};
use crate::protocol::fields::string;

/// A browser-mediated flow the widget can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Pay an invoice.
    Purchase,
    /// Withdraw to an external payment method.
    Payout,
    /// Identity verification.
    Kyc,
    /// Terms of service acceptance.
    Tos,
}

impl FlowKind {
    /// Name passed to the widget loader.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Payout => "payout",
            Self::Kyc => "kyc",
            Self::Tos => "tos",
        }
    }

    /// Parse a flow name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "purchase" => Some(Self::Purchase),
            "payout" => Some(Self::Payout),
            "kyc" => Some(Self::Kyc),
            "tos" => Some(Self::Tos),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every widget result carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WidgetState {
    pub state: Option<String>,
    pub source: Option<String>,
    pub event: Option<String>,
}

impl WidgetState {
    fn from_json(payload: &Value) -> Self {
        Self {
            state: string(payload, "state"),
            source: string(payload, "source"),
            event: string(payload, "event"),
        }
    }

    /// The user finished the flow.
    pub fn completed(&self) -> bool {
        self.state.as_deref() == Some("complete")
    }

    /// The user backed out of the flow.
    pub fn canceled(&self) -> bool {
        self.state.as_deref() == Some("cancel")
    }
}

/// Result of a purchase flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WidgetPurchase {
    #[serde(flatten)]
    pub widget: WidgetState,
    pub id: Option<String>,
    pub psp_reference: Option<String>,
    pub pm_state: Option<String>,
}

/// Result of a payout flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WidgetPayout {
    #[serde(flatten)]
    pub widget: WidgetState,
    pub id: Option<String>,
    pub psp_reference: Option<String>,
    pub pm_state: Option<String>,
}

/// Result of an identity verification flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WidgetKyc {
    #[serde(flatten)]
    pub widget: WidgetState,
    /// Verification outcome.
    pub result: Option<String>,
}

/// Result of a terms of service flow. Carries only the common fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WidgetTos {
    #[serde(flatten)]
    pub widget: WidgetState,
}

macro_rules! widget_result {
    ($ty:ident, $flow:ident, |$payload:ident| { $($field:ident: $value:expr),* $(,)? }) => {
        impl EntityDecoder for $ty {
            const KIND: EntityKind = EntityKind::Widget(FlowKind::$flow);

            fn from_json($payload: &Value) -> Self {
                Self {
                    widget: WidgetState::from_json($payload),
                    $($field: $value,)*
                }
            }
        }

        impl Deref for $ty {
            type Target = WidgetState;

            fn deref(&self) -> &WidgetState {
                &self.widget
            }
        }

        impl From<$ty> for WidgetResult {
            fn from(result: $ty) -> Self {
                WidgetResult::$flow(result)
            }
        }
    };
}

widget_result!(WidgetPurchase, Purchase, |p| {
    id: string(p, "id"),
    psp_reference: string(p, "psp_reference"),
    pm_state: string(p, "pm_state"),
});

widget_result!(WidgetPayout, Payout, |p| {
    id: string(p, "id"),
    psp_reference: string(p, "psp_reference"),
    pm_state: string(p, "pm_state"),
});

widget_result!(WidgetKyc, Kyc, |p| {
    result: string(p, "result"),
});

widget_result!(WidgetTos, Tos, |p| {});

/// A decoded widget result of any flow kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "flow", rename_all = "lowercase")]
pub enum WidgetResult {
    Purchase(WidgetPurchase),
    Payout(WidgetPayout),
    Kyc(WidgetKyc),
    Tos(WidgetTos),
}

impl WidgetResult {
    /// Decode `payload` with the decoder for `kind`.
    pub fn decode(kind: FlowKind, payload: &Value) -> Self {
        match kind {
            FlowKind::Purchase => Self::Purchase(WidgetPurchase::from_json(payload)),
            FlowKind::Payout => Self::Payout(WidgetPayout::from_json(payload)),
            FlowKind::Kyc => Self::Kyc(WidgetKyc::from_json(payload)),
            FlowKind::Tos => Self::Tos(WidgetTos::from_json(payload)),
        }
    }

    /// Flow the result belongs to.
    pub fn kind(&self) -> FlowKind {
        match self {
            Self::Purchase(_) => FlowKind::Purchase,
            Self::Payout(_) => FlowKind::Payout,
            Self::Kyc(_) => FlowKind::Kyc,
            Self::Tos(_) => FlowKind::Tos,
        }
    }

    /// Common fields.
    pub fn widget(&self) -> &WidgetState {
        match self {
            Self::Purchase(r) => &r.widget,
            Self::Payout(r) => &r.widget,
            Self::Kyc(r) => &r.widget,
            Self::Tos(r) => &r.widget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flow_kind_names() {
        for kind in [FlowKind::Purchase, FlowKind::Payout, FlowKind::Kyc, FlowKind::Tos] {
            assert_eq!(FlowKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FlowKind::parse("refund"), None);
    }

    #[test]
    fn test_decode_kyc_result() {
        let result = WidgetResult::decode(
            FlowKind::Kyc,
            &json!({"state": "complete", "result": "verified"}),
        );
        assert_eq!(result.kind(), FlowKind::Kyc);
        assert!(result.widget().completed());
        match result {
            WidgetResult::Kyc(kyc) => assert_eq!(kyc.result.as_deref(), Some("verified")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_purchase_result() {
        let purchase = WidgetPurchase::from_json(&json!({
            "state": "cancel",
            "source": "tilia",
            "id": "inv-1",
            "psp_reference": "ref",
            "pm_state": "ok"
        }));
        assert!(purchase.canceled());
        assert!(!purchase.completed());
        assert_eq!(purchase.id.as_deref(), Some("inv-1"));
        assert_eq!(purchase.source.as_deref(), Some("tilia"));
    }

    #[test]
    fn test_tos_from_null_payload() {
        let tos = WidgetTos::from_json(&Value::Null);
        assert!(tos.state.is_none());
        assert!(!tos.completed());
    }
}
