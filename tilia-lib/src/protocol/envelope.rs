//! The response envelope shared by every non-token endpoint.
//!
//! Wire shape:
//!
//! ```json
//! {"status": "Success", "message": ["..."], "codes": ["..."], "payload": {}, "web_response_code": 200}
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::fields;

/// Error key used when a failed response carries a bare string payload.
pub const GENERAL_ERROR_KEY: &str = "general";

/// Value of the envelope's `status` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    /// `"Success"`
    Success,
    /// `"Failed"`
    Failed,
    /// Any other non-empty status string.
    Other(String),
}

impl ResponseStatus {
    /// Parse a status string. Empty strings are treated as absent.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => None,
            "Success" => Some(Self::Success),
            "Failed" => Some(Self::Failed),
            other => Some(Self::Other(other.to_string())),
        }
    }
}

/// Fields every decoded response carries, whatever the entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    /// Absent for empty or malformed responses.
    pub status: Option<ResponseStatus>,
    /// Human-readable messages.
    pub messages: Vec<String>,
    /// Machine-readable codes.
    pub codes: Vec<String>,
    /// HTTP status of the response.
    pub transport_code: u16,
    /// Field name to messages. Only set when `status` is `Failed`.
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ResponseMeta {
    /// A status was present. `false` means the response was empty or malformed.
    pub fn received(&self) -> bool {
        self.status.is_some()
    }

    /// The service reported a failure.
    pub fn failed(&self) -> bool {
        self.status == Some(ResponseStatus::Failed)
    }

    /// The service reported success.
    pub fn succeeded(&self) -> bool {
        self.status == Some(ResponseStatus::Success)
    }
}

/// A parsed response: the common fields plus the untouched payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Common response fields.
    pub meta: ResponseMeta,
    /// The entity-specific `payload` value, if present and non-null.
    pub payload: Option<Value>,
    root: Value,
}

impl Envelope {
    /// Interpret an already-parsed JSON document.
    ///
    /// Non-object documents (for example a bare array) yield an envelope with
    /// no status whose [`root`](Self::root) is the document itself.
    pub fn from_value(root: Value) -> Self {
        let status = fields::string(&root, "status").and_then(|s| ResponseStatus::parse(&s));
        let transport_code = fields::int(&root, "web_response_code")
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or_default();
        let payload = fields::field(&root, "payload").cloned();

        let errors = if status == Some(ResponseStatus::Failed) {
            Some(extract_errors(payload.as_ref()))
        } else {
            None
        };

        Self {
            meta: ResponseMeta {
                status,
                messages: fields::string_list(&root, "message"),
                codes: fields::string_list(&root, "codes"),
                transport_code,
                errors,
            },
            payload,
            root,
        }
    }

    /// Parse a response body.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body).map(Self::from_value)
    }

    /// The `{status: Failed}` envelope stood in for a response the server
    /// sends without a usable body.
    pub fn synthesized_failure(transport_code: u16) -> Self {
        Self::from_value(json!({
            "status": "Failed",
            "web_response_code": transport_code,
        }))
    }

    /// An envelope for an empty body: no status, only the transport code.
    pub fn empty(transport_code: u16) -> Self {
        Self::from_value(json!({ "web_response_code": transport_code }))
    }

    /// Record the HTTP status the envelope arrived with.
    pub fn with_transport_code(mut self, transport_code: u16) -> Self {
        self.meta.transport_code = transport_code;
        self
    }

    /// The whole parsed document.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// See [`ResponseMeta::received`].
    pub fn received(&self) -> bool {
        self.meta.received()
    }

    /// See [`ResponseMeta::failed`].
    pub fn failed(&self) -> bool {
        self.meta.failed()
    }

    /// See [`ResponseMeta::succeeded`].
    pub fn succeeded(&self) -> bool {
        self.meta.succeeded()
    }
}

/// Collect error detail from the payload of a failed response.
///
/// The payload is either a bare message string or an object whose `errors`
/// member maps field names to lists of messages.
fn extract_errors(payload: Option<&Value>) -> BTreeMap<String, Vec<String>> {
    let mut errors = BTreeMap::new();
    match payload {
        Some(Value::String(message)) if !message.is_empty() => {
            errors.insert(GENERAL_ERROR_KEY.to_string(), vec![message.clone()]);
        }
        Some(payload @ Value::Object(_)) => {
            if let Some(Value::Object(map)) = fields::field(payload, "errors") {
                for (name, messages) in map {
                    let messages = match messages {
                        Value::String(s) => vec![s.clone()],
                        other => fields::elements(other)
                            .into_iter()
                            .map(fields::as_text)
                            .collect(),
                    };
                    errors.insert(name.clone(), messages);
                }
            }
        }
        _ => {}
    }
    errors
}
