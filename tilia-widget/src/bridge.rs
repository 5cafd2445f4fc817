//! Boundary between the flow controller and the embedded browser.
//!
//! The host owns the browser. It implements [`BrowserBridge`] so the
//! controller can drive it, and forwards what the browser reports back as
//! [`BrowserEvent`]s.

use serde_json::Value;
use tilia_lib::FlowKind;

use crate::error::{Result, WidgetError};

/// Name of the loader function exposed by the widget page.
pub const LOADER_FUNCTION: &str = "LoadTiliaWidget";

/// Commands the controller issues to the browser.
pub trait BrowserBridge {
    /// Load `url` in the browser.
    fn navigate(&mut self, url: &str);

    /// Run `script` in the currently loaded page.
    fn execute_script(&mut self, script: &str);
}

/// Something the browser reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserEvent {
    /// The page navigated to this URL.
    PageNavigated(String),
    /// The page posted this message to the host.
    ScriptMessage(String),
}

/// Script that starts `kind` in the widget page, returning to `redirect_url`.
pub fn load_widget_script(kind: FlowKind, redirect_url: &str) -> String {
    format!(
        "{}('{}', '{}');",
        LOADER_FUNCTION,
        kind.as_str(),
        escape_js(redirect_url)
    )
}

/// Extract the widget message carried in a URL fragment.
///
/// Browsers may percent-encode the fragment, so a fragment that is not JSON
/// as-is is decoded once and parsed again.
pub fn parse_navigation(url: &str) -> Result<Value> {
    let (_, fragment) = url.split_once('#').ok_or(WidgetError::NoFragment)?;
    match parse_script_message(fragment) {
        Err(WidgetError::Malformed(reason)) => match urlencoding::decode(fragment) {
            Ok(decoded) if decoded != fragment => parse_script_message(&decoded),
            _ => Err(WidgetError::Malformed(reason)),
        },
        other => other,
    }
}

/// Parse a message posted by the widget page.
pub fn parse_script_message(raw: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| WidgetError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(WidgetError::Malformed("expected a JSON object".to_string()));
    }
    match value.get("result") {
        Some(result) if !result.is_null() => Ok(value),
        _ => Err(WidgetError::MissingResult),
    }
}

fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
