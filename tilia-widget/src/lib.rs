//! Browser-mediated Tilia flows.
//!
//! Purchases, payouts, identity verification and terms acceptance run inside
//! the Tilia widget, a web page hosted in a browser the application embeds.
//! [`WidgetFlowController`] starts a flow by running the widget's loader
//! script through a [`BrowserBridge`] and completes it when the browser
//! reports a result, either as a JSON URL fragment after a redirect or as a
//! message posted by the page.
//!
//! ```no_run
//! use tilia_widget::{BrowserBridge, BrowserEvent, WidgetFlowController};
//!
//! struct Webview;
//!
//! impl BrowserBridge for Webview {
//!     fn navigate(&mut self, _url: &str) {}
//!     fn execute_script(&mut self, _script: &str) {}
//! }
//!
//! let mut controller = WidgetFlowController::new(Webview);
//! controller.attach(tilia_lib::config::STAGING_WIDGET_URL);
//! controller.begin_kyc("https://example.com/done", |kyc| {
//!     println!("verification finished: {:?}", kyc.result);
//! });
//! controller.handle_event(BrowserEvent::ScriptMessage(
//!     r#"{"result":"kyc","payload":{"state":"complete","result":"verified"}}"#.to_string(),
//! ));
//! ```

pub mod bridge;
pub mod controller;
pub mod error;

pub use bridge::{
    load_widget_script, parse_navigation, parse_script_message, BrowserBridge, BrowserEvent,
};
pub use controller::{FlowState, WidgetFlowController};
pub use error::{Result, WidgetError};
pub use tilia_lib::{FlowKind, WidgetResult};
