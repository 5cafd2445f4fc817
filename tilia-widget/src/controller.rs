//! Single-flight state machine for widget flows.

use std::fmt;

use serde_json::Value;
use tilia_lib::entities::{EntityDecoder, WidgetKyc, WidgetPayout, WidgetPurchase, WidgetTos};
use tilia_lib::{FlowKind, WidgetResult};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::bridge::{
    load_widget_script, parse_navigation, parse_script_message, BrowserBridge, BrowserEvent,
};
use crate::error::Result;

type Completion = Box<dyn FnOnce(&Value) + Send>;

/// Observable state of a [`WidgetFlowController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
    /// No flow is running.
    Idle,
    /// A flow of this kind is waiting for the widget to report back.
    Pending(FlowKind),
}

enum Slot {
    Idle,
    Pending { kind: FlowKind, on_complete: Completion },
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Pending { kind, .. } => f.debug_tuple("Pending").field(kind).finish(),
        }
    }
}

/// Drives one browser through widget flows, at most one at a time.
///
/// While a flow is pending, further `begin_*` calls are dropped. The slot is
/// freed only by a widget result arriving from the browser; there is no
/// timeout, so a flow whose result never arrives blocks later flows.
pub struct WidgetFlowController<B> {
    bridge: B,
    slot: Slot,
}

impl<B: BrowserBridge> WidgetFlowController<B> {
    /// Wrap a bridge. The controller starts idle.
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            slot: Slot::Idle,
        }
    }

    /// Load the widget page into the browser.
    pub fn attach(&mut self, widget_url: &str) {
        info!(url = widget_url, "Loading widget page");
        self.bridge.navigate(widget_url);
    }

    /// Current state.
    pub fn state(&self) -> FlowState {
        match &self.slot {
            Slot::Idle => FlowState::Idle,
            Slot::Pending { kind, .. } => FlowState::Pending(*kind),
        }
    }

    /// Whether a flow is pending.
    pub fn is_pending(&self) -> bool {
        matches!(self.slot, Slot::Pending { .. })
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Start a flow of `kind`. `on_complete` fires once with the result.
    ///
    /// Returns `false`, leaving the pending flow untouched, if a flow is
    /// already running.
    pub fn begin_flow<F>(&mut self, kind: FlowKind, redirect_url: &str, on_complete: F) -> bool
    where
        F: FnOnce(WidgetResult) + Send + 'static,
    {
        self.start(
            kind,
            redirect_url,
            Box::new(move |payload| on_complete(WidgetResult::decode(kind, payload))),
        )
    }

    /// Start a flow of `kind` and await its result instead of passing a callback.
    ///
    /// Returns `None` if a flow is already running. The receiver errors if the
    /// controller is dropped before the widget reports back.
    pub fn begin_flow_async(
        &mut self,
        kind: FlowKind,
        redirect_url: &str,
    ) -> Option<oneshot::Receiver<WidgetResult>> {
        let (tx, rx) = oneshot::channel();
        let started = self.begin_flow(kind, redirect_url, move |result| {
            // Receiver may have been dropped; nothing to report to.
            let _ = tx.send(result);
        });
        started.then_some(rx)
    }

    /// Start a purchase flow.
    pub fn begin_purchase<F>(&mut self, redirect_url: &str, on_complete: F) -> bool
    where
        F: FnOnce(WidgetPurchase) + Send + 'static,
    {
        self.begin_typed(FlowKind::Purchase, redirect_url, on_complete)
    }

    /// Start a payout flow.
    pub fn begin_payout<F>(&mut self, redirect_url: &str, on_complete: F) -> bool
    where
        F: FnOnce(WidgetPayout) + Send + 'static,
    {
        self.begin_typed(FlowKind::Payout, redirect_url, on_complete)
    }

    /// Start an identity verification flow.
    pub fn begin_kyc<F>(&mut self, redirect_url: &str, on_complete: F) -> bool
    where
        F: FnOnce(WidgetKyc) + Send + 'static,
    {
        self.begin_typed(FlowKind::Kyc, redirect_url, on_complete)
    }

    /// Start a terms of service flow.
    pub fn begin_tos<F>(&mut self, redirect_url: &str, on_complete: F) -> bool
    where
        F: FnOnce(WidgetTos) + Send + 'static,
    {
        self.begin_typed(FlowKind::Tos, redirect_url, on_complete)
    }

    /// Feed a browser event to the controller.
    ///
    /// Returns `true` if it completed the pending flow. Events that carry no
    /// widget result are logged and leave the state unchanged.
    pub fn handle_event(&mut self, event: BrowserEvent) -> bool {
        let parsed: Result<Value> = match &event {
            BrowserEvent::PageNavigated(url) => parse_navigation(url),
            BrowserEvent::ScriptMessage(raw) => parse_script_message(raw),
        };
        match parsed {
            Ok(message) => self.receive_payload(&message),
            Err(e) => {
                debug!(error = %e, state = ?self.slot, "Ignoring browser event");
                false
            }
        }
    }

    /// Complete the pending flow with a parsed widget message.
    ///
    /// The message's `payload` is decoded for the pending flow's kind and
    /// handed to the stored callback. The slot is released before the
    /// callback runs, so a callback that panics still leaves the controller
    /// idle instead of stuck in `Pending`. Returns `false` if no flow was
    /// pending.
    pub fn receive_payload(&mut self, message: &Value) -> bool {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => {
                let result = message.get("result").and_then(Value::as_str);
                info!(result, "Widget result with no pending flow");
                false
            }
            Slot::Pending { kind, on_complete } => {
                info!(flow = %kind, "Widget flow finished");
                on_complete(message.get("payload").unwrap_or(&Value::Null));
                true
            }
        }
    }

    fn begin_typed<T, F>(&mut self, kind: FlowKind, redirect_url: &str, on_complete: F) -> bool
    where
        T: EntityDecoder + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.start(
            kind,
            redirect_url,
            Box::new(move |payload| on_complete(T::from_json(payload))),
        )
    }

    fn start(&mut self, kind: FlowKind, redirect_url: &str, on_complete: Completion) -> bool {
        if let Slot::Pending { kind: pending, .. } = &self.slot {
            warn!(requested = %kind, pending = %pending, "Widget flow already pending, ignoring");
            return false;
        }
        info!(flow = %kind, redirect = redirect_url, "Starting widget flow");
        self.slot = Slot::Pending { kind, on_complete };
        self.bridge.execute_script(&load_widget_script(kind, redirect_url));
        true
    }
}

impl<B> fmt::Debug for WidgetFlowController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetFlowController")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        scripts: Vec<String>,
        urls: Vec<String>,
    }

    impl BrowserBridge for Recorder {
        fn navigate(&mut self, url: &str) {
            self.urls.push(url.to_string());
        }

        fn execute_script(&mut self, script: &str) {
            self.scripts.push(script.to_string());
        }
    }

    #[test]
    fn test_begin_flow_runs_loader() {
        let mut controller = WidgetFlowController::new(Recorder::default());
        controller.attach("https://example/widget");
        assert_eq!(controller.bridge().urls, vec!["https://example/widget".to_string()]);
        assert!(controller.begin_flow(FlowKind::Purchase, "https://example/r", |_| {}));
        assert_eq!(controller.state(), FlowState::Pending(FlowKind::Purchase));
        assert_eq!(
            controller.bridge().scripts,
            vec!["LoadTiliaWidget('purchase', 'https://example/r');".to_string()]
        );
    }

    #[test]
    fn test_payload_without_inner_payload_decodes_empty() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let mut controller = WidgetFlowController::new(Recorder::default());
        controller.begin_tos("https://example/r", move |tos| {
            *sink.lock().unwrap() = Some(tos);
        });

        assert!(controller.receive_payload(&json!({"result": "tos"})));
        let tos = seen.lock().unwrap().take().unwrap();
        assert!(tos.state.is_none());
        assert_eq!(controller.state(), FlowState::Idle);
    }

    #[test]
    fn test_idle_payload_with_non_string_result() {
        let mut controller = WidgetFlowController::new(Recorder::default());
        assert!(!controller.receive_payload(&json!({"result": 7, "payload": {}})));
        assert_eq!(controller.state(), FlowState::Idle);
    }

    #[test]
    fn test_panicking_callback_releases_slot() {
        let mut controller = WidgetFlowController::new(Recorder::default());
        controller.begin_flow(FlowKind::Payout, "https://example/r", |_| {
            panic!("host callback failed");
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            controller.receive_payload(&json!({"result": "payout", "payload": {}}))
        }));
        assert!(outcome.is_err());
        assert_eq!(controller.state(), FlowState::Idle);
        assert!(controller.begin_flow(FlowKind::Kyc, "https://example/r", |_| {}));
    }

    #[test]
    fn test_debug_hides_callback() {
        let mut controller = WidgetFlowController::new(Recorder::default());
        controller.begin_flow(FlowKind::Kyc, "https://example/r", |_| {});
        let debug = format!("{:?}", controller);
        assert!(debug.contains("Pending(Kyc)"));
    }
}
