//! Tilia client library.
//!
//! Talks to the Tilia payments and identity services: invoices, escrows,
//! payouts, user registration and lookup, identity verification and
//! payment methods. Responses arrive in a loosely shaped JSON envelope and
//! are decoded into typed entities that tolerate missing fields.
//!
//! # Features
//!
//! - **Token management**: client-credentials tokens are cached and refreshed
//!   five minutes before they expire
//! - **Lenient decoding**: absent keys and unparsable values never fail a call
//! - **Transport abstraction**: route requests through any [`HttpTransport`];
//!   the `http-transport` feature (on by default) provides one over `reqwest`
//!
//! # Example
//!
//! ```no_run
//! use tilia_lib::entities::{NewInvoice, NewLineItem, PaymentRequest};
//! use tilia_lib::{TiliaClient, TiliaConfig};
//!
//! # async fn run() -> tilia_lib::Result<()> {
//! let client = TiliaClient::new(TiliaConfig::staging("client-id", "client-secret"))?;
//!
//! let invoice = NewInvoice::new("account-id")
//!     .with_payment(PaymentRequest::new("payment-method-id", 500))
//!     .with_line_item(NewLineItem::new(500).with_product_sku("sku-1"));
//!
//! let response = client.create_invoice(&invoice).await?;
//! if response.failed() {
//!     eprintln!("invoice rejected: {:?}", response.meta.errors);
//! } else {
//!     println!("created invoice {:?}", response.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod entities;
pub mod errors;
pub mod prelude;
pub mod protocol;
mod token;
pub mod transport;

pub use client::TiliaClient;
pub use config::{ClientInfo, Environment, EnvironmentConfig, TiliaConfig};
pub use entities::{ApiResponse, FlowKind, WidgetResult};
pub use errors::{TiliaError, TiliaErrorCode};
pub use protocol::{Envelope, ResponseMeta, ResponseStatus};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Common result alias for Tilia operations.
pub type Result<T> = std::result::Result<T, TiliaError>;

/// Version reported in the client-identification headers.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
