//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use tilia_lib::prelude::*;
//! ```

// Client and configuration
pub use crate::{ClientInfo, Environment, EnvironmentConfig, TiliaClient, TiliaConfig};

// Error handling
pub use crate::errors::{TiliaError, TiliaErrorCode};
pub use crate::Result;

// Results
pub use crate::entities::{
    ApiResponse, Escrow, FlowKind, Invoice, KycStatus, PaymentMethods, Payout, PayoutList,
    Registration, User, UserAuth, WidgetKyc, WidgetPayout, WidgetPurchase, WidgetResult,
    WidgetTos,
};

// Request bodies
pub use crate::entities::{
    NewInvoice, NewLineItem, NewPayout, NewRecipient, NewUser, PaymentRequest,
};

// Transport
pub use crate::transport::{HttpTransport, ReqwestTransport};
