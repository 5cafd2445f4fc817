//! Typed results decoded from response envelopes.
//!
//! Each entity implements [`EntityDecoder`]: one function that reads the
//! entity's fields from a JSON root, and a hook choosing which part of the
//! envelope that root is. [`decode`] composes the two with the envelope's
//! common fields into an [`ApiResponse`].
//!
//! Decoders are lenient. Missing keys, nulls and unparsable numbers or dates
//! leave the field unset (or zero for amounts) instead of failing.

mod account;
mod escrow;
mod input;
mod invoice;
mod payment_methods;
mod payout;
mod widget;

use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;

use crate::protocol::{Envelope, ResponseMeta};

pub use account::{KycStatus, Registration, User, UserAuth};
pub use escrow::Escrow;
pub use input::{NewInvoice, NewLineItem, NewPayout, NewRecipient, NewUser, PaymentRequest};
pub use invoice::{Invoice, InvoicePaymentMethod, InvoiceSummary, LineItem, Recipient, SubItem};
pub use payment_methods::{AccountPaymentMethod, PaymentMethods};
pub use payout::{Credit, Payout, PayoutList};
pub(crate) use input::RedirectRequest;
pub use widget::{
    FlowKind, WidgetKyc, WidgetPayout, WidgetPurchase, WidgetResult, WidgetState, WidgetTos,
};

/// Closed set of decodable entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Bare envelope with no entity fields.
    Envelope,
    /// Registered user.
    Registration,
    /// User account details.
    User,
    /// Identity verification status.
    Kyc,
    /// Redirect issued for a user.
    UserAuth,
    /// Payment methods of an account.
    PaymentMethods,
    /// Invoice.
    Invoice,
    /// Escrow.
    Escrow,
    /// Single payout.
    Payout,
    /// Payouts of an account.
    PayoutList,
    /// Result reported by a widget flow.
    Widget(FlowKind),
}

/// Decoding of one entity type.
pub trait EntityDecoder: Default + Sized {
    /// Tag used in logs.
    const KIND: EntityKind;

    /// Read the entity's fields from `root`.
    fn from_json(root: &Value) -> Self;

    /// Part of the envelope the entity is read from.
    ///
    /// Defaults to the payload of any response that did not fail.
    fn payload_root(envelope: &Envelope) -> Option<&Value> {
        if envelope.failed() {
            None
        } else {
            envelope.payload.as_ref()
        }
    }
}

/// A decoded response: the common envelope fields and the entity.
///
/// Dereferences to the entity, so `response.id` reads the entity's field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    /// Common response fields.
    pub meta: ResponseMeta,
    /// The decoded entity. All fields unset when nothing could be decoded.
    pub data: T,
}

impl<T> ApiResponse<T> {
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

    /// Discard the envelope fields.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> Deref for ApiResponse<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Decode an envelope into an entity.
pub fn decode<T: EntityDecoder>(envelope: &Envelope) -> ApiResponse<T> {
    let data = match T::payload_root(envelope) {
        Some(root) => T::from_json(root),
        None => {
            tracing::debug!(kind = ?T::KIND, failed = envelope.failed(), "no payload to decode");
            T::default()
        }
    };
    ApiResponse {
        meta: envelope.meta.clone(),
        data,
    }
}

impl EntityDecoder for () {
    const KIND: EntityKind = EntityKind::Envelope;

    fn from_json(_root: &Value) -> Self {}
}
