//! Tilia wire protocol conventions.
//!
//! This module is the single source of truth for:
//! - Request URL construction
//! - Permission scope strings for the token exchange
//! - The response envelope shared by every non-token endpoint
//! - Lenient field access into loosely shaped JSON payloads
//!
//! # URL Layout
//!
//! | Part      | Example                 |
//! |-----------|-------------------------|
//! | scheme    | `https`                 |
//! | service   | `invoicing`, `auth`     |
//! | host      | `staging.tilia-inc.com` |
//! | version   | `v1`, `v2`, or absent   |
//! | resource  | `invoice/{id}/pay`      |
//!
//! `https://{service}.{host}/{version}/{resource}`

mod envelope;
pub mod fields;
mod paths;
mod scope;

pub use envelope::*;
pub use paths::*;
pub use scope::*;
