//! HTTP transport seam.
//!
//! The dispatcher talks to the network only through [`HttpTransport`], so
//! hosts can route requests through their own HTTP stack and tests can
//! substitute an in-memory transport.

mod http;
mod traits;

pub use http::ReqwestTransport;
pub use traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
