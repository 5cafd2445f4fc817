//! Request URL builders.
//!
//! All functions produce the exact URLs the Tilia services expect. Callers
//! pass raw identifiers; escaping happens here.

/// Service sub-domain a request is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
    /// Invoices, escrows and payouts.
    Invoicing,
    /// Token exchange and user redirects.
    Auth,
    /// User registration.
    Registration,
    /// Identity verification.
    Pii,
    /// Account payment methods.
    Payments,
    /// User lookup.
    Accounts,
}

impl Service {
    /// Sub-domain label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoicing => "invoicing",
            Self::Auth => "auth",
            Self::Registration => "registration",
            Self::Pii => "pii",
            Self::Payments => "payments",
            Self::Accounts => "accounts",
        }
    }
}

/// Build a request URL.
///
/// Format: `https://{service}.{host}/{version}/{resource}`, with the version
/// segment omitted when `None`. `resource` is used as given; escape the
/// identifiers inside it with [`escape`].
///
/// # Example
///
/// ```
/// use tilia_lib::protocol::{request_url, Service};
///
/// let url = request_url("staging.tilia-inc.com", Service::Invoicing, Some("v2"), "invoice/abc");
/// assert_eq!(url, "https://invoicing.staging.tilia-inc.com/v2/invoice/abc");
///
/// let url = request_url("staging.tilia-inc.com", Service::Auth, None, "authorize/user");
/// assert_eq!(url, "https://auth.staging.tilia-inc.com/authorize/user");
/// ```
pub fn request_url(host: &str, service: Service, version: Option<&str>, resource: &str) -> String {
    let host = host.trim_end_matches('/');
    let resource = resource.trim_start_matches('/');
    match version {
        Some(version) => format!(
            "https://{}.{}/{}/{}",
            service.as_str(),
            host,
            version,
            resource
        ),
        None => format!("https://{}.{}/{}", service.as_str(), host, resource),
    }
}

/// Percent-escape a path segment or query value.
pub fn escape(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the resource part of the client-credentials token request.
pub fn token_resource(client_id: &str, client_secret: &str, scope: &str) -> String {
    format!(
        "token?client_id={}&client_secret={}&grant_type=client_credentials&scope={}",
        escape(client_id),
        escape(client_secret),
        escape(scope)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_url() {
        let url = request_url("tilia-inc.com", Service::Pii, Some("v1"), "kyc/acc-1");
        assert_eq!(url, "https://pii.tilia-inc.com/v1/kyc/acc-1");
    }

    #[test]
    fn test_unversioned_url_trims_slashes() {
        let url = request_url("tilia-inc.com/", Service::Payments, None, "/acc/payment_methods");
        assert_eq!(url, "https://payments.tilia-inc.com/acc/payment_methods");
    }

    #[test]
    fn test_escape_path_segment() {
        assert_eq!(escape("a b/c"), "a%20b%2Fc");
        assert_eq!(escape("plain-id_1"), "plain-id_1");
    }

    #[test]
    fn test_token_resource() {
        let resource = token_resource("id", "s&cret", "read_kycs,user_info");
        assert_eq!(
            resource,
            "token?client_id=id&client_secret=s%26cret&grant_type=client_credentials&scope=read_kycs%2Cuser_info"
        );
    }
}
