//! Permission scopes requested with the client-credentials exchange.

/// Every permission the client knows about, in request order.
///
/// Sent when no explicit scopes are configured. Production integrations
/// should request the minimal set they need instead.
pub const ALL_SCOPES: [&str; 12] = [
    "change_accounts",
    "search_accounts",
    "read_payment_methods",
    "write_registrations",
    "write_user_tokens",
    "user_info",
    "block_accounts",
    "read_invoices",
    "write_invoices",
    "read_process_credits",
    "write_process_credits",
    "read_kycs",
];

/// Build the comma-separated scope string for a token request.
///
/// Blank entries are skipped. An empty list expands to [`ALL_SCOPES`].
///
/// # Example
///
/// ```
/// use tilia_lib::protocol::resolve_scope;
///
/// assert_eq!(resolve_scope(&["read_invoices", "write_invoices"]), "read_invoices,write_invoices");
/// assert!(resolve_scope::<&str>(&[]).starts_with("change_accounts,"));
/// ```
pub fn resolve_scope<S: AsRef<str>>(scopes: &[S]) -> String {
    let requested: Vec<&str> = scopes
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if requested.is_empty() {
        ALL_SCOPES.join(",")
    } else {
        requested.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope_expands_to_superset() {
        let scope = resolve_scope::<String>(&[]);
        assert_eq!(scope.split(',').count(), ALL_SCOPES.len());
        assert!(scope.ends_with("read_kycs"));
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        assert_eq!(resolve_scope(&[" ", "user_info", ""]), "user_info");
        assert_eq!(resolve_scope(&["", "  "]), ALL_SCOPES.join(","));
    }
}
