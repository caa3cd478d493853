//! Tenant resolution by hostname
//!
//! Each educator's storefront lives on a subdomain of the base application
//! domain (`acme.univ.live` → slug `acme`). The bare base domain and the
//! reserved `www` label are the global marketing site. `localhost` has no
//! real subdomains, so local development passes the slug as a `?tenant=`
//! query parameter instead.

/// Resolve the tenant slug for a request, or `None` for the global site.
///
/// `host` is the raw Host header value (port allowed), `query_tenant` the
/// optional `?tenant=` parameter, `base_domain` the configured application
/// domain without a leading dot.
pub fn resolve_slug(host: &str, query_tenant: Option<&str>, base_domain: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or("").to_ascii_lowercase();

    // Local development: no real subdomains, slug comes from the query
    if host == "localhost" || host == "127.0.0.1" {
        return query_tenant
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty());
    }

    let suffix = format!(".{}", base_domain.to_ascii_lowercase());
    let prefix = host.strip_suffix(&suffix)?;
    if prefix.is_empty() {
        return None;
    }

    let label = prefix.split('.').next()?;
    if label.is_empty() || label == "www" {
        return None;
    }
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "univ.live";

    #[test]
    fn test_subdomain_resolves_to_slug() {
        assert_eq!(
            resolve_slug("acme.univ.live", None, BASE),
            Some("acme".to_string())
        );
    }

    #[test]
    fn test_bare_base_domain_is_global_site() {
        assert_eq!(resolve_slug("univ.live", None, BASE), None);
    }

    #[test]
    fn test_www_is_reserved() {
        assert_eq!(resolve_slug("www.univ.live", None, BASE), None);
    }

    #[test]
    fn test_foreign_host_is_global_site() {
        assert_eq!(resolve_slug("example.com", None, BASE), None);
        // suffix match must be on a label boundary
        assert_eq!(resolve_slug("acmeuniv.live", None, BASE), None);
    }

    #[test]
    fn test_localhost_reads_query_param() {
        assert_eq!(
            resolve_slug("localhost", Some("acme"), BASE),
            Some("acme".to_string())
        );
        assert_eq!(resolve_slug("localhost", None, BASE), None);
        assert_eq!(resolve_slug("localhost", Some("  "), BASE), None);
        assert_eq!(
            resolve_slug("localhost:3000", Some("acme"), BASE),
            Some("acme".to_string())
        );
    }

    #[test]
    fn test_port_is_stripped() {
        assert_eq!(
            resolve_slug("acme.univ.live:8080", None, BASE),
            Some("acme".to_string())
        );
    }

    #[test]
    fn test_leftmost_label_wins() {
        assert_eq!(
            resolve_slug("deep.acme.univ.live", None, BASE),
            Some("deep".to_string())
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            resolve_slug("ACME.Univ.Live", None, BASE),
            Some("acme".to_string())
        );
    }
}
