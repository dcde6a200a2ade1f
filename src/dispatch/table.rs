//! Routing decision over an immutable settings snapshot.

use crate::dispatch::origin::NormalizedOrigin;
use crate::dispatch::selector::{select_proxy, ProxyEndpoint, ProxySettings};
use crate::rules::{should_proxy, NoProxy};

/// Transport path chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Connect to the target directly.
    Direct,
    /// Hand the request to the given forward proxy.
    Proxied(ProxyEndpoint),
}

impl Route {
    pub fn is_direct(&self) -> bool {
        matches!(self, Route::Direct)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Direct => f.write_str("DIRECT"),
            Route::Proxied(endpoint) => write!(f, "PROXY {}", endpoint),
        }
    }
}

/// Resolved settings plus the compiled bypass list.
///
/// Built once and never mutated; reconfiguration replaces the whole table.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    settings: ProxySettings,
    no_proxy: NoProxy,
}

impl RoutingTable {
    pub fn new(settings: ProxySettings) -> Self {
        let no_proxy = NoProxy::parse(&settings.no_proxy);
        Self { settings, no_proxy }
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    pub fn no_proxy(&self) -> &NoProxy {
        &self.no_proxy
    }

    /// Decide the transport path for a normalized origin.
    pub fn route(&self, origin: &NormalizedOrigin) -> Route {
        let rules = match &self.no_proxy {
            NoProxy::All => return Route::Direct,
            NoProxy::Rules(rules) => rules,
        };

        if !should_proxy(&origin.hostname, origin.port, rules) {
            return Route::Direct;
        }

        match select_proxy(&origin.protocol, &self.settings) {
            Some(endpoint) => Route::Proxied(endpoint.clone()),
            None => Route::Direct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(no_proxy: &str) -> RoutingTable {
        let endpoint = ProxyEndpoint::parse("http://localhost:3000").unwrap();
        RoutingTable::new(ProxySettings {
            http_proxy: Some(endpoint.clone()),
            https_proxy: Some(endpoint),
            no_proxy: no_proxy.to_string(),
        })
    }

    fn route(table: &RoutingTable, origin: &str) -> Route {
        table.route(&NormalizedOrigin::parse(origin).unwrap())
    }

    #[test]
    fn test_no_proxy_with_port() {
        let t = table("localhost:5050");
        assert_eq!(route(&t, "http://localhost:5050"), Route::Direct);
        match route(&t, "http://localhost:5051") {
            Route::Proxied(ep) => assert_eq!(ep.authority(), "localhost:3000"),
            Route::Direct => panic!("expected proxied route"),
        }
    }

    #[test]
    fn test_no_proxy_default_ports() {
        let t = table("localhost");
        assert!(route(&t, "http://localhost").is_direct());
        assert!(route(&t, "https://localhost").is_direct());
        assert!(!route(&t, "http://example.com").is_direct());
    }

    #[test]
    fn test_sentinel_bypasses_everything() {
        let t = table("*");
        assert_eq!(*t.no_proxy(), NoProxy::All);
        for origin in ["http://a.com", "https://b.org:8443", "http://[::1]:1", "http://localhost:3000"] {
            assert!(route(&t, origin).is_direct(), "{origin} should be direct");
        }
    }

    #[test]
    fn test_ipv6_rule_end_to_end() {
        let t = table("[::1]:8001");
        assert!(route(&t, "http://[::1]:8001").is_direct());
        assert!(!route(&t, "http://[::1]:8002").is_direct());
        // unbracketed host form only reachable through the parts constructor
        let bare = NormalizedOrigin::from_parts("http", "::1", Some(8001));
        assert!(!t.route(&bare).is_direct());
    }

    #[test]
    fn test_no_endpoint_is_direct() {
        let t = RoutingTable::new(ProxySettings::default());
        assert!(route(&t, "http://example.com").is_direct());
        assert!(route(&t, "https://example.com").is_direct());
    }

    #[test]
    fn test_unknown_protocol_is_direct() {
        let t = table("");
        let origin = NormalizedOrigin::from_parts("ftp", "example.com", None);
        assert!(t.route(&origin).is_direct());
    }

    #[test]
    fn test_route_display() {
        let t = table("");
        assert_eq!(route(&t, "http://a.com").to_string(), "PROXY http://localhost:3000");
        assert_eq!(Route::Direct.to_string(), "DIRECT");
    }
}
