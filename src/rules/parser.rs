//! `no_proxy` rule parsing.
//!
//! # Responsibilities
//! - Split the raw comma-separated bypass list into entries
//! - Separate an optional trailing `:port` from each entry
//! - Recognize the global `*` sentinel
//!
//! # Design Decisions
//! - Permissive: a malformed entry becomes a bare hostname, never an error
//! - Bracketed IPv6 literals keep their brackets (`[::1]` != `::1`)
//! - Entry order is preserved

use serde::Serialize;

/// A single bypass rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyRule {
    /// Lower-cased host pattern. May start with a wildcard marker (`.` or `*`).
    pub hostname: String,

    /// Port restriction. `None` matches every port.
    pub port: Option<u16>,
}

impl ProxyRule {
    /// Parse a single trimmed, non-empty entry.
    pub fn parse(entry: &str) -> Self {
        let (hostname, port) = split_host_port(entry);
        Self {
            hostname: hostname.to_lowercase(),
            port,
        }
    }

    /// Returns true if the host pattern is a suffix wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.hostname.starts_with('.') || self.hostname.starts_with('*')
    }
}

impl std::fmt::Display for ProxyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.hostname, port),
            None => write!(f, "{}", self.hostname),
        }
    }
}

/// Parsed form of a `no_proxy` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoProxy {
    /// The `*` sentinel: never proxy anything.
    All,
    /// Ordered bypass rules (possibly empty).
    Rules(Vec<ProxyRule>),
}

impl NoProxy {
    /// Parse a raw `no_proxy` value.
    ///
    /// `*` is only a sentinel when it is the whole value.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            NoProxy::All
        } else {
            NoProxy::Rules(parse_no_proxy_rules(raw))
        }
    }

    /// Bypass rules, empty for the sentinel.
    pub fn rules(&self) -> &[ProxyRule] {
        match self {
            NoProxy::All => &[],
            NoProxy::Rules(rules) => rules,
        }
    }
}

impl Default for NoProxy {
    fn default() -> Self {
        NoProxy::Rules(Vec::new())
    }
}

/// Parse a comma-separated bypass list into rules, in the order given.
pub fn parse_no_proxy_rules(raw: &str) -> Vec<ProxyRule> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ProxyRule::parse)
        .collect()
}

/// Split a trailing `:port` off `input`.
///
/// The port is only stripped when the digits run to the end of the string and
/// the remaining host is either bracketed or free of colons. Anything else is
/// returned whole with no port.
pub(crate) fn split_host_port(input: &str) -> (&str, Option<u16>) {
    if input.ends_with(']') {
        return (input, None);
    }

    let Some((host, digits)) = input.rsplit_once(':') else {
        return (input, None);
    };

    if host.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (input, None);
    }

    let bracketed = host.starts_with('[') && host.ends_with(']');
    if !bracketed && host.contains(':') {
        // bare IPv6 literal
        return (input, None);
    }

    match digits.parse::<u16>() {
        Ok(port) => (host, Some(port)),
        Err(_) => (input, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(hostname: &str, port: Option<u16>) -> ProxyRule {
        ProxyRule {
            hostname: hostname.to_string(),
            port,
        }
    }

    #[test]
    fn test_parse_mixed_list_preserves_order() {
        let rules = parse_no_proxy_rules(
            "example-test-site.com,another-test-site.com:8080,localhost:7007,.wildcard-site.com",
        );
        assert_eq!(
            rules,
            vec![
                rule("example-test-site.com", None),
                rule("another-test-site.com", Some(8080)),
                rule("localhost", Some(7007)),
                rule(".wildcard-site.com", None),
            ]
        );
    }

    #[test]
    fn test_parse_trims_and_drops_empty_entries() {
        let rules = parse_no_proxy_rules("  a.com , ,b.com:81,, ");
        assert_eq!(rules, vec![rule("a.com", None), rule("b.com", Some(81))]);
        assert!(parse_no_proxy_rules("").is_empty());
        assert!(parse_no_proxy_rules(" , ").is_empty());
    }

    #[test]
    fn test_parse_lowercases_hostname() {
        let rules = parse_no_proxy_rules("Internal.Example.COM:8443");
        assert_eq!(rules, vec![rule("internal.example.com", Some(8443))]);
    }

    #[test]
    fn test_parse_ipv6_keeps_brackets() {
        let rules = parse_no_proxy_rules("[::1]:8080,[::1],[FE80::1]");
        assert_eq!(
            rules,
            vec![rule("[::1]", Some(8080)), rule("[::1]", None), rule("[fe80::1]", None)]
        );
    }

    #[test]
    fn test_parse_bare_ipv6_not_split() {
        assert_eq!(parse_no_proxy_rules("::1"), vec![rule("::1", None)]);
        assert_eq!(parse_no_proxy_rules("fe80::1:8080"), vec![rule("fe80::1:8080", None)]);
    }

    #[test]
    fn test_parse_malformed_port_falls_back_to_hostname() {
        assert_eq!(parse_no_proxy_rules("host:abc"), vec![rule("host:abc", None)]);
        assert_eq!(parse_no_proxy_rules("host:99999"), vec![rule("host:99999", None)]);
        assert_eq!(parse_no_proxy_rules("host:"), vec![rule("host:", None)]);
        assert_eq!(parse_no_proxy_rules(":8080"), vec![rule(":8080", None)]);
    }

    #[test]
    fn test_no_proxy_sentinel() {
        assert_eq!(NoProxy::parse("*"), NoProxy::All);
        assert_eq!(NoProxy::parse("  * "), NoProxy::All);
        assert!(NoProxy::parse("*").rules().is_empty());

        // Not the sole content: an ordinary entry
        match NoProxy::parse("*,localhost") {
            NoProxy::Rules(rules) => assert_eq!(rules.len(), 2),
            NoProxy::All => panic!("sentinel must be the whole value"),
        }
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(ProxyRule::parse("[::1]:8001").to_string(), "[::1]:8001");
        assert_eq!(ProxyRule::parse(".example.com").to_string(), ".example.com");
    }
}
