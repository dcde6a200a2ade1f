//! Bypass rule matching.
//!
//! # Responsibilities
//! - Decide whether a normalized (hostname, port) pair skips the proxy
//!
//! # Design Decisions
//! - Exact host comparison, lower-case on both sides
//! - `.` prefix = suffix match on the whole pattern, dot included, so
//!   `.example.com` never matches `example.com` itself
//! - `*` prefix is dropped and the rest is a suffix (`*.internal` = `.internal`)
//! - First matching rule wins; no "most specific" resolution
//! - No regex, O(n) in the number of rules

use crate::rules::parser::ProxyRule;

impl ProxyRule {
    /// Returns true if this rule exempts `hostname` at `port` from proxying.
    ///
    /// `hostname` must already be lower-cased.
    pub fn matches(&self, hostname: &str, port: Option<u16>) -> bool {
        if let Some(rule_port) = self.port {
            if port != Some(rule_port) {
                return false;
            }
        }

        if self.is_wildcard() {
            let suffix = self.hostname.strip_prefix('*').unwrap_or(&self.hostname);
            hostname.ends_with(suffix)
        } else {
            hostname == self.hostname
        }
    }
}

/// First rule, in list order, that exempts `hostname` at `port`.
pub fn first_match<'a>(hostname: &str, port: Option<u16>, rules: &'a [ProxyRule]) -> Option<&'a ProxyRule> {
    rules.iter().find(|rule| rule.matches(hostname, port))
}

/// Returns true if the request should go through the proxy.
///
/// An empty rule list exempts nothing.
pub fn should_proxy(hostname: &str, port: Option<u16>, rules: &[ProxyRule]) -> bool {
    match first_match(hostname, port, rules) {
        Some(rule) => {
            tracing::trace!(hostname, ?port, rule = %rule, "Bypass rule matched");
            false
        }
        None => true,
    }
}
