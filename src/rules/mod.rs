//! Bypass rule subsystem.
//!
//! # Data Flow
//! ```text
//! raw no_proxy string (config / environment)
//!     → parser.rs (split, trim, host/port separation)
//!     → NoProxy::All (sentinel) or NoProxy::Rules(ordered ProxyRule list)
//!
//! Per request:
//!     (hostname, port) + rules
//!     → matcher.rs (first matching rule wins)
//!     → proxy / bypass
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable afterwards
//! - Deterministic: same input always yields the same decision

pub mod matcher;
pub mod parser;

pub use matcher::{first_match, should_proxy};
pub use parser::{parse_no_proxy_rules, NoProxy, ProxyRule};
