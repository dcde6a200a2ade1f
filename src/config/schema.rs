//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Outbound proxy settings (`[proxy]`).
    pub proxy: ProxySection,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// The `[proxy]` table.
///
/// Values left unset (or empty) fall back to the environment.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProxySection {
    /// Proxy URL for plain HTTP traffic (e.g., "http://proxy.corp:3128").
    pub http_proxy: Option<String>,

    /// Proxy URL for HTTPS traffic; also preferred for plain HTTP.
    pub https_proxy: Option<String>,

    /// Comma-separated bypass list, or `*` to disable proxying.
    pub no_proxy: Option<String>,

    /// Prefix for the environment fallback variables
    /// (e.g., "APP_" reads `APP_HTTP_PROXY`).
    pub env_namespace: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
