//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Proxy URLs must parse, use http/https and name a host
//! - Log level must be a known level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::dispatch::selector::{EndpointError, ProxyEndpoint};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("proxy.{field}: {source}")]
    InvalidProxyUrl {
        field: &'static str,
        #[source]
        source: EndpointError,
    },

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let urls = [
        ("http_proxy", config.proxy.http_proxy.as_deref()),
        ("https_proxy", config.proxy.https_proxy.as_deref()),
    ];
    for (field, value) in urls {
        let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        if let Err(source) = ProxyEndpoint::parse(raw) {
            errors.push(ValidationError::InvalidProxyUrl { field, source });
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
