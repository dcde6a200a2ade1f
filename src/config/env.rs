//! Environment fallback and settings resolution.
//!
//! # Responsibilities
//! - Read `{namespace}HTTP_PROXY`, `{namespace}HTTPS_PROXY`, `{namespace}NO_PROXY`
//! - Merge them under the `[proxy]` table (configuration wins)
//! - Validate proxy URLs into endpoints
//!
//! # Design Decisions
//! - Empty values count as unset, in configuration and environment alike
//! - Lower-case variable names are consulted only without a namespace
//! - Lookup is a trait so resolution can be tested without touching the
//!   process environment

use std::collections::HashMap;

use crate::config::loader::ConfigError;
use crate::config::schema::ProxySection;
use crate::config::validation::ValidationError;
use crate::dispatch::selector::{ProxyEndpoint, ProxySettings};

/// Source of environment-style variables.
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lookup(env: &dyn EnvLookup, namespace: &str, name: &str) -> Option<String> {
    let upper = format!("{}{}", namespace, name);
    non_empty(env.var(&upper)).or_else(|| {
        if namespace.is_empty() {
            non_empty(env.var(&name.to_lowercase()))
        } else {
            None
        }
    })
}

fn endpoint(field: &'static str, raw: Option<String>) -> Result<Option<ProxyEndpoint>, ValidationError> {
    raw.map(|url| ProxyEndpoint::parse(&url))
        .transpose()
        .map_err(|source| ValidationError::InvalidProxyUrl { field, source })
}

/// Merge the `[proxy]` table with the environment into validated settings.
pub fn resolve_settings(section: &ProxySection, env: &dyn EnvLookup) -> Result<ProxySettings, ConfigError> {
    let namespace = section.env_namespace.as_str();

    let http = non_empty(section.http_proxy.clone()).or_else(|| lookup(env, namespace, "HTTP_PROXY"));
    let https = non_empty(section.https_proxy.clone()).or_else(|| lookup(env, namespace, "HTTPS_PROXY"));
    let no_proxy = non_empty(section.no_proxy.clone())
        .or_else(|| lookup(env, namespace, "NO_PROXY"))
        .unwrap_or_default();

    let mut errors = Vec::new();
    let http_proxy = endpoint("http_proxy", http).unwrap_or_else(|e| {
        errors.push(e);
        None
    });
    let https_proxy = endpoint("https_proxy", https).unwrap_or_else(|e| {
        errors.push(e);
        None
    });

    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(ProxySettings {
        http_proxy,
        https_proxy,
        no_proxy,
    })
}
