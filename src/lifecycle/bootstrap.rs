//! One-time proxy bootstrap.
//!
//! # Responsibilities
//! - Resolve effective proxy settings (configuration, then environment)
//! - Build and install the process-wide dispatch interceptor
//! - Announce the installation through the logger
//!
//! # Design Decisions
//! - Fail fast: a malformed proxy URL is fatal, never a silent direct fallback
//! - `no_proxy = "*"` skips installation; every request stays direct
//! - Runs at most once per process

use thiserror::Error;

use crate::config::{resolve_settings, AppConfig, ConfigError, EnvLookup, ProcessEnv};
use crate::dispatch::global::{self, AlreadyInstalled};
use crate::dispatch::{Interceptor, ProxySettings};
use crate::rules::NoProxy;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid proxy configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AlreadyInstalled(#[from] AlreadyInstalled),
}

/// Outcome of a bootstrap.
#[derive(Debug, Clone)]
pub enum Installation {
    /// The interceptor now handles every outbound request.
    Installed(Interceptor),
    /// Proxying is disabled (`no_proxy = "*"`); nothing was installed.
    Skipped,
}

/// Bootstrap from configuration with the process environment as fallback.
pub fn bootstrap(config: &AppConfig) -> Result<Installation, BootstrapError> {
    bootstrap_with(config, &ProcessEnv)
}

/// Bootstrap from configuration with an explicit environment.
pub fn bootstrap_with(config: &AppConfig, env: &dyn EnvLookup) -> Result<Installation, BootstrapError> {
    let settings = resolve_settings(&config.proxy, env)?;

    let Some(interceptor) = prepare(settings) else {
        tracing::info!(no_proxy = "*", "Proxy dispatch disabled");
        return Ok(Installation::Skipped);
    };

    let interceptor = global::install(interceptor)?;
    let table = interceptor.snapshot();
    tracing::info!(
        http_proxy = ?table.settings().http_proxy.as_ref().map(ToString::to_string),
        https_proxy = ?table.settings().https_proxy.as_ref().map(ToString::to_string),
        no_proxy_rules = table.no_proxy().rules().len(),
        "Proxy dispatch interceptor installed"
    );

    Ok(Installation::Installed(interceptor))
}

/// Build the interceptor for `settings`, or `None` when proxying is disabled.
pub fn prepare(settings: ProxySettings) -> Option<Interceptor> {
    if NoProxy::parse(&settings.no_proxy) == NoProxy::All {
        return None;
    }
    Some(Interceptor::new(settings))
}
