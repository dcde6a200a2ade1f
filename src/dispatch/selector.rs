//! Upstream proxy selection.
//!
//! # Responsibilities
//! - Hold the resolved proxy endpoints
//! - Pick the endpoint for a request protocol
//!
//! # Design Decisions
//! - Plain HTTP prefers the HTTPS proxy, then falls back to the HTTP proxy
//! - HTTPS never falls back to the HTTP proxy
//! - Other protocols are never proxied

use thiserror::Error;
use url::Url;

use crate::dispatch::origin::Protocol;

/// Errors produced while validating a proxy URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid proxy URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported proxy scheme '{scheme}' in '{url}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("proxy URL '{0}' has no host")]
    MissingHost(String),
}

/// A validated forward proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    url: Url,
    host: String,
    port: u16,
}

impl ProxyEndpoint {
    /// Parse and validate a proxy URL such as `http://localhost:3000`.
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|source| EndpointError::Parse {
            url: raw.to_string(),
            source,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        // host_str() keeps brackets around IPv6 literals
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| EndpointError::MissingHost(raw.to_string()))?
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| EndpointError::MissingHost(raw.to_string()))?;

        Ok(Self { url, host, port })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, suitable for connecting.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.url.scheme(), self.authority())
    }
}

/// Resolved process-wide proxy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    /// Endpoint for unencrypted traffic.
    pub http_proxy: Option<ProxyEndpoint>,
    /// Endpoint for encrypted traffic; also preferred for plain HTTP.
    pub https_proxy: Option<ProxyEndpoint>,
    /// Unparsed bypass list. `*` disables proxying.
    pub no_proxy: String,
}

impl ProxySettings {
    /// Returns true if no endpoint is configured.
    pub fn is_empty(&self) -> bool {
        self.http_proxy.is_none() && self.https_proxy.is_none()
    }
}

/// Select the proxy endpoint for a protocol.
pub fn select_proxy<'a>(protocol: &Protocol, settings: &'a ProxySettings) -> Option<&'a ProxyEndpoint> {
    match protocol {
        Protocol::Http => settings.https_proxy.as_ref().or(settings.http_proxy.as_ref()),
        Protocol::Https => settings.https_proxy.as_ref(),
        Protocol::Other(_) => None,
    }
}
