//! Request origin normalization.
//!
//! # Responsibilities
//! - Extract protocol, hostname and port from a request target
//! - Infer the default port for `http` / `https`
//! - Canonicalize the hostname (lower-case, IPv6 brackets kept)

use http::Uri;
use thiserror::Error;

use crate::rules::parser::split_host_port;

/// Errors produced while normalizing an origin.
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("invalid origin: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("origin has no scheme: {0}")]
    MissingScheme(String),

    #[error("origin has no host: {0}")]
    MissingHost(String),
}

/// Request protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
    /// Any other scheme, lower-cased. Never proxied.
    Other(String),
}

impl Protocol {
    /// Parse a scheme, tolerating a trailing `:` (`"https:"`).
    pub fn parse(scheme: &str) -> Self {
        let scheme = scheme.trim().trim_end_matches(':').to_lowercase();
        match scheme.as_str() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            _ => Protocol::Other(scheme),
        }
    }

    /// Default port, if the protocol has one.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Protocol::Http => Some(80),
            Protocol::Https => Some(443),
            Protocol::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Other(scheme) => scheme.as_str(),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol, hostname and port of a request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOrigin {
    pub protocol: Protocol,
    /// Lower-cased, port suffix stripped, IPv6 brackets intact.
    pub hostname: String,
    /// Explicit port, else the protocol default. `None` for unknown protocols
    /// without an explicit port.
    pub port: Option<u16>,
}

impl NormalizedOrigin {
    /// Build from loose components, e.g. `("HTTPS:", "Example.com:8443", None)`.
    ///
    /// An explicit `port` wins over a port embedded in `host`.
    pub fn from_parts(protocol: &str, host: &str, port: Option<u16>) -> Self {
        let protocol = Protocol::parse(protocol);
        let (hostname, embedded_port) = split_host_port(host.trim());
        let port = port.or(embedded_port).or_else(|| protocol.default_port());
        Self {
            hostname: hostname.to_lowercase(),
            protocol,
            port,
        }
    }

    /// Normalize a request URI. Returns `None` for relative URIs.
    pub fn from_uri(uri: &Uri) -> Option<Self> {
        let scheme = uri.scheme_str()?;
        let authority = uri.authority()?;
        Some(Self::from_parts(scheme, authority.host(), authority.port_u16()))
    }

    /// Parse an origin string such as `http://localhost:5050`.
    pub fn parse(origin: &str) -> Result<Self, OriginError> {
        let uri: Uri = origin.trim().parse()?;
        if uri.scheme().is_none() {
            return Err(OriginError::MissingScheme(origin.to_string()));
        }
        Self::from_uri(&uri).ok_or_else(|| OriginError::MissingHost(origin.to_string()))
    }
}

impl std::fmt::Display for NormalizedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.protocol, self.hostname, port),
            None => write!(f, "{}://{}", self.protocol, self.hostname),
        }
    }
}
