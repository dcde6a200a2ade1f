//! Outbound transports.
//!
//! # Responsibilities
//! - Define the `Transport` capability the interceptor forwards to
//! - Direct transport: pooled hyper-util client connecting to the target,
//!   TLS via rustls for `https` targets
//! - Proxied transport: HTTP/1.1 connection to the forward proxy, request
//!   sent in absolute-form
//!
//! # Design Decisions
//! - Transports never retry and never fall back to another path
//! - Connection failures carry the address that was dialed
//! - Request method, headers and body pass through untouched (`Host` is
//!   filled in only when the caller left it out)

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::{header, HeaderValue, Request, Response};
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::{TokioExecutor, TokioIo};
use thiserror::Error;
use tokio::net::TcpStream;

use crate::dispatch::selector::ProxyEndpoint;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Body type accepted by every transport.
pub type RequestBody = BoxBody<Bytes, BoxError>;

/// Result of a dispatched request.
pub type DispatchResult = Result<Response<Incoming>, DispatchError>;

/// Errors surfaced to the caller of a dispatched request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// TCP connection to the proxy endpoint failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP protocol error on an established connection.
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    /// Error from the pooled direct client (includes connect failures).
    #[error("client error: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DispatchError {
    /// Returns true if the failure happened while establishing the connection.
    pub fn is_connect(&self) -> bool {
        match self {
            DispatchError::Connect { .. } => true,
            DispatchError::Client(e) => e.is_connect(),
            _ => false,
        }
    }
}

/// A path requests can be sent over.
pub trait Transport: Send + Sync + std::fmt::Debug {
    fn dispatch(&self, req: Request<RequestBody>) -> BoxFuture<DispatchResult>;
}

/// Empty request body.
pub fn empty() -> RequestBody {
    Empty::<Bytes>::new()
        .map_err(|never| -> BoxError { match never {} })
        .boxed()
}

/// Request body from a single chunk.
pub fn full(chunk: impl Into<Bytes>) -> RequestBody {
    Full::new(chunk.into())
        .map_err(|never| -> BoxError { match never {} })
        .boxed()
}

/// Connects straight to the request target.
///
/// `https` targets are always dialed over TLS (webpki roots); `http` targets
/// stay plain.
#[derive(Clone)]
pub struct DirectTransport {
    client: Client<HttpsConnector<HttpConnector>, RequestBody>,
}

impl DirectTransport {
    pub fn new() -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for DirectTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DirectTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectTransport").finish_non_exhaustive()
    }
}

impl Transport for DirectTransport {
    fn dispatch(&self, req: Request<RequestBody>) -> BoxFuture<DispatchResult> {
        let response = self.client.request(req);
        Box::pin(async move { Ok(response.await?) })
    }
}

/// Sends requests through a forward proxy.
#[derive(Debug, Clone)]
pub struct ProxiedTransport {
    endpoint: ProxyEndpoint,
}

impl ProxiedTransport {
    pub fn new(endpoint: ProxyEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &ProxyEndpoint {
        &self.endpoint
    }
}

impl Transport for ProxiedTransport {
    fn dispatch(&self, mut req: Request<RequestBody>) -> BoxFuture<DispatchResult> {
        let addr = self.endpoint.authority();

        Box::pin(async move {
            let host = match req.uri().authority() {
                Some(authority) => match authority.port() {
                    Some(port) => format!("{}:{}", authority.host(), port),
                    None => authority.host().to_string(),
                },
                None => {
                    return Err(DispatchError::InvalidRequest(format!(
                        "proxied request needs an absolute URI, got '{}'",
                        req.uri()
                    )))
                }
            };

            if !req.headers().contains_key(header::HOST) {
                let value = HeaderValue::from_str(&host)
                    .map_err(|e| DispatchError::InvalidRequest(e.to_string()))?;
                req.headers_mut().insert(header::HOST, value);
            }

            let stream = TcpStream::connect(addr.as_str())
                .await
                .map_err(|source| DispatchError::Connect {
                    addr: addr.clone(),
                    source,
                })?;

            let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
            tokio::spawn(async move {
                if let Err(error) = conn.await {
                    tracing::debug!(%error, "Proxy connection closed with error");
                }
            });

            tracing::trace!(proxy = %addr, uri = %req.uri(), "Forwarding request to proxy");
            Ok(sender.send_request(req).await?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_helpers() {
        let body = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");

        let body = empty().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_proxied_requires_absolute_uri() {
        let transport = ProxiedTransport::new(ProxyEndpoint::parse("http://127.0.0.1:9").unwrap());
        let req = Request::get("/relative").body(empty()).unwrap();
        let err = transport.dispatch(req).await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidRequest(_)));
        assert!(!err.is_connect());
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_connect_error() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = ProxyEndpoint::parse(&format!("http://127.0.0.1:{}", port)).unwrap();
        let transport = ProxiedTransport::new(endpoint);
        let req = Request::get("http://example.com/").body(empty()).unwrap();

        match transport.dispatch(req).await {
            Err(DispatchError::Connect { addr, .. }) => assert_eq!(addr, format!("127.0.0.1:{}", port)),
            other => panic!("expected connect error, got {:?}", other.map(|r| r.status())),
        }
    }
}
