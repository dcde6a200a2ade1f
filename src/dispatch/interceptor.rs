//! The dispatch interceptor.
//!
//! Every outbound request passes through [`Interceptor::dispatch`], which
//! normalizes the target origin, consults the current routing table and
//! forwards the request either directly or through the selected proxy.
//!
//! The routing table lives behind an `ArcSwap`: lookups take a snapshot
//! without locking, and `reconfigure` replaces the whole table at once so an
//! in-flight decision never sees half-applied settings.

use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use http::{Request, Response, Uri};

use crate::dispatch::origin::NormalizedOrigin;
use crate::dispatch::selector::ProxySettings;
use crate::dispatch::table::{Route, RoutingTable};
use crate::dispatch::transport::{
    BoxFuture, DirectTransport, DispatchError, DispatchResult, ProxiedTransport, RequestBody, Transport,
};

/// Routes outbound requests to a direct or proxied transport.
///
/// Cloning is cheap; clones share the same routing table.
#[derive(Clone)]
pub struct Interceptor {
    inner: Arc<Inner>,
}

struct Inner {
    table: ArcSwap<RoutingTable>,
    direct: Arc<dyn Transport>,
}

impl Interceptor {
    /// Create an interceptor using the default direct transport.
    pub fn new(settings: ProxySettings) -> Self {
        Self::with_direct_transport(settings, Arc::new(DirectTransport::new()))
    }

    /// Create an interceptor with a caller-supplied direct transport.
    pub fn with_direct_transport(settings: ProxySettings, direct: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                table: ArcSwap::from_pointee(RoutingTable::new(settings)),
                direct,
            }),
        }
    }

    /// Current routing table.
    pub fn snapshot(&self) -> Arc<RoutingTable> {
        self.inner.table.load_full()
    }

    /// Atomically replace the proxy settings.
    pub fn reconfigure(&self, settings: ProxySettings) {
        let table = RoutingTable::new(settings);
        tracing::info!(
            http_proxy = ?table.settings().http_proxy.as_ref().map(ToString::to_string),
            https_proxy = ?table.settings().https_proxy.as_ref().map(ToString::to_string),
            no_proxy = %table.settings().no_proxy,
            "Proxy settings reconfigured"
        );
        self.inner.table.store(Arc::new(table));
    }

    /// Decide the transport path for a request URI.
    ///
    /// URIs without scheme or authority are sent directly.
    pub fn route(&self, uri: &Uri) -> Route {
        match NormalizedOrigin::from_uri(uri) {
            Some(origin) => self.inner.table.load().route(&origin),
            None => Route::Direct,
        }
    }

    /// Send a request over the path chosen for its origin.
    pub fn dispatch(&self, req: Request<RequestBody>) -> BoxFuture<DispatchResult> {
        match self.route(req.uri()) {
            Route::Direct => {
                tracing::trace!(uri = %req.uri(), "Dispatching directly");
                self.inner.direct.dispatch(req)
            }
            Route::Proxied(endpoint) => {
                tracing::debug!(uri = %req.uri(), proxy = %endpoint, "Dispatching through proxy");
                ProxiedTransport::new(endpoint).dispatch(req)
            }
        }
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("table", &self.inner.table.load_full())
            .field("direct", &self.inner.direct)
            .finish()
    }
}

impl Transport for Interceptor {
    fn dispatch(&self, req: Request<RequestBody>) -> BoxFuture<DispatchResult> {
        Interceptor::dispatch(self, req)
    }
}

impl tower::Service<Request<RequestBody>> for Interceptor {
    type Response = Response<hyper::body::Incoming>;
    type Error = DispatchError;
    type Future = BoxFuture<DispatchResult>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<RequestBody>) -> Self::Future {
        Interceptor::dispatch(self, req)
    }
}
