//! Process-wide interceptor installation.
//!
//! # Design Decisions
//! - Installed at most once per process (`OnceLock`)
//! - Without an installed interceptor every request is sent directly

use std::sync::OnceLock;

use http::{Request, Uri};
use thiserror::Error;

use crate::dispatch::interceptor::Interceptor;
use crate::dispatch::table::Route;
use crate::dispatch::transport::{BoxFuture, DirectTransport, DispatchResult, RequestBody, Transport};

static INSTALLED: OnceLock<Interceptor> = OnceLock::new();
static FALLBACK: OnceLock<DirectTransport> = OnceLock::new();

/// A second installation was attempted.
#[derive(Debug, Error)]
#[error("a dispatch interceptor is already installed for this process")]
pub struct AlreadyInstalled;

/// Install `interceptor` as the process-wide dispatch hook.
pub fn install(interceptor: Interceptor) -> Result<Interceptor, AlreadyInstalled> {
    INSTALLED.set(interceptor.clone()).map_err(|_| AlreadyInstalled)?;
    Ok(interceptor)
}

/// The installed interceptor, if any.
pub fn installed() -> Option<&'static Interceptor> {
    INSTALLED.get()
}

/// Route decision of the process-wide hook.
pub fn route(uri: &Uri) -> Route {
    installed().map_or(Route::Direct, |interceptor| interceptor.route(uri))
}

/// Send a request through the process-wide hook.
pub fn dispatch(req: Request<RequestBody>) -> BoxFuture<DispatchResult> {
    match installed() {
        Some(interceptor) => interceptor.dispatch(req),
        None => FALLBACK.get_or_init(DirectTransport::new).dispatch(req),
    }
}
