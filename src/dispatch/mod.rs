//! Outbound request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request (absolute URI)
//!     → interceptor.rs (process-wide hook, snapshot of RoutingTable)
//!     → origin.rs (protocol, lower-cased hostname, port with defaults)
//!     → table.rs (no_proxy sentinel → rules::matcher → selector.rs)
//!     → Route::Direct  → transport.rs DirectTransport
//!     → Route::Proxied → transport.rs ProxiedTransport (forward proxy)
//! ```
//!
//! # Design Decisions
//! - Decision functions are pure over an immutable snapshot, no locking
//! - Settings replaced by atomic pointer swap, never mutated in place
//! - Proxy failures are surfaced as-is; no retry, no fallback to direct

pub mod global;
pub mod interceptor;
pub mod origin;
pub mod selector;
pub mod table;
pub mod transport;

pub use interceptor::Interceptor;
pub use origin::{NormalizedOrigin, OriginError, Protocol};
pub use selector::{select_proxy, EndpointError, ProxyEndpoint, ProxySettings};
pub use table::{Route, RoutingTable};
pub use transport::{
    empty, full, BoxError, BoxFuture, DirectTransport, DispatchError, DispatchResult, ProxiedTransport,
    RequestBody, Transport,
};
