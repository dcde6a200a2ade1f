//! Outbound forward-proxy selection.
//!
//! Decides, per outbound HTTP/HTTPS request, whether it goes through a
//! configured forward proxy or directly to its target, and routes it
//! accordingly.

pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod observability;
pub mod rules;

pub use config::AppConfig;
pub use dispatch::{Interceptor, ProxySettings, Route};
pub use lifecycle::{bootstrap, Installation};
