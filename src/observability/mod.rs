//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!         - info: interceptor installed, settings reconfigured
//!         - debug: request routed through a proxy
//!         - trace: direct dispatch, bypass rule hits
//!
//! Consumers:
//!     → logging.rs (fmt subscriber, EnvFilter)
//! ```

pub mod logging;
