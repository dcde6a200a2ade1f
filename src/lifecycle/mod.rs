//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (bootstrap.rs):
//!     Load config → Resolve settings (config, then environment)
//!     → Parse no_proxy → Install interceptor → Log notice
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Installation happens once; later changes go through reconfiguration

pub mod bootstrap;

pub use bootstrap::{bootstrap, bootstrap_with, BootstrapError, Installation};
