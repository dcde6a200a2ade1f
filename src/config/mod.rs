//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → env.rs (environment fallback, URL validation)
//!     → ProxySettings
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → env.rs resolves settings
//!     → atomic swap of the interceptor's routing table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Configuration values win over environment values

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use env::{resolve_settings, EnvLookup, ProcessEnv};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, ObservabilityConfig, ProxySection};
