//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::env::{resolve_settings, EnvLookup, ProcessEnv};
use crate::config::loader::{load_config, ConfigError};
use crate::dispatch::Interceptor;

/// Reload `path` and swap the resulting settings into `interceptor`.
///
/// On error the interceptor keeps its current settings.
pub fn reload(path: &Path, interceptor: &Interceptor, env: &dyn EnvLookup) -> Result<(), ConfigError> {
    let config = load_config(path)?;
    let settings = resolve_settings(&config.proxy, env)?;
    interceptor.reconfigure(settings);
    Ok(())
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    interceptor: Interceptor,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher feeding `interceptor`.
    pub fn new(path: &Path, interceptor: Interceptor) -> Self {
        Self {
            path: path.to_path_buf(),
            interceptor,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let interceptor = self.interceptor;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Config file change detected, reloading...");
                        if let Err(error) = reload(&path, &interceptor, &ProcessEnv) {
                            tracing::error!(%error, "Failed to reload config, keeping current proxy settings");
                        }
                    }
                }
                Err(error) => tracing::error!(?error, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
