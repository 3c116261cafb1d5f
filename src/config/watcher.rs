//! Configuration file watcher for hot reload.
//!
//! A change event re-runs the full load (parse, validate, resolve scopes).
//! Only configurations that load cleanly are sent on; a broken edit is
//! logged and the running configuration stays in place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, RuntimeConfig};

/// A watcher that monitors the configuration file for changes.
#[derive(Clone)]
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RuntimeConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for resolved configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RuntimeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Load the file now and publish it. Returns whether it was accepted.
    pub fn reload(&self) -> bool {
        match load_config(&self.path) {
            Ok(config) => {
                tracing::info!(path = ?self.path, scopes = config.scopes.len(), "Configuration reloaded from disk");
                self.update_tx.send(config).is_ok()
            }
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Failed to reload config. Keeping current configuration."
                );
                false
            }
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let handler = self.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::debug!(kind = ?event.kind, "Config file change detected");
                    handler.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
