//! Configuration file watcher for hot-reload support

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Let editors finish writing before re-reading
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches the config file and yields every successfully re-validated version
///
/// A file that fails to parse or validate is logged and skipped; the caller
/// keeps running with the last good configuration.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Load the initial config and start watching `path`
    pub async fn new(path: impl Into<PathBuf>) -> Result<(Self, AppConfig)> {
        let path = path.into();
        let (tx, rx) = mpsc::channel(10);

        let initial = AppConfig::load(&path)
            .await
            .context("Failed to load initial config")?;

        // notify invokes the callback on its own thread, outside the runtime
        let runtime = tokio::runtime::Handle::current();
        let reload_path = path.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                debug!(paths = ?event.paths, "config file changed");
                let path = reload_path.clone();
                let tx = tx.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(RELOAD_DEBOUNCE).await;
                    match AppConfig::load(&path).await {
                        Ok(config) => {
                            info!(path = %path.display(), "configuration reloaded");
                            if let Err(e) = tx.send(config).await {
                                error!("Failed to send config update: {}", e);
                            }
                        }
                        Err(e) => {
                            warn!("Failed to reload config (keeping old config): {:#}", e);
                        }
                    }
                });
            }
            Ok(_) => {}
            Err(e) => error!("Config watch error: {}", e),
        })?;

        watcher
            .watch(Path::new(&path), RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config file: {}", path.display()))?;

        info!(path = %path.display(), "config file watcher started");

        Ok((
            Self {
                _watcher: watcher,
                path,
                rx,
            },
            initial,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next valid config; `None` once the watcher is gone
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}
