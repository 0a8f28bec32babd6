//! Catalog file watcher for hot reload.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, error, info};

pub const CATALOG_DEBOUNCE: Duration = Duration::from_millis(500);

/// Keeps the watch alive; dropping it stops notifications.
pub struct CatalogWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    _bridge_thread: std::thread::JoinHandle<()>,
}

/// Watch the directory holding `catalog_path` and send `()` on `tx` whenever
/// the catalog file settles after a change.
///
/// # Errors
///
/// Returns an error if the platform watcher cannot be created or the
/// directory cannot be watched.
pub fn spawn_catalog_watcher(
    catalog_path: &Path,
    debounce: Duration,
    tx: tokio_mpsc::UnboundedSender<()>,
) -> notify::Result<CatalogWatcher> {
    let (sync_tx, sync_rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(debounce, sync_tx)?;

    let dir = watch_dir(catalog_path);
    debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
    info!("Watching catalog directory: {:?}", dir);

    let file_name = catalog_path.file_name().map(ToOwned::to_owned);
    let bridge_thread = std::thread::spawn(move || bridge(&sync_rx, file_name.as_ref(), &tx));

    Ok(CatalogWatcher {
        _debouncer: debouncer,
        _bridge_thread: bridge_thread,
    })
}

fn watch_dir(catalog_path: &Path) -> PathBuf {
    match catalog_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn bridge(
    rx: &mpsc::Receiver<DebounceEventResult>,
    file_name: Option<&OsString>,
    tx: &tokio_mpsc::UnboundedSender<()>,
) {
    for result in rx {
        match result {
            Ok(events) => {
                let touched = events
                    .iter()
                    .any(|event| event.path.file_name() == file_name.map(OsString::as_os_str));
                if !touched {
                    continue;
                }
                debug!("Catalog changed, sending reload notification");
                if tx.send(()).is_err() {
                    debug!("Catalog reload receiver dropped, stopping watcher");
                    break;
                }
            }
            Err(e) => error!("Catalog watcher error: {e}"),
        }
    }
}
