// IntegritySpy - app/watcher.rs
//
// Kernel filesystem-event notification for the watched directory
// (Linux inotify, through the `notify` crate).
//
// Event classes that request a re-scan: file created, file deleted, file
// data written / closed after write, file moved in or out. Which path the
// kernel reported is irrelevant: a trigger always means "re-scan the
// whole directory", and the scheduler coalesces bursts within its debounce
// window. Metadata-only changes (chmod, utimes) do not alter content and
// are dropped.
//
// The notify callback runs on the crate's own event thread and does nothing
// but classify the event and push one Trigger into the channel; all policy
// stays on the scheduler.

use crate::app::Trigger;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::Sender;

/// Keeps the inotify subscription alive for the daemon's lifetime.
///
/// Dropping the watcher removes the kernel watch (scoped teardown on every
/// exit path).
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    /// Subscribe to mutation events under `dir` (one level, not recursive)
    /// and forward each as a `Trigger::FsChange` into `tx`.
    pub fn start(dir: &Path, tx: Sender<Trigger>) -> notify::Result<Self> {
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                match result {
                    Ok(event) => {
                        if is_rescan_event(&event.kind) {
                            tracing::debug!(kind = ?event.kind, "Filesystem change detected");
                            // Scheduler gone means shutdown is in flight;
                            // nothing useful to do with the event.
                            let _ = tx.send(Trigger::FsChange);
                        } else {
                            tracing::trace!(kind = ?event.kind, "Filesystem event ignored");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Filesystem watch error"),
                }
            })?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = %dir.display(), "Kernel filesystem watch active");

        Ok(Self { _watcher: watcher })
    }
}

/// True for event classes that can change the integrity classification.
fn is_rescan_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        _ => false,
    }
}
