// IntegritySpy - app/scheduler.rs
//
// The scan scheduler: a single-consumer event loop that owns the Snapshot
// and multiplexes the three trigger sources over one mpsc channel.
//
// Architecture:
//   - The interval timer is the `recv_timeout` deadline; there is no timer thread.
//   - The SignalRouter thread and the FsWatcher callback only ever enqueue
//     `Trigger`s; every scan, classification, and report write happens here,
//     on the caller's thread.
//   - Each loop iteration drains all already-pending triggers and collapses
//     any number of scan requests into at most one scan, so a SIGUSR1 storm
//     or an inotify burst never builds a scan backlog. Shutdown is latched
//     during the drain and honored only after a pending scan completes, so
//     the final report reflects every scan request that preceded it.
//
// Lifecycle: `install_baseline` exactly once, then `run` until a Shutdown
// trigger (or the loss of every producer) ends the loop. The report is
// rewritten after each completed scan, so its existence tells supervising
// scripts a scan has happened, and once more on the way out; only that
// final write is fatal on failure.

use crate::app::Trigger;
use crate::core::{report, scanner, snapshot::Snapshot};
use crate::util::constants::FS_DEBOUNCE_WINDOW_MS;
use crate::util::error::Result;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Work collected from one drain of the trigger channel.
#[derive(Debug, Default)]
struct PendingWork {
    /// At least one scan-class trigger (Timer / UserScan / FsChange) arrived.
    scan: bool,
    /// A Shutdown trigger arrived; honored after any pending scan.
    shutdown: bool,
    /// The scan request came (at least partly) from the kernel watcher, so
    /// the burst may still be in flight and is worth debouncing.
    fs_burst: bool,
}

impl PendingWork {
    fn absorb(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Timer | Trigger::UserScan => self.scan = true,
            Trigger::FsChange => {
                self.scan = true;
                self.fs_burst = true;
            }
            Trigger::Shutdown => self.shutdown = true,
        }
    }
}

/// Single-threaded scan scheduler; owns the Snapshot.
pub struct ScanScheduler {
    dir: PathBuf,
    interval: Duration,
    report_path: PathBuf,
    rx: Receiver<Trigger>,
    snapshot: Snapshot,
}

impl ScanScheduler {
    pub fn new(
        dir: PathBuf,
        interval: Duration,
        report_path: PathBuf,
        rx: Receiver<Trigger>,
    ) -> Self {
        Self {
            dir,
            interval,
            report_path,
            rx,
            snapshot: Snapshot::new(),
        }
    }

    /// Run the initial scan and install it as the immutable baseline.
    ///
    /// Returns the number of files in the baseline. Fatal when the watched
    /// directory cannot be opened: the daemon has nothing to monitor.
    pub fn install_baseline(&mut self) -> Result<usize> {
        let (entries, _warnings) = scanner::scan_dir(&self.dir)?;
        let count = entries.len();
        self.snapshot.install_baseline(entries)?;
        Ok(count)
    }

    /// Run the event loop until shutdown, then write the final report.
    ///
    /// Consumes the scheduler: after this returns the daemon is done.
    pub fn run(mut self) -> Result<()> {
        let mut deadline = Instant::now() + self.interval;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            let first = match self.rx.recv_timeout(timeout) {
                Ok(trigger) => trigger,
                Err(RecvTimeoutError::Timeout) => Trigger::Timer,
                // Every producer is gone; treat as shutdown so the loop
                // cannot spin and the report still lands.
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("All trigger sources disconnected; shutting down");
                    Trigger::Shutdown
                }
            };

            let mut pending = PendingWork::default();
            pending.absorb(first);
            self.drain_channel(&mut pending);

            if pending.fs_burst && !pending.shutdown {
                self.debounce_fs_burst(&mut pending);
            }

            if pending.scan {
                self.run_scan();
                deadline = Instant::now() + self.interval;
            }

            if pending.shutdown {
                tracing::info!("Shutdown trigger received; leaving event loop");
                break;
            }
        }

        // Terminal report write; a failure here must reach the exit code.
        let entries = self.snapshot.classify();
        report::write_report_file(&entries, &self.report_path)?;
        tracing::info!(entries = entries.len(), "Final report emitted");
        Ok(())
    }

    /// Collapse every already-pending trigger into `pending`. A signal storm
    /// enqueues far slower than `try_recv` drains, so this terminates as
    /// soon as the channel catches up with the producers.
    fn drain_channel(&self, pending: &mut PendingWork) {
        while let Ok(trigger) = self.rx.try_recv() {
            pending.absorb(trigger);
        }
    }

    /// Keep absorbing triggers until the kernel-event burst goes quiet or
    /// the debounce window closes. Shutdown cuts the wait short.
    fn debounce_fs_burst(&self, pending: &mut PendingWork) {
        let window_end = Instant::now() + Duration::from_millis(FS_DEBOUNCE_WINDOW_MS);
        loop {
            let remaining = window_end.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(trigger) => {
                    pending.absorb(trigger);
                    if pending.shutdown {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }

    /// One re-scan: enumerate, checksum, fold into the snapshot, rewrite
    /// the report. Nothing in here is fatal: a vanished directory marks
    /// every tracked file absent, and a failed report write is retried by
    /// the next scan or the terminal write.
    fn run_scan(&mut self) {
        match scanner::scan_dir(&self.dir) {
            Ok((entries, _warnings)) => {
                tracing::debug!(files = entries.len(), "Re-scan complete");
                self.snapshot.apply_observation(entries);
            }
            Err(e) => {
                tracing::error!(error = %e, "Re-scan failed; tracked files will report ABSENT");
                self.snapshot.apply_observation(Vec::new());
            }
        }

        let entries = self.snapshot.classify();
        if let Err(e) = report::write_report_file(&entries, &self.report_path) {
            tracing::error!(error = %e, "Report write failed; will retry on next scan");
        }
    }
}
