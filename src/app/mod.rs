// IntegritySpy - app/mod.rs
//
// Application layer: configuration resolution, trigger sources (signals,
// kernel fs events, interval timer), and the scan scheduler that owns the
// Snapshot.
// Dependencies: core and util layers.

pub mod config;
pub mod scheduler;
pub mod signals;
#[cfg(target_os = "linux")]
pub mod watcher;

/// One re-scan or shutdown request, multiplexed onto a single channel.
///
/// Producers: the SignalRouter thread (`UserScan`, `Shutdown`), the
/// FsWatcher callback (`FsChange`), and the scheduler's own interval timer
/// (`Timer`). Consumed only by the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The periodic interval elapsed.
    Timer,
    /// SIGUSR1: the user asked for an immediate scan.
    UserScan,
    /// The kernel reported a mutation inside the watched directory.
    FsChange,
    /// SIGTERM or SIGUSR2: finish up, write the report, exit.
    Shutdown,
}
