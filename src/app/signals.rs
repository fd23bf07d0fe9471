// IntegritySpy - app/signals.rs
//
// Signal dispositions and their translation into scheduler triggers.
//
// Architecture:
//   - `signal-hook` installs async-signal-safe handlers that do nothing but
//     write one byte into its internal self-pipe.
//   - A background thread named `signal-router` drains that pipe through
//     `Signals::forever` and forwards policy-level `Trigger`s over an mpsc
//     channel to the scheduler. All semantic work happens off the handler.
//
// Dispositions:
//   - SIGTERM, SIGUSR2: one Shutdown trigger; later deliveries are dropped.
//   - SIGUSR1: a UserScan trigger per delivery. Under a storm the kernel and
//     the scheduler's drain both coalesce, so between two drains the
//     scheduler observes at least one and at most N UserScan events.
//   - SIGINT, SIGQUIT, SIGHUP, SIGCONT: registered so the platform default
//     (terminate / core / stop-continue side effects) is replaced, then
//     dropped here. They neither terminate the daemon nor trigger a scan.
//   - Everything else keeps its platform default.

use crate::app::Trigger;
use signal_hook::consts::signal::{
    SIGCONT, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGUSR1, SIGUSR2,
};
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

/// Owns the signal dispositions for the lifetime of the daemon.
///
/// Dropping the router closes the signal iterator, which ends the
/// `signal-router` thread; the process-level handlers stay installed (the
/// daemon is already past the point of caring by then).
pub struct SignalRouter {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalRouter {
    /// Install dispositions and start forwarding triggers into `tx`.
    pub fn install(tx: Sender<Trigger>) -> io::Result<Self> {
        let mut signals = Signals::new([
            SIGTERM, SIGUSR2, SIGUSR1, SIGINT, SIGQUIT, SIGHUP, SIGCONT,
        ])?;
        let handle = signals.handle();

        let thread = std::thread::Builder::new()
            .name("signal-router".into())
            .spawn(move || {
                let mut shutdown_sent = false;
                for signal in signals.forever() {
                    let trigger = match signal {
                        SIGTERM | SIGUSR2 => {
                            if shutdown_sent {
                                tracing::debug!(signal, "Duplicate shutdown signal dropped");
                                continue;
                            }
                            shutdown_sent = true;
                            Trigger::Shutdown
                        }
                        SIGUSR1 => Trigger::UserScan,
                        // Explicitly ignored set.
                        _ => {
                            tracing::debug!(signal, "Ignored signal");
                            continue;
                        }
                    };

                    tracing::debug!(signal, ?trigger, "Signal translated");
                    if tx.send(trigger).is_err() {
                        // Scheduler gone; nothing left to route.
                        break;
                    }
                }
            })?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Stop delivering triggers and join the router thread.
    pub fn close(mut self) {
        self.shutdown_thread();
    }

    fn shutdown_thread(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SignalRouter {
    fn drop(&mut self) {
        self.shutdown_thread();
    }
}
