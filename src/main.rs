// IntegritySpy - main.rs
//
// Daemon entry point. Handles:
// 1. CLI argument parsing with environment fallback
// 2. Logging initialisation (debug mode support)
// 3. Trigger plumbing: signal router, kernel fs watcher (Linux), scheduler
// 4. The startup handshake line and final exit code
//
// Stderr discipline: supervising scripts read the FIRST stderr line for the
// argument-error contract and the first stdout line for the PID handshake.
// Nothing may log above debug level before initialisation has succeeded,
// and stdout carries exactly one line: the banner.

use clap::Parser;
use integrityspy::app::config::WatchConfig;
use integrityspy::app::scheduler::ScanScheduler;
use integrityspy::app::signals::SignalRouter;
use integrityspy::util;
use integrityspy::util::constants::REPORT_FILE_NAME;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

/// IntegritySpy - file-integrity monitoring daemon.
///
/// Computes a CRC32 baseline of every regular file in the watched directory
/// at startup, re-scans on a timer, on SIGUSR1, and (on Linux) on kernel
/// filesystem events, and writes a JSON comparison report.
#[derive(Parser, Debug)]
#[command(name = "integrityspy", version, about)]
struct Cli {
    /// Directory to monitor (environment fallback: dir).
    #[arg(short = 'd', long = "dir")]
    dir: Option<String>,

    /// Scan period in seconds, a positive integer (environment fallback: interval).
    #[arg(short = 'n', long = "interval")]
    interval: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    let config = match WatchConfig::resolve(cli.dir, cli.interval) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // All trigger sources funnel into one channel; the scheduler is the
    // only consumer.
    let (tx, rx) = mpsc::channel();

    let router = match SignalRouter::install(tx.clone()) {
        Ok(router) => router,
        Err(e) => {
            eprintln!("Error: failed to install signal handlers: {e}");
            std::process::exit(1);
        }
    };

    let mut scheduler = ScanScheduler::new(
        config.dir.clone(),
        config.interval,
        PathBuf::from(REPORT_FILE_NAME),
        rx,
    );

    let baseline_files = match scheduler.install_baseline() {
        Ok(count) => count,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Kernel filesystem events augment the timer where available; losing
    // them degrades to timer-only operation, it does not stop the daemon.
    #[cfg(target_os = "linux")]
    let _watcher = match integrityspy::app::watcher::FsWatcher::start(&config.dir, tx.clone()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(error = %e, "Kernel watch unavailable; running timer-only");
            None
        }
    };

    drop(tx);

    // Startup handshake: exactly one stdout line whose last token is the
    // PID. Supervisors block on this line before sending any signals.
    println!("Demon is launched at {}", std::process::id());
    let _ = std::io::stdout().flush();

    tracing::info!(
        version = util::constants::APP_VERSION,
        dir = %config.dir.display(),
        interval_secs = config.interval.as_secs(),
        files = baseline_files,
        "IntegritySpy running"
    );

    let result = scheduler.run();
    router.close();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
