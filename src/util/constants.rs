// IntegritySpy - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "IntegritySpy";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Report
// =============================================================================

/// Report file name, written to the daemon's working directory.
///
/// Supervising scripts treat the presence of this file as proof that at
/// least one integrity scan has completed.
pub const REPORT_FILE_NAME: &str = ".integrityspy-report.json";

// =============================================================================
// Checksumming
// =============================================================================

/// Read chunk size in bytes for streaming checksum computation.
pub const CHECKSUM_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

// =============================================================================
// Scheduler
// =============================================================================

/// Window in milliseconds over which bursts of kernel filesystem events are
/// coalesced into a single re-scan. A mass file operation (unpack, rm -rf)
/// emits one event per file; one scan covers the whole burst.
pub const FS_DEBOUNCE_WINDOW_MS: u64 = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Environment variable consulted when --dir is absent.
pub const ENV_DIR: &str = "dir";

/// Environment variable consulted when --interval is absent.
pub const ENV_INTERVAL: &str = "interval";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
