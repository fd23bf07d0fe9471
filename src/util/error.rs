// IntegritySpy - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.
//
// The Display strings of ConfigError and ScanError::DirOpen are part of the
// external stderr contract: supervising scripts match on the substrings
// "dir argument is required", "interval argument is required",
// "invalid interval argument", and "failed to open directory".

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all IntegritySpy operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum IntegrityError {
    /// Argument/environment resolution failed.
    Config(ConfigError),

    /// Directory scan failed.
    Scan(ScanError),

    /// Snapshot lifecycle violation.
    Snapshot(SnapshotError),

    /// Report serialisation or write failed.
    Report(ReportError),
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Scan(e) => write!(f, "{e}"),
            Self::Snapshot(e) => write!(f, "{e}"),
            Self::Report(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IntegrityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Scan(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors resolving the watched directory and scan interval from the CLI
/// and the environment.
#[derive(Debug)]
pub enum ConfigError {
    /// No directory given on the CLI or in the environment.
    MissingDir,

    /// No interval given on the CLI or in the environment.
    MissingInterval,

    /// The interval value is not a positive integer.
    InvalidInterval { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDir => write!(f, "dir argument is required"),
            Self::MissingInterval => write!(f, "interval argument is required"),
            Self::InvalidInterval { value } => {
                write!(f, "invalid interval argument: '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for IntegrityError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// Fatal errors enumerating the watched directory.
///
/// Per-file read failures are NOT represented here: they are non-fatal and
/// surface as warning strings from `core::scanner::scan_dir`.
#[derive(Debug)]
pub enum ScanError {
    /// The watched directory cannot be opened or is not a directory.
    DirOpen { path: PathBuf, source: io::Error },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirOpen { path, source } => {
                write!(f, "failed to open directory '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirOpen { source, .. } => Some(source),
        }
    }
}

impl From<ScanError> for IntegrityError {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

// ---------------------------------------------------------------------------
// Snapshot errors
// ---------------------------------------------------------------------------

/// Snapshot lifecycle errors.
#[derive(Debug)]
pub enum SnapshotError {
    /// `install_baseline` was called on a snapshot that already has one.
    AlreadyInitialized,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => {
                write!(f, "baseline already installed; snapshots take exactly one baseline pass")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<SnapshotError> for IntegrityError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors writing the integrity report.
#[derive(Debug)]
pub enum ReportError {
    /// I/O error creating or writing the report file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "report I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "report JSON error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for IntegrityError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

/// Convenience type alias for IntegritySpy results.
pub type Result<T> = std::result::Result<T, IntegrityError>;
