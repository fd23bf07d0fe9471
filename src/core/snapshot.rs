// IntegritySpy - core/snapshot.rs
//
// In-memory baseline plus most recent observation, and the OK/FAIL/ABSENT/NEW
// classification that becomes the report.
//
// Lifecycle: exactly one baseline pass (`install_baseline`), then any number
// of observation passes (`apply_observation`), strictly ordered by the
// scheduler. Baseline checksums are immutable after installation. Entries are
// never removed; a file that disappears keeps its slot so the report can
// state ABSENT with the original baseline value.
//
// Ordering: classification yields entries in first-observation order:
// baseline enumeration order first, then append order for files that showed
// up in later scans.

use crate::core::scanner::ScanEntry;
use crate::util::error::SnapshotError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Integrity verdict for one file, derived at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntegrityStatus {
    /// Baseline and last observation present and equal.
    Ok,
    /// Baseline and last observation present but different.
    Fail,
    /// Baseline present, file missing from the last scan.
    Absent,
    /// No baseline; the file appeared after startup.
    New,
}

/// One element of the JSON report.
///
/// Both CRC fields are always present: for ABSENT the result is reported as
/// 0, for NEW the etalon is reported as 0. The status field is
/// authoritative; the CRC fields are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub status: IntegrityStatus,
    pub etalon_crc32: u32,
    pub result_crc32: u32,
}

/// A single monitored file.
///
/// `baseline` is set once at startup (or never, for files first seen in a
/// later scan). `observed` tracks the most recent scan: `None` means the
/// file was missing from that scan.
#[derive(Debug)]
struct FileEntry {
    name: String,
    baseline: Option<u32>,
    observed: Option<u32>,
}

/// The baseline snapshot and latest observation of the watched directory.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// Entries in first-observation order.
    entries: Vec<FileEntry>,
    /// Name to index into `entries`.
    index: HashMap<String, usize>,
    baseline_installed: bool,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `install_baseline` has run.
    pub fn is_initialized(&self) -> bool {
        self.baseline_installed
    }

    /// Number of files currently tracked (baseline plus later arrivals).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install the startup baseline. Callable exactly once.
    ///
    /// Each baseline checksum also counts as the first observation, so a
    /// daemon terminated before any re-scan still reports every file OK.
    pub fn install_baseline(&mut self, entries: Vec<ScanEntry>) -> Result<(), SnapshotError> {
        if self.baseline_installed {
            return Err(SnapshotError::AlreadyInitialized);
        }
        self.baseline_installed = true;

        for (name, crc) in entries {
            // Duplicate names cannot occur within one directory listing;
            // keep the first if the filesystem misbehaves.
            if self.index.contains_key(&name) {
                continue;
            }
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push(FileEntry {
                name,
                baseline: Some(crc),
                observed: Some(crc),
            });
        }

        tracing::info!(files = self.entries.len(), "Baseline installed");
        Ok(())
    }

    /// Record the outcome of one re-scan.
    ///
    /// Known names get their last-observed checksum updated; unknown names
    /// are appended with no baseline (NEW candidates); tracked names missing
    /// from this pass have their observation cleared (ABSENT candidates).
    pub fn apply_observation(&mut self, entries: Vec<ScanEntry>) {
        let mut seen: HashSet<usize> = HashSet::with_capacity(entries.len());

        for (name, crc) in entries {
            match self.index.get(&name) {
                Some(&i) => {
                    self.entries[i].observed = Some(crc);
                    seen.insert(i);
                }
                None => {
                    seen.insert(self.entries.len());
                    self.index.insert(name.clone(), self.entries.len());
                    self.entries.push(FileEntry {
                        name,
                        baseline: None,
                        observed: Some(crc),
                    });
                }
            }
        }

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if !seen.contains(&i) {
                entry.observed = None;
            }
        }
    }

    /// Produce the comparison report in first-observation order.
    ///
    /// A file that appeared in a post-baseline scan and vanished again by
    /// the latest one has neither a baseline nor an observation; it is
    /// omitted, keeping the report equal to the union of baseline and last-observed names.
    pub fn classify(&self) -> Vec<ReportEntry> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let (status, etalon, result) = match (entry.baseline, entry.observed) {
                    (Some(b), Some(r)) if b == r => (IntegrityStatus::Ok, b, r),
                    (Some(b), Some(r)) => (IntegrityStatus::Fail, b, r),
                    (Some(b), None) => (IntegrityStatus::Absent, b, 0),
                    (None, Some(r)) => (IntegrityStatus::New, 0, r),
                    (None, None) => return None,
                };
                Some(ReportEntry {
                    name: entry.name.clone(),
                    status,
                    etalon_crc32: etalon,
                    result_crc32: result,
                })
            })
            .collect()
    }
}
