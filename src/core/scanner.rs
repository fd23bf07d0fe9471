// IntegritySpy - core/scanner.rs
//
// Flat directory enumeration and per-file checksumming.
//
// The scanner looks exactly one level deep: subdirectories, symlinks,
// devices, and sockets are skipped, never followed. Entries come back in
// the natural enumeration order of the host filesystem (stable within one
// call, not sorted); the Snapshot preserves this as first-observation
// order for the report.
//
// Per-file failures are non-fatal and collected as warnings: a file that
// vanishes or becomes unreadable between enumeration and checksumming is
// simply omitted, and the Snapshot classifies it ABSENT on the next pass.

use crate::core::checksum;
use crate::util::error::ScanError;
use std::io;
use std::path::Path;

/// One scanned file: name relative to the watched directory, plus its CRC32.
pub type ScanEntry = (String, u32);

/// Enumerate the regular files of `dir` and checksum each one.
///
/// # Non-fatal errors
/// Files that cannot be read and entries with non-UTF-8 names are recorded
/// as human-readable strings in the returned warnings vector and do NOT
/// cause the function to return `Err`.
///
/// # Fatal errors
/// Returns `Err(ScanError::DirOpen)` only when `dir` itself cannot be
/// opened or is not a directory.
pub fn scan_dir(dir: &Path) -> Result<(Vec<ScanEntry>, Vec<String>), ScanError> {
    // Pre-flight: surface a missing or non-directory root as one typed
    // error instead of a per-entry walkdir failure.
    if !dir.is_dir() {
        return Err(ScanError::DirOpen {
            path: dir.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::NotFound,
                "does not exist or is not a directory",
            ),
        });
    }

    let mut entries: Vec<ScanEntry> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // The root disappearing mid-walk is fatal; anything else is
                // a per-entry failure and non-fatal.
                if !dir.is_dir() {
                    return Err(ScanError::DirOpen {
                        path: dir.to_path_buf(),
                        source: e.into_io_error().unwrap_or_else(|| {
                            io::Error::new(io::ErrorKind::NotFound, "directory removed")
                        }),
                    });
                }
                let msg = format!("cannot access entry under '{}': {e}", dir.display());
                tracing::warn!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        // One level deep, regular files only.
        if !entry.file_type().is_file() {
            tracing::trace!(entry = %entry.path().display(), "Skipping non-regular entry");
            continue;
        }

        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => {
                let msg = format!(
                    "skipping '{}': non-UTF-8 filename",
                    entry.path().display()
                );
                tracing::warn!(warning = %msg, "Scan warning");
                warnings.push(msg);
                continue;
            }
        };

        match checksum::file_crc32(entry.path()) {
            Ok(crc) => entries.push((name, crc)),
            Err(e) => {
                let msg = format!("cannot read '{}': {e}", entry.path().display());
                tracing::warn!(warning = %msg, "Scan warning");
                warnings.push(msg);
            }
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        files = entries.len(),
        warnings = warnings.len(),
        "Scan complete"
    );

    Ok((entries, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_flat_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("a.txt"), "alpha").expect("write a.txt");
        fs::write(root.join("b.txt"), "bravo").expect("write b.txt");

        // Subdirectory with a file: neither may appear in the scan.
        let sub = root.join("nested");
        fs::create_dir(&sub).expect("mkdir nested");
        fs::write(sub.join("deep.txt"), "deep").expect("write deep.txt");

        dir
    }

    #[test]
    fn test_scans_regular_files_one_level_deep() {
        let dir = make_flat_tree();
        let (entries, warnings) = scan_dir(dir.path()).unwrap();

        let mut names: Vec<_> = entries.iter().map(|(n, _)| n.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_checksums_match_file_content() {
        let dir = make_flat_tree();
        let (entries, _) = scan_dir(dir.path()).unwrap();

        let crc_a = entries.iter().find(|(n, _)| n == "a.txt").unwrap().1;
        assert_eq!(crc_a, crc32fast::hash(b"alpha"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = make_flat_tree();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt"))
            .expect("symlink");

        let (entries, _) = scan_dir(dir.path()).unwrap();
        assert!(
            !entries.iter().any(|(n, _)| n == "link.txt"),
            "symlink must not be scanned"
        );
    }

    #[test]
    fn test_missing_root_is_dir_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("never_created");
        let result = scan_dir(&gone);
        assert!(matches!(result, Err(ScanError::DirOpen { .. })));
    }

    #[test]
    fn test_root_that_is_a_file_is_dir_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();
        let result = scan_dir(&file);
        assert!(matches!(result, Err(ScanError::DirOpen { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_warning_not_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = make_flat_tree();
        let locked = dir.path().join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let (entries, warnings) = scan_dir(dir.path()).unwrap();

        // Restore permissions so TempDir cleanup succeeds everywhere.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        // Root user can read anything; only assert the skip when the open
        // actually failed.
        if !warnings.is_empty() {
            assert!(!entries.iter().any(|(n, _)| n == "locked.txt"));
            assert!(warnings.iter().any(|w| w.contains("locked.txt")));
        }
    }
}
