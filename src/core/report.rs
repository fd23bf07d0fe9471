// IntegritySpy - core/report.rs
//
// JSON serialisation of the integrity report.
// Core layer: writes to any Write trait object; the on-disk path is chosen
// by the caller.
//
// Each invocation produces the complete report in a single
// create-and-write; the file is never appended to or updated in place.

use crate::core::snapshot::ReportEntry;
use crate::util::error::ReportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serialise `entries` as a JSON array into `writer`.
pub fn write_report<W: Write>(
    entries: &[ReportEntry],
    mut writer: W,
    report_path: &Path,
) -> Result<usize, ReportError> {
    serde_json::to_writer_pretty(&mut writer, entries).map_err(|e| ReportError::Json {
        path: report_path.to_path_buf(),
        source: e,
    })?;

    writer.flush().map_err(|e| ReportError::Io {
        path: report_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries.len())
}

/// Create (or truncate) the report file at `path` and write `entries` to it.
pub fn write_report_file(entries: &[ReportEntry], path: &Path) -> Result<usize, ReportError> {
    let file = File::create(path).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let count = write_report(entries, file, path)?;

    tracing::debug!(path = %path.display(), entries = count, "Report written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::IntegrityStatus;
    use std::path::PathBuf;

    fn sample_entries() -> Vec<ReportEntry> {
        vec![
            ReportEntry {
                name: "steady.txt".to_string(),
                status: IntegrityStatus::Ok,
                etalon_crc32: 42,
                result_crc32: 42,
            },
            ReportEntry {
                name: "tampered.txt".to_string(),
                status: IntegrityStatus::Fail,
                etalon_crc32: 1,
                result_crc32: 2,
            },
            ReportEntry {
                name: "gone.txt".to_string(),
                status: IntegrityStatus::Absent,
                etalon_crc32: 7,
                result_crc32: 0,
            },
            ReportEntry {
                name: "planted.txt".to_string(),
                status: IntegrityStatus::New,
                etalon_crc32: 0,
                result_crc32: 9,
            },
        ]
    }

    #[test]
    fn test_report_schema_round_trips_through_json() {
        let mut buf = Vec::new();
        let count = write_report(&sample_entries(), &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 4);

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let array = parsed.as_array().expect("top-level JSON array");
        assert_eq!(array.len(), 4);

        for element in array {
            assert!(element["name"].is_string());
            assert!(element["etalon_crc32"].is_u64());
            assert!(element["result_crc32"].is_u64());
            let status = element["status"].as_str().unwrap();
            assert!(matches!(status, "OK" | "FAIL" | "ABSENT" | "NEW"));
        }

        assert_eq!(array[0]["status"], "OK");
        assert_eq!(array[1]["status"], "FAIL");
        assert_eq!(array[2]["result_crc32"], 0);
        assert_eq!(array[3]["etalon_crc32"], 0);
    }

    #[test]
    fn test_write_report_file_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report_file(&sample_entries(), &path).unwrap();
        assert!(path.exists());

        // A second write replaces, never appends.
        write_report_file(&sample_entries()[..1], &path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_subdir").join("report.json");
        let result = write_report_file(&sample_entries(), &path);
        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
