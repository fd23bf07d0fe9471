// IntegritySpy - core/checksum.rs
//
// Streaming CRC32 of a single regular file.
//
// The checksum is the standard zlib/PNG CRC32 (IEEE polynomial 0xEDB88320,
// reflected, initial value 0xFFFFFFFF, final XOR 0xFFFFFFFF), computed by
// `crc32fast`. Files are read in fixed-size chunks so memory usage stays
// flat regardless of file size.
//
// EINTR discipline: a SIGUSR1 storm interrupts reads mid-scan. Interrupted
// reads are retried in place and never abort the scan.

use crate::util::constants::CHECKSUM_CHUNK_SIZE;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compute the CRC32 of the byte content of the file at `path`.
///
/// Returns an `io::Error` when the file cannot be opened or read; the
/// caller decides whether that is fatal (it is not, for per-file failures
/// during a directory scan).
pub fn file_crc32(path: &Path) -> io::Result<u32> {
    let file = File::open(path)?;
    reader_crc32(file)
}

/// Compute the CRC32 of everything readable from `reader`.
///
/// `ErrorKind::Interrupted` is retried transparently; any other read error
/// is returned to the caller.
pub fn reader_crc32<R: Read>(mut reader: R) -> io::Result<u32> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; CHECKSUM_CHUNK_SIZE];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(hasher.finalize())
}
