//! Per-entry classification before hashing.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::digest::CHUNK_SIZE;

/// What a filesystem entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A directory (symlinks are followed).
    Directory,
    /// A regular file whose first chunk could be read.
    Readable,
    /// A regular file the process has no permission to open.
    Unreadable,
    /// Could not be opened or read despite permission: held by another
    /// process, removed since listing, or a dangling link.
    Locked,
    /// Exists but is neither a directory nor a regular file.
    NotAFile,
}

/// Classify `path` by opening it and reading a probe chunk.
///
/// Best effort only: a file classified as readable can still fail later.
pub fn classify(path: &Path) -> Classification {
    classify_with_probe(path, CHUNK_SIZE)
}

/// Like [`classify`], with an explicit probe size.
pub fn classify_with_probe(path: &Path, probe_size: usize) -> Classification {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => return Classification::Directory,
        Ok(metadata) if !metadata.is_file() => return Classification::NotAFile,
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Classification::Unreadable;
        }
        Err(_) => return Classification::Locked,
    }

    match probe(path, probe_size) {
        Ok(()) => Classification::Readable,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Classification::Unreadable,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "probe read failed");
            Classification::Locked
        }
    }
}

fn probe(path: &Path, probe_size: usize) -> io::Result<()> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; probe_size.max(1)];
    file.read(&mut buffer).map(|_| ())
}
