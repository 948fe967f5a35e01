//! Summary statistics for an inventory run.

use crate::error::ErrorKind;

/// Counters collected while walking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    /// Files with an emitted record.
    pub files: u64,
    /// Total bytes of inventoried files.
    pub bytes: u64,
    /// Directories entered (recursive mode) or listed (flat mode).
    pub dirs: u64,
    /// Files reported as locked.
    pub locked: u64,
    /// Error entries reported, locked files excluded.
    pub errors: u64,
}

impl InventoryStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an emitted inventory line.
    pub fn record_file(&mut self, size: u64) {
        self.files += 1;
        self.bytes += size;
    }

    /// Record a directory that was listed.
    pub fn record_dir(&mut self) {
        self.dirs += 1;
    }

    /// Record a reported problem.
    pub fn record_error(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Locked => self.locked += 1,
            _ => self.errors += 1,
        }
    }

    /// Whether every entry produced a record.
    pub fn is_clean(&self) -> bool {
        self.locked == 0 && self.errors == 0
    }
}
