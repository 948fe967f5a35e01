//! Inventory record types.

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Timestamp layout used for record modification times and report framing.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a local timestamp with second precision.
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// One line of an inventory: digest, size, modification time and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Hex digest of the file content.
    pub hash: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time in the local time zone.
    pub modified: DateTime<Local>,
    /// Path as it appears in the report.
    pub path: PathBuf,
}

impl InventoryRecord {
    /// Create a record from raw file metadata.
    pub fn new(
        hash: impl Into<String>,
        size: u64,
        modified: SystemTime,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hash: hash.into(),
            size,
            modified: DateTime::<Local>::from(modified),
            path: path.into(),
        }
    }
}

impl fmt::Display for InventoryRecord {
    /// Tab-separated `hash size modified path`, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.hash,
            self.size,
            format_timestamp(&self.modified),
            self.path.display()
        )
    }
}
