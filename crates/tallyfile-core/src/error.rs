//! Error types for inventory runs.
//!
//! Every message carries a stable number, rendered as `* Error N: ...`. Fatal
//! errors abort the run and map to a process exit code; [`ErrorEntry`] values
//! are per-entry problems that are reported and skipped.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop an inventory before or during a run.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Target path does not exist.
    #[error("* Error 1: '{}' does not exist.", path.display())]
    TargetNotFound { path: PathBuf },

    /// First argument is not a known option.
    #[error("* Error 2: '{option}' is not a recognized option.")]
    UnrecognizedOption { option: String },

    /// Target path exists but is not a directory.
    #[error("* Error 5: '{}' is not a directory.", path.display())]
    NotADirectory { path: PathBuf },

    /// Trailing argument is not an algorithm name.
    #[error("* Error 7: '{argument}' is not an expected argument.")]
    UnexpectedArgument { argument: String },

    /// Directory option given without a directory.
    #[error("* Error 8: A directory must be specified.")]
    MissingDirectory,

    /// Text option given without a text.
    #[error("* Error 14: A text string must be specified.")]
    MissingText,

    /// Writing the report failed.
    #[error("Failed to write inventory output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },
}

impl InventoryError {
    /// Message number of this error, when it has one.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::TargetNotFound { .. } => Some(1),
            Self::UnrecognizedOption { .. } => Some(2),
            Self::NotADirectory { .. } => Some(5),
            Self::UnexpectedArgument { .. } => Some(7),
            Self::MissingDirectory => Some(8),
            Self::MissingText => Some(14),
            Self::Output { .. } => None,
        }
    }

    /// Process exit code for this error.
    ///
    /// Numbered errors exit with their number; output failures use
    /// `EX_IOERR` (74).
    pub fn exit_code(&self) -> u8 {
        self.code().unwrap_or(74)
    }

    /// Resolve a target path lookup failure.
    pub fn target(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::TargetNotFound { path },
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}

/// Kind of per-entry problem found while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A directory was found where a file was expected (flat mode).
    DirectoryEncountered,
    /// The process may not read the file.
    PermissionDenied,
    /// Path is not a directory.
    NotADirectory,
    /// Entry is neither a directory nor a regular file.
    NotAFile,
    /// File could not be opened or probed despite read permission.
    Locked,
    /// Directory could not be entered or listed.
    DirectoryUnreadable,
    /// Reading a file failed while computing its digest.
    ReadFailed,
}

impl ErrorKind {
    /// Stable message number.
    pub fn code(self) -> u8 {
        match self {
            Self::DirectoryEncountered => 3,
            Self::PermissionDenied => 4,
            Self::NotADirectory => 5,
            Self::NotAFile => 6,
            Self::Locked => 12,
            Self::DirectoryUnreadable => 15,
            Self::ReadFailed => 16,
        }
    }
}

/// Non-fatal problem with one entry of the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Path the problem refers to.
    pub path: PathBuf,
    /// Underlying cause, for kinds that report one.
    pub detail: Option<String>,
}

impl ErrorEntry {
    /// Create a new error entry.
    pub fn new(kind: ErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: None,
        }
    }

    /// Create a read failure entry from the I/O error that caused it.
    pub fn read_failed(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            kind: ErrorKind::ReadFailed,
            path: path.into(),
            detail: Some(error.to_string()),
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        write!(f, "* Error {}: ", self.kind.code())?;
        match self.kind {
            ErrorKind::DirectoryEncountered => write!(
                f,
                "'{path}' is a directory. A hash cannot be computed for a directory."
            ),
            ErrorKind::PermissionDenied => {
                write!(f, "No permission to read the file '{path}'.")
            }
            ErrorKind::NotADirectory => write!(f, "'{path}' is not a directory."),
            ErrorKind::NotAFile => write!(f, "'{path}' is not a file."),
            ErrorKind::Locked => write!(
                f,
                "'{path}' is in exclusive use by another process or has been removed."
            ),
            ErrorKind::DirectoryUnreadable => write!(f, "Cannot open directory {path}."),
            ErrorKind::ReadFailed => write!(
                f,
                "Reading '{path}' failed: {}.",
                self.detail.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_messages_are_numbered() {
        let err = InventoryError::UnexpectedArgument {
            argument: "sha512".to_string(),
        };
        assert_eq!(err.to_string(), "* Error 7: 'sha512' is not an expected argument.");
        assert_eq!(err.exit_code(), 7);

        assert_eq!(
            InventoryError::MissingDirectory.to_string(),
            "* Error 8: A directory must be specified."
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            InventoryError::TargetNotFound { path: "/x".into() },
            InventoryError::UnrecognizedOption { option: "-x".into() },
            InventoryError::NotADirectory { path: "/x".into() },
            InventoryError::UnexpectedArgument { argument: "x".into() },
            InventoryError::MissingDirectory,
            InventoryError::MissingText,
            InventoryError::from(std::io::Error::other("broken pipe")),
        ];
        let mut codes: Vec<u8> = errors.iter().map(InventoryError::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_target_error_mapping() {
        let err = InventoryError::target(
            "/missing",
            &std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, InventoryError::TargetNotFound { .. }));
    }

    #[test]
    fn test_error_entry_messages() {
        let entry = ErrorEntry::new(ErrorKind::DirectoryEncountered, "sub");
        assert_eq!(
            entry.to_string(),
            "* Error 3: 'sub' is a directory. A hash cannot be computed for a directory."
        );

        let entry = ErrorEntry::new(ErrorKind::Locked, "busy.db");
        assert!(entry.to_string().starts_with("* Error 12: 'busy.db'"));

        let entry = ErrorEntry::new(ErrorKind::DirectoryUnreadable, "/root/secret");
        assert_eq!(entry.to_string(), "* Error 15: Cannot open directory /root/secret.");
    }

    #[test]
    fn test_read_failed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let entry = ErrorEntry::read_failed("big.iso", &io);
        assert_eq!(entry.kind, ErrorKind::ReadFailed);
        assert_eq!(entry.to_string(), "* Error 16: Reading 'big.iso' failed: short read.");
    }
}
