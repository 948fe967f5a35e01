//! Directory walking and digest engine for tallyfile.
//!
//! # Overview
//!
//! `tallyfile-scan` turns a directory into an inventory: one tab-separated
//! line per file with its digest, size and modification time. Key pieces:
//!
//! - **Digest engine** streaming SHA-256, SHA-1, MD5 or CRC-32 in 8 KiB chunks
//! - **Classifier** telling readable, locked, unreadable and special entries apart
//! - **Walker** for flat (sorted, one level) and recursive (pre-order) runs
//! - **Report framing** with header and footer around the lines
//!
//! # Example
//!
//! ```rust,no_run
//! use tallyfile_scan::{Algorithm, InventoryConfig, TraversalMode, generate_inventory};
//!
//! let config = InventoryConfig::builder()
//!     .root("/path/to/inventory")
//!     .algorithm(Algorithm::Md5)
//!     .mode(TraversalMode::Recursive)
//!     .build()
//!     .unwrap();
//!
//! let stdout = std::io::stdout();
//! let stats = generate_inventory(&config, &mut stdout.lock()).unwrap();
//! eprintln!("{} files, {} bytes", stats.files, stats.bytes);
//! ```
//!
//! # Digests only
//!
//! ```rust
//! use tallyfile_scan::{Algorithm, DigestSource, compute_digest};
//!
//! let hex = compute_digest(DigestSource::Text(b"123456789"), Algorithm::Crc32).unwrap();
//! assert_eq!(hex, "CBF43926");
//! ```

mod classify;
mod digest;
mod report;
mod walker;

pub use classify::{Classification, classify, classify_with_probe};
pub use digest::{
    CHUNK_SIZE, Crc32, DigestSource, compute_digest, digest_bytes, digest_file, digest_reader,
};
pub use report::{COLUMNS, RULE, current_user, emit_footer, emit_header, generate_inventory};
pub use walker::InventoryWalker;

// Re-export core types for convenience
pub use tallyfile_core::{
    Algorithm, EntryOrder, ErrorEntry, ErrorKind, InventoryConfig, InventoryError,
    InventoryRecord, InventoryStats, TraversalMode,
};
