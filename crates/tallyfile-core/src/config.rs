//! Inventory configuration types.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::algorithm::Algorithm;

/// Default read size for probing and streaming file content.
const DEFAULT_CHUNK_SIZE: usize = 8192;

/// How far the walker descends from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Only the immediate entries of the root; subdirectories are reported.
    #[default]
    Flat,
    /// Depth-first pre-order over the whole subtree.
    Recursive,
}

/// Order in which directory entries are visited in recursive mode.
///
/// Flat mode always sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Ascending byte-wise order of the entry name.
    #[default]
    Sorted,
    /// Whatever order the operating system lists entries in.
    Listing,
}

/// Configuration for an inventory run.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct InventoryConfig {
    /// Directory to inventory.
    pub root: PathBuf,

    /// Digest algorithm for every record.
    #[builder(default)]
    pub algorithm: Algorithm,

    /// Flat or recursive traversal.
    #[builder(default)]
    pub mode: TraversalMode,

    /// Entry ordering for recursive traversal.
    #[builder(default)]
    pub order: EntryOrder,

    /// Bytes read per chunk when probing and hashing files.
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// User name shown in the report header (None = look it up).
    #[builder(default)]
    pub user: Option<String>,
}

impl InventoryConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if self.chunk_size == Some(0) {
            return Err("Chunk size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl InventoryConfig {
    /// Create a new config builder.
    pub fn builder() -> InventoryConfigBuilder {
        InventoryConfigBuilder::default()
    }

    /// Create a flat SHA-256 config for a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            algorithm: Algorithm::default(),
            mode: TraversalMode::default(),
            order: EntryOrder::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            user: None,
        }
    }

    /// Whether the walker descends into subdirectories.
    pub fn is_recursive(&self) -> bool {
        self.mode == TraversalMode::Recursive
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
