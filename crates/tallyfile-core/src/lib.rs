//! Core types for tallyfile.
//!
//! This crate provides the data structures shared by the scanning engine and
//! the command line front end: digest algorithms, inventory records, error
//! entries, run configuration and statistics.

mod algorithm;
mod config;
mod error;
mod record;
mod stats;

pub use algorithm::Algorithm;
pub use config::{EntryOrder, InventoryConfig, InventoryConfigBuilder, TraversalMode};
pub use error::{ErrorEntry, ErrorKind, InventoryError};
pub use record::{InventoryRecord, TIMESTAMP_FORMAT, format_timestamp};
pub use stats::InventoryStats;
