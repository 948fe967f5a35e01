//! Flat and recursive inventory traversal.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tallyfile_core::{
    Algorithm, EntryOrder, ErrorEntry, ErrorKind, InventoryConfig, InventoryError,
    InventoryRecord, InventoryStats, TraversalMode,
};

use crate::classify::{Classification, classify_with_probe};
use crate::digest::{CHUNK_SIZE, digest_file};

/// Walks a directory and writes one inventory line per entry.
///
/// Single-threaded; every line is written to the sink as soon as it is
/// known, except the deferred notices of flat mode.
#[derive(Debug, Clone)]
pub struct InventoryWalker {
    algorithm: Algorithm,
    order: EntryOrder,
    chunk_size: usize,
}

impl InventoryWalker {
    /// Create a walker hashing with `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            order: EntryOrder::default(),
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a walker from a run configuration.
    pub fn from_config(config: &InventoryConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            order: config.order,
            chunk_size: config.chunk_size,
        }
    }

    /// Set the entry order used in recursive mode.
    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the probe and streaming read size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Walk `root` in the given mode.
    pub fn walk<W: Write>(
        &self,
        root: &Path,
        mode: TraversalMode,
        out: &mut W,
    ) -> Result<InventoryStats, InventoryError> {
        match mode {
            TraversalMode::Flat => self.walk_flat(root, out),
            TraversalMode::Recursive => self.walk_recursive(root, out),
        }
    }

    /// Inventory the immediate entries of `dir` in sorted order.
    ///
    /// Files are written as they are hashed, with paths relative to `dir`.
    /// Directory, permission and special-file notices are held back and
    /// written after the last file. Subdirectories are never entered.
    pub fn walk_flat<W: Write>(
        &self,
        dir: &Path,
        out: &mut W,
    ) -> Result<InventoryStats, InventoryError> {
        let mut stats = InventoryStats::new();
        let mut deferred = Vec::new();

        match list_entries(dir, EntryOrder::Sorted) {
            Ok(names) => {
                stats.record_dir();
                for name in names {
                    let path = dir.join(&name);
                    let shown = Path::new(&name);
                    match classify_with_probe(&path, self.chunk_size) {
                        Classification::Directory => {
                            deferred.push(ErrorEntry::new(ErrorKind::DirectoryEncountered, shown));
                        }
                        Classification::Unreadable => {
                            deferred.push(ErrorEntry::new(ErrorKind::PermissionDenied, shown));
                        }
                        Classification::NotAFile => {
                            deferred.push(ErrorEntry::new(ErrorKind::NotAFile, shown));
                        }
                        Classification::Locked => {
                            emit_error(out, &mut stats, ErrorEntry::new(ErrorKind::Locked, shown))?;
                        }
                        Classification::Readable => {
                            self.emit_file(&path, shown, out, &mut stats)?;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "cannot list directory");
                deferred.push(ErrorEntry::new(ErrorKind::DirectoryUnreadable, dir));
            }
        }

        for entry in deferred {
            emit_error(out, &mut stats, entry)?;
        }

        Ok(stats)
    }

    /// Inventory `path` and everything below it, depth-first pre-order.
    ///
    /// Paths are written in absolute form. A directory that cannot be
    /// entered is reported and skipped; its siblings are still visited.
    pub fn walk_recursive<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<InventoryStats, InventoryError> {
        let mut stats = InventoryStats::new();
        self.visit(path, out, &mut stats)?;
        Ok(stats)
    }

    fn visit<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
        stats: &mut InventoryStats,
    ) -> Result<(), InventoryError> {
        match classify_with_probe(path, self.chunk_size) {
            Classification::Directory => self.descend(path, out, stats),
            Classification::Readable => self.emit_file(path, path, out, stats),
            Classification::Unreadable => {
                emit_error(out, stats, ErrorEntry::new(ErrorKind::PermissionDenied, path))
            }
            Classification::NotAFile => {
                emit_error(out, stats, ErrorEntry::new(ErrorKind::NotAFile, path))
            }
            Classification::Locked => {
                emit_error(out, stats, ErrorEntry::new(ErrorKind::Locked, path))
            }
        }
    }

    fn descend<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
        stats: &mut InventoryStats,
    ) -> Result<(), InventoryError> {
        // Each frame owns its resolved directory; nothing global changes.
        let listing = fs::canonicalize(path)
            .and_then(|cursor| list_entries(&cursor, self.order).map(|names| (cursor, names)));

        let (cursor, names) = match listing {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open directory");
                return emit_error(out, stats, ErrorEntry::new(ErrorKind::DirectoryUnreadable, path));
            }
        };

        stats.record_dir();
        tracing::debug!(path = %cursor.display(), entries = names.len(), "entering directory");

        for name in names {
            self.visit(&cursor.join(name), out, stats)?;
        }
        Ok(())
    }

    /// Hash one readable file and write its record, or a read failure.
    fn emit_file<W: Write>(
        &self,
        path: &Path,
        shown: &Path,
        out: &mut W,
        stats: &mut InventoryStats,
    ) -> Result<(), InventoryError> {
        match self.read_record(path, shown) {
            Ok(record) => {
                stats.record_file(record.size);
                writeln!(out, "{record}")?;
                Ok(())
            }
            Err(e) => emit_error(out, stats, ErrorEntry::read_failed(shown, &e)),
        }
    }

    /// Build the record for a file classified as readable.
    pub fn read_record(&self, path: &Path, shown: &Path) -> io::Result<InventoryRecord> {
        let hash = digest_file(path, self.algorithm, self.chunk_size)?;
        let metadata = fs::metadata(path)?;
        Ok(InventoryRecord::new(hash, metadata.len(), metadata.modified()?, shown))
    }
}

impl Default for InventoryWalker {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

fn emit_error<W: Write>(
    out: &mut W,
    stats: &mut InventoryStats,
    entry: ErrorEntry,
) -> Result<(), InventoryError> {
    tracing::debug!(path = %entry.path.display(), kind = ?entry.kind, "entry skipped");
    stats.record_error(entry.kind);
    writeln!(out, "{entry}")?;
    Ok(())
}

/// Names of the entries of `dir`, sorted byte-wise or in listing order.
fn list_entries(dir: &Path, order: EntryOrder) -> io::Result<Vec<OsString>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    if order == EntryOrder::Sorted {
        names.sort();
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("b.txt"), "bravo").unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("C.txt"), "charlie").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();

        temp
    }

    fn run_flat(walker: &InventoryWalker, dir: &Path) -> (String, InventoryStats) {
        let mut out = Vec::new();
        let stats = walker.walk_flat(dir, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_flat_sorted_case_sensitive() {
        let temp = create_test_tree();
        let (output, stats) = run_flat(&InventoryWalker::new(Algorithm::Md5), temp.path());

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        // Uppercase sorts before lowercase in ordinal order.
        assert!(lines[0].ends_with("\tC.txt"));
        assert!(lines[1].ends_with("\ta.txt"));
        assert!(lines[2].ends_with("\tb.txt"));
        assert!(lines[3].starts_with("* Error 3: 'dir1'"));

        assert_eq!(stats.files, 3);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_flat_record_fields() {
        let temp = create_test_tree();
        let (output, _) = run_flat(&InventoryWalker::new(Algorithm::Crc32), temp.path());

        let line = output.lines().find(|l| l.ends_with("\ta.txt")).unwrap();
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], crate::digest::digest_bytes(b"alpha", Algorithm::Crc32));
        assert_eq!(fields[1], "5");
    }

    #[test]
    fn test_flat_unlistable_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let (output, stats) = run_flat(&InventoryWalker::default(), &missing);

        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("* Error 15: Cannot open directory"));
        assert_eq!(stats.dirs, 0);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_recursive_visits_every_file_once() {
        let temp = create_test_tree();
        let mut out = Vec::new();
        let stats = InventoryWalker::default()
            .walk_recursive(temp.path(), &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(stats.files, 5);
        assert_eq!(stats.dirs, 3);
        assert!(stats.is_clean());
        assert_eq!(output.lines().count(), 5);
        for name in ["a.txt", "b.txt", "C.txt", "file2.txt", "file3.txt"] {
            let hits = output.lines().filter(|l| l.ends_with(&format!("/{name}"))).count();
            assert_eq!(hits, 1, "{name}");
        }
    }

    #[test]
    fn test_recursive_pre_order() {
        let temp = create_test_tree();
        let mut out = Vec::new();
        InventoryWalker::new(Algorithm::Sha1)
            .walk_recursive(temp.path(), &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        let names: Vec<&str> = output
            .lines()
            .map(|l| l.rsplit('/').next().unwrap())
            .collect();

        assert_eq!(names, ["C.txt", "a.txt", "b.txt", "file2.txt", "file3.txt"]);
    }

    #[test]
    fn test_recursive_paths_are_absolute() {
        let temp = create_test_tree();
        let mut out = Vec::new();
        InventoryWalker::default()
            .with_order(EntryOrder::Listing)
            .walk_recursive(temp.path(), &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        for line in output.lines() {
            let path = line.rsplit('\t').next().unwrap();
            assert!(Path::new(path).is_absolute(), "{path}");
        }
    }

    #[test]
    fn test_small_chunk_size_same_digest() {
        let temp = create_test_tree();
        let path = temp.path().join("dir1/file2.txt");
        let default = InventoryWalker::default().read_record(&path, &path).unwrap();
        let tiny = InventoryWalker::default()
            .with_chunk_size(3)
            .read_record(&path, &path)
            .unwrap();
        assert_eq!(default.hash, tiny.hash);
        assert_eq!(default.size, 17);
    }
}
