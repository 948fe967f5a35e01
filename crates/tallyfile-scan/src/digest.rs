//! Streaming digest computation.
//!
//! Files are read sequentially in fixed-size chunks so memory use stays
//! bounded regardless of file size. Buffers are hashed in a single pass.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;

use tallyfile_core::Algorithm;

/// Read size used when streaming files.
pub const CHUNK_SIZE: usize = 8192;

/// Input to a digest computation.
#[derive(Debug, Clone, Copy)]
pub enum DigestSource<'a> {
    /// In-memory bytes, hashed in one pass.
    Text(&'a [u8]),
    /// File streamed from disk.
    File(&'a Path),
}

/// Compute the hex digest of `source` with `algorithm`.
///
/// The file handle, if any, is dropped before returning on every path.
pub fn compute_digest(source: DigestSource<'_>, algorithm: Algorithm) -> io::Result<String> {
    match source {
        DigestSource::Text(bytes) => Ok(digest_bytes(bytes, algorithm)),
        DigestSource::File(path) => digest_file(path, algorithm, CHUNK_SIZE),
    }
}

/// Stream a file through `algorithm` in `chunk_size` reads.
pub fn digest_file(path: &Path, algorithm: Algorithm, chunk_size: usize) -> io::Result<String> {
    let file = File::open(path)?;
    digest_reader(file, algorithm, chunk_size)
}

/// Hash a buffer in a single pass.
pub fn digest_bytes(bytes: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Sha256 => hex_lower(&Sha256::digest(bytes)),
        Algorithm::Sha1 => hex_lower(&Sha1::digest(bytes)),
        Algorithm::Md5 => hex_lower(&Md5::digest(bytes)),
        Algorithm::Crc32 => {
            let mut crc = Crc32::new();
            crc.update(bytes);
            crc.to_hex()
        }
    }
}

/// Hash everything `reader` yields, reading `chunk_size` bytes at a time.
pub fn digest_reader<R: Read>(reader: R, algorithm: Algorithm, chunk_size: usize) -> io::Result<String> {
    match algorithm {
        Algorithm::Sha256 => hash_stream::<Sha256, _>(reader, chunk_size),
        Algorithm::Sha1 => hash_stream::<Sha1, _>(reader, chunk_size),
        Algorithm::Md5 => hash_stream::<Md5, _>(reader, chunk_size),
        Algorithm::Crc32 => {
            let mut crc = Crc32::new();
            for_each_chunk(reader, chunk_size, |chunk| crc.update(chunk))?;
            Ok(crc.to_hex())
        }
    }
}

fn hash_stream<D: Digest, R: Read>(reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = D::new();
    for_each_chunk(reader, chunk_size, |chunk| hasher.update(chunk))?;
    Ok(hex_lower(&hasher.finalize()))
}

fn for_each_chunk<R: Read>(
    mut reader: R,
    chunk_size: usize,
    mut f: impl FnMut(&[u8]),
) -> io::Result<()> {
    let mut buffer = vec![0u8; chunk_size.max(1)];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        f(&buffer[..bytes_read]);
    }
    Ok(())
}

fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// IEEE CRC-32 lookup table, reflected polynomial 0xEDB88320.
const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = make_crc_table();

/// Running CRC-32 checksum, compatible with zlib's `crc32`.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;
        for &byte in data {
            let idx = ((crc ^ u32::from(byte)) & 0xFF) as usize;
            crc = CRC_TABLE[idx] ^ (crc >> 8);
        }
        self.state = crc;
    }

    /// Checksum of everything fed so far.
    pub fn value(&self) -> u32 {
        !self.state
    }

    /// Eight uppercase hex digits, no prefix.
    pub fn to_hex(&self) -> String {
        format!("{:08X}", self.value())
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_sha256_known_values() {
        assert_eq!(
            digest_bytes(b"", Algorithm::Sha256),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_bytes(b"abc", Algorithm::Sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha1_known_values() {
        assert_eq!(
            digest_bytes(b"", Algorithm::Sha1),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            digest_bytes(b"abc", Algorithm::Sha1),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_md5_known_values() {
        assert_eq!(digest_bytes(b"", Algorithm::Md5), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest_bytes(b"abc", Algorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_crc32_known_values() {
        assert_eq!(digest_bytes(b"", Algorithm::Crc32), "00000000");
        assert_eq!(digest_bytes(b"123456789", Algorithm::Crc32), "CBF43926");
        assert_eq!(digest_bytes(b"hello", Algorithm::Crc32), "3610A686");
    }

    #[test]
    fn test_crc32_running_state() {
        let mut crc = Crc32::new();
        crc.update(b"1234");
        crc.update(b"56789");
        assert_eq!(crc.value(), 0xCBF4_3926);
    }

    #[test]
    fn test_chunking_does_not_change_digest() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        for algorithm in [Algorithm::Sha256, Algorithm::Crc32, Algorithm::Md5, Algorithm::Sha1] {
            let whole = digest_bytes(&data, algorithm);
            for chunk_size in [1, 7, 8192, 65536] {
                let streamed = digest_reader(Cursor::new(&data), algorithm, chunk_size).unwrap();
                assert_eq!(streamed, whole, "{algorithm} with chunk {chunk_size}");
            }
        }
    }

    #[test]
    fn test_hex_lengths_and_case() {
        for algorithm in [Algorithm::Sha256, Algorithm::Crc32, Algorithm::Md5, Algorithm::Sha1] {
            let hex = digest_bytes(b"inventory", algorithm);
            assert_eq!(hex.len(), algorithm.hex_len());
            if algorithm.is_uppercase() {
                assert!(hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
            } else {
                assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            }
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = compute_digest(
            DigestSource::File(Path::new("/nonexistent/tallyfile/input")),
            Algorithm::Sha256,
        );
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_error_propagates() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device went away"))
            }
        }
        assert!(digest_reader(FailingReader, Algorithm::Md5, CHUNK_SIZE).is_err());
    }
}
