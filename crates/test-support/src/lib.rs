//! Shared test utilities for the filebuf workspace.
//!
//! [`TestDir`] is a scratch directory removed on drop; the byte generators
//! produce deterministic payloads so failures reproduce exactly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory deleted when dropped.
#[derive(Debug)]
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a fresh, empty directory.
    pub fn new() -> io::Result<Self> {
        tempfile::Builder::new()
            .prefix("filebuf-test-")
            .tempdir()
            .map(|dir| Self { dir })
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of `name` inside the directory.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Returns `true` when `name` exists inside the directory.
    #[must_use]
    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        self.join(name).exists()
    }

    /// Writes `content` to `name`, replacing any existing file.
    pub fn write_file(&self, name: impl AsRef<Path>, content: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Reads the whole of `name`.
    pub fn read_file(&self, name: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        fs::read(self.join(name))
    }
}

/// Returns `len` bytes cycling through `pattern`.
///
/// An empty `pattern` yields an empty vector whatever `len` is.
#[must_use]
pub fn patterned_bytes(pattern: &[u8], len: usize) -> Vec<u8> {
    pattern.iter().copied().cycle().take(len).collect()
}

/// Returns `len` bytes from a xorshift generator seeded with `seed`.
///
/// The output is poorly compressible, which makes it useful for exercising
/// stored blocks and output-buffer exhaustion.
#[must_use]
pub fn pseudo_random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_round_trip() {
        let dir = TestDir::new().unwrap();
        assert!(!dir.exists("a.bin"));
        dir.write_file("a.bin", b"abc").unwrap();
        assert!(dir.exists("a.bin"));
        assert_eq!(dir.read_file("a.bin").unwrap(), b"abc");
    }

    #[test]
    fn test_dir_is_removed_on_drop() {
        let dir = TestDir::new().unwrap();
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn patterned_bytes_cycles() {
        assert_eq!(patterned_bytes(b"ab", 5), b"ababa");
        assert!(patterned_bytes(b"", 0).is_empty());
    }

    #[test]
    fn patterned_bytes_with_empty_pattern_is_empty() {
        assert!(patterned_bytes(b"", 16).is_empty());
    }

    #[test]
    fn pseudo_random_bytes_are_deterministic() {
        assert_eq!(pseudo_random_bytes(7, 64), pseudo_random_bytes(7, 64));
        assert_ne!(pseudo_random_bytes(7, 64), pseudo_random_bytes(8, 64));
    }
}
