//! Directory resolution for the journal file sink.

use std::fs;
use std::path::{Path, PathBuf};

/// Resolves (and creates if needed) the directory a journal file lives in.
///
/// Implementations must create every missing segment under `base` and return
/// the joined path.
pub trait DirectoryProvider {
    fn ensure_directory(&self, base: &Path, segments: &[&str]) -> std::io::Result<PathBuf>;
}

/// [`DirectoryProvider`] backed by `std::fs::create_dir_all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectories;

impl DirectoryProvider for FsDirectories {
    fn ensure_directory(&self, base: &Path, segments: &[&str]) -> std::io::Result<PathBuf> {
        let path = segments
            .iter()
            .fold(base.to_path_buf(), |path, segment| path.join(segment));
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
