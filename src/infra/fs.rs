//! Filesystem access for site sources and rendered output.

use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors during file system operations on site pages.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parent directory does not exist: {path}")]
    ParentNotFound { path: PathBuf },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Primitive file operations used by the exporter.
///
/// The export engine only talks to the disk through this trait, so tests can
/// observe or fail individual reads and writes.
pub trait SiteFs {
    /// Returns true if a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the full contents of `path`.
    fn read_all(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Writes `bytes` to `path`, replacing any existing file.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> Result<(), FsError>;

    /// Creates `path` and any missing parent directories.
    fn ensure_dir(&self, path: &Path) -> Result<(), FsError>;
}

/// [`SiteFs`] backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl SiteFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        std::fs::read(path).map_err(|e| FsError::from_io(path, e))
    }

    /// Writes atomically through a temporary file in the destination directory.
    ///
    /// # Errors
    ///
    /// Returns `FsError::ParentNotFound` if the parent directory doesn't exist.
    /// Returns `FsError::AtomicWrite` if the atomic rename fails.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> Result<(), FsError> {
        let parent = match path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => return Err(FsError::ParentNotFound { path: path.into() }),
        };

        if !parent.is_dir() {
            return Err(FsError::ParentNotFound {
                path: parent.into(),
            });
        }

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

        temp.write_all(bytes).map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

        temp.persist(path).map_err(|e| FsError::AtomicWrite {
            path: path.into(),
            source: e.error,
        })?;

        Ok(())
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), FsError> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(path).map_err(|e| FsError::from_io(path, e))
    }
}

/// Decodes raw source bytes into markdown text.
///
/// A UTF-8 byte order mark is stripped. UTF-16 content and invalid UTF-8 are
/// rejected rather than converted lossily.
///
/// # Errors
///
/// Returns `FsError::InvalidEncoding` if the bytes are not UTF-8.
pub fn decode_source(bytes: Vec<u8>, path: &Path) -> Result<String, FsError> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 LE detected (byte order mark FF FE); convert to UTF-8".into(),
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 BE detected (byte order mark FE FF); convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

/// Reads a source document and decodes it as text.
pub fn read_source<F: SiteFs + ?Sized>(fs: &F, path: &Path) -> Result<String, FsError> {
    let bytes = fs.read_all(path)?;
    decode_source(bytes, path)
}
