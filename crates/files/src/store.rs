//! Single-slot fingerprint state file.
//!
//! The store holds the last observed fingerprint and nothing else. Reads are verbatim:
//! whatever the file contains is returned as-is and compared against a fresh digest by the
//! caller, so a hand-edited or truncated file simply registers as "changed" on the next check.
//!
//! Absence is not an error. [`FingerprintStore::load`] opens the file with create semantics,
//! leaving an empty file behind, which removes the window between an existence check and
//! the open.

use crate::{FilesError, FilesResult};
use pagewatch_types::Fingerprint;
use std::fs::{self, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

/// File-backed slot for the last observed fingerprint.
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    /// Creates a store bound to `path`. No I/O happens until `load` or `save`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored fingerprint text, or an empty string if nothing is stored.
    ///
    /// Creates the file (and missing parent directories) when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path is empty or names a directory
    /// - the file cannot be created or read (permissions, invalid UTF-8)
    pub fn load(&self) -> FilesResult<String> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_context(e, "open"))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| self.io_context(e, "read"))?;

        tracing::debug!(
            path = %self.path.display(),
            empty = contents.is_empty(),
            "loaded stored fingerprint"
        );
        Ok(contents)
    }

    /// Reads the stored fingerprint without touching the filesystem otherwise.
    ///
    /// A missing file yields `None` and is not created, nor are its parent directories.
    /// Empty or non-canonical contents also yield `None`.
    pub fn peek(&self) -> FilesResult<Option<Fingerprint>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Fingerprint::parse(&contents).ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_context(e, "read")),
        }
    }

    /// Replaces the whole slot with `fingerprint`.
    pub fn save(&self, fingerprint: &Fingerprint) -> FilesResult<()> {
        self.write_contents(fingerprint.as_str())?;
        tracing::debug!(path = %self.path.display(), %fingerprint, "saved fingerprint");
        Ok(())
    }

    /// Empties the slot so the next check reports a change.
    pub fn clear(&self) -> FilesResult<()> {
        self.write_contents("")
    }

    fn write_contents(&self, contents: &str) -> FilesResult<()> {
        self.ensure_parent_dir()?;
        fs::write(&self.path, contents).map_err(|e| self.io_context(e, "write"))
    }

    fn ensure_parent_dir(&self) -> FilesResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(FilesError::InvalidPath("path is empty".into()));
        }

        if self.path.is_dir() {
            return Err(FilesError::InvalidPath(format!(
                "Path is a directory: {}",
                self.path.display()
            )));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    FilesError::Io(std::io::Error::new(
                        e.kind(),
                        format!(
                            "Failed to create state directory {}: {}",
                            parent.display(),
                            e
                        ),
                    ))
                })?;
            }
        }

        Ok(())
    }

    fn io_context(&self, e: std::io::Error, action: &str) -> FilesError {
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!(
                "Failed to {} state file {}: {}",
                action,
                self.path.display(),
                e
            ),
        ))
    }
}
