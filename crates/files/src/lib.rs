//! pagewatch fingerprint storage
//!
//! This crate owns the two pieces of the change check that touch bytes directly:
//!
//! - [`fingerprint`]: SHA-224 over the UTF-8 bytes of a normalised page.
//! - [`FingerprintStore`]: the single-slot state file holding the last observed fingerprint.
//!
//! ## State file layout
//!
//! ```text
//! previous_hash.txt    # exactly one 56-char lowercase hex digest, no newline
//! ```
//!
//! There is no history. A missing file behaves like an empty one and is created on first
//! load so a later save always has a target.
//!
//! ## Example Usage
//!
//! ```no_run
//! use pagewatch_files::{fingerprint, FingerprintStore};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FingerprintStore::new(Path::new("previous_hash.txt"));
//! let current = fingerprint("<html><body>A</body></html>");
//!
//! if store.load()? != current.as_str() {
//!     store.save(&current)?;
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod digest;
mod store;

pub use constants::DEFAULT_STATE_FILE;
pub use digest::fingerprint;
pub use store::FingerprintStore;

/// Errors that can occur during state file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The state file path is unusable (empty, or names a directory)
    #[error("Invalid state file path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = Result<T, FilesError>;
