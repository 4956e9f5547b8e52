//! Error taxonomy for one check cycle.
//!
//! Each stage has its own error type. [`CheckError`] covers everything up to and including
//! the fingerprint comparison, [`NotifyError`] covers the email. [`CycleError`] keeps the two
//! apart so a detected change is never reported as a failed check.

use pagewatch_files::FilesError;
use pagewatch_types::Fingerprint;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read secrets file {path}: {source}", path = path.display())]
    SecretsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed secrets line {line}: expected 'KEY: value', got '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("missing configuration key: {0}")]
    MissingKey(String),
    #[error("invalid port '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("HTML rewriting failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
    #[error("normalised HTML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure anywhere between reading configuration and comparing fingerprints.
///
/// Nothing is persisted when a check fails.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport error: {0}")]
    Transport(#[from] FetchError),
    #[error("parse error: {0}")]
    Parse(#[from] NormalizeError),
    #[error("persistence error: {0}")]
    Persistence(#[from] FilesError),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid mail address '{value}': {source}")]
    Address {
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("failed to check page: {0}")]
    Check(#[from] CheckError),
    #[error("change detected ({fingerprint}) but notification failed: {source}")]
    Notify {
        fingerprint: Fingerprint,
        #[source]
        source: NotifyError,
    },
}

impl CycleError {
    /// Process exit code for this failure: `1` for a failed check, `2` for a lost notification.
    pub fn exit_code(&self) -> u8 {
        match self {
            CycleError::Check(_) => 1,
            CycleError::Notify { .. } => 2,
        }
    }
}
