//! Canonical fingerprint representation.
//!
//! A fingerprint is the SHA-224 digest of a normalised page, written as **56 lowercase
//! hexadecimal characters**. This is exactly what the state file holds.
//!
//! Construction is limited to two paths:
//! - [`Fingerprint::from_digest`] for freshly computed digests.
//! - [`Fingerprint::parse`] for strings read from outside (state file, CLI input).
//!
//! Non-canonical values (uppercase, wrong length, non-hex) are rejected rather than
//! normalised, so two equal fingerprints always have equal string forms.

use std::{fmt, str::FromStr};

/// Number of raw digest bytes in a SHA-224 output.
pub const FINGERPRINT_BYTES: usize = 28;

/// Length of the canonical hex form.
pub const FINGERPRINT_HEX_LEN: usize = FINGERPRINT_BYTES * 2;

/// Error type for fingerprint parsing.
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("Invalid fingerprint: {0}")]
    InvalidInput(String),
}

/// A SHA-224 fingerprint in canonical lowercase hex form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Builds a fingerprint from raw digest bytes.
    pub fn from_digest(bytes: &[u8; FINGERPRINT_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Validates a string that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::InvalidInput`] if `input` is not 56 lowercase hex characters.
    pub fn parse(input: &str) -> Result<Self, FingerprintError> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(FingerprintError::InvalidInput(format!(
            "fingerprint must be {} lowercase hex characters, got: '{}'",
            FINGERPRINT_HEX_LEN, input
        )))
    }

    /// Returns true if `input` is exactly 56 characters of `0-9` / `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == FINGERPRINT_HEX_LEN
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Fingerprint::parse(&s).map_err(serde::de::Error::custom)
    }
}
