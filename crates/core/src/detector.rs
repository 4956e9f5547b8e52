//! Change detection: fetch, normalise, fingerprint, compare, persist if changed.

use crate::fetch::PageSource;
use crate::normalize::normalize;
use crate::CheckError;
use pagewatch_files::{fingerprint, FingerprintStore};
use pagewatch_types::Fingerprint;

/// Result of a successful check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The page fingerprint matches the stored one. Nothing was written.
    Unchanged { current: Fingerprint },
    /// The page fingerprint differs and has been saved.
    ///
    /// `previous` is `None` on a first run or when the state file held something that is not
    /// a fingerprint.
    Changed {
        previous: Option<Fingerprint>,
        current: Fingerprint,
    },
}

impl CheckOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, CheckOutcome::Changed { .. })
    }

    pub fn current(&self) -> &Fingerprint {
        match self {
            CheckOutcome::Unchanged { current } | CheckOutcome::Changed { current, .. } => current,
        }
    }
}

/// Compares the live page against the last stored fingerprint.
#[derive(Debug)]
pub struct ChangeDetector<S> {
    source: S,
    store: FingerprintStore,
}

impl<S: PageSource> ChangeDetector<S> {
    pub fn new(source: S, store: FingerprintStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    /// Runs one check against `url`.
    ///
    /// The store is only written after every fallible read step has succeeded, so a failed
    /// check leaves the previous fingerprint in place.
    ///
    /// # Errors
    ///
    /// Returns `CheckError` if the fetch, normalisation, or state file access fails.
    pub fn check(&self, url: &str) -> Result<CheckOutcome, CheckError> {
        let raw = self.source.fetch(url)?;
        let normalized = normalize(&raw)?;
        let current = fingerprint(&normalized);
        let stored = self.store.load()?;

        if stored == current.as_str() {
            tracing::debug!(%current, "fingerprint unchanged");
            return Ok(CheckOutcome::Unchanged { current });
        }

        let previous = Fingerprint::parse(&stored).ok();
        self.store.save(&current)?;
        tracing::debug!(
            previous = previous.as_ref().map(Fingerprint::as_str).unwrap_or("<none>"),
            %current,
            "fingerprint changed"
        );

        Ok(CheckOutcome::Changed { previous, current })
    }
}
