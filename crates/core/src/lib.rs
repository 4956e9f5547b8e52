//! # pagewatch core
//!
//! Change detection for a single web page.
//!
//! One check cycle is:
//! 1. fetch the page ([`fetch`]),
//! 2. strip volatile markup ([`normalize`]),
//! 3. fingerprint the result and compare it with the stored one ([`detector`]),
//! 4. persist and email when it differs ([`notifier`]).
//!
//! [`cycle::run_once`] wires the production collaborators together. Scheduling is left to
//! whatever runs the binary (cron, a systemd timer); one call is one check.
//!
//! **No process concerns**: logging setup, environment reading and exit codes belong to the
//! binaries.

pub mod config;
pub mod constants;
pub mod cycle;
pub mod detector;
mod error;
pub mod fetch;
pub mod normalize;
pub mod notifier;

pub use config::{RunConfig, Secrets, SmtpSettings};
pub use cycle::{run_cycle, run_once, CycleReport};
pub use detector::{ChangeDetector, CheckOutcome};
pub use error::{
    CheckError, ConfigError, ConfigResult, CycleError, FetchError, FetchResult, NormalizeError,
    NotifyError, NotifyResult,
};
pub use fetch::{HttpPageSource, PageSource};
pub use normalize::normalize;
pub use notifier::{Notifier, SmtpNotifier};
