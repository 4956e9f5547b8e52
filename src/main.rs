use std::process::ExitCode;

use pagewatch_core::constants::{SECRETS_FILE_ENV, STATE_FILE_ENV};
use pagewatch_core::{CycleError, CycleReport, RunConfig, run_once};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Entry point for one scheduled page check
///
/// Runs exactly one check cycle and exits. Repetition is the scheduler's job.
///
/// # Environment Variables
/// - `RUST_LOG`: log filter (default: "info")
/// - `PAGEWATCH_SECRETS_FILE`: `KEY: value` secrets file (default: "secrets.txt")
/// - `PAGEWATCH_STATE_FILE`: fingerprint state file (default: "previous_hash.txt")
///
/// # Exit codes
/// * `0` - Page checked, changed or not
/// * `1` - Check failed, nothing persisted
/// * `2` - Change detected and persisted, notification failed
fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("failed to initialise logging: {e}");
    }

    tracing::info!("Running website monitor");

    let config = match RunConfig::from_env_values(
        std::env::var(SECRETS_FILE_ENV).ok(),
        std::env::var(STATE_FILE_ENV).ok(),
    ) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error checking website: {}", e);
            return ExitCode::from(1);
        }
    };

    report(run_once(&config))
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

fn default_filter() -> EnvFilter {
    EnvFilter::new("info")
}

fn report(result: Result<CycleReport, CycleError>) -> ExitCode {
    let e = match result {
        Ok(CycleReport::Notified { fingerprint }) => {
            tracing::info!(%fingerprint, "WEBPAGE WAS CHANGED.");
            return ExitCode::SUCCESS;
        }
        Ok(CycleReport::Unchanged { .. }) => {
            tracing::info!("No update.");
            return ExitCode::SUCCESS;
        }
        Err(e) => e,
    };

    match &e {
        CycleError::Check(source) => {
            tracing::error!("Error checking website: {}", source);
        }
        CycleError::Notify {
            fingerprint,
            source,
        } => {
            tracing::error!(%fingerprint, "Change detected but notification failed: {}", source);
        }
    }
    ExitCode::from(e.exit_code())
}
