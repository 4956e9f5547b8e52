use clap::{Parser, Subcommand};
use pagewatch_core::constants::{SECRETS_FILE_ENV, STATE_FILE_ENV};
use pagewatch_core::{normalize, run_once, CycleError, CycleReport, RunConfig};
use pagewatch_files::{fingerprint, FingerprintStore};
use pagewatch_types::Fingerprint;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pagewatch")]
#[command(about = "Single-page change monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one check cycle (fetch, compare, notify)
    Check,
    /// Print the normalised form of a local HTML file
    Normalize {
        /// HTML file to normalise
        file: PathBuf,
    },
    /// Print the fingerprint of a local HTML file
    Fingerprint {
        /// HTML file to fingerprint
        file: PathBuf,
    },
    /// Show the stored fingerprint
    Status {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Clear the stored fingerprint so the next check reports a change
    Reset,
}

#[derive(serde::Serialize)]
struct StatusReport<'a> {
    state_file: &'a Path,
    fingerprint: Option<Fingerprint>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check) => match run_once(&run_config()?) {
            Ok(CycleReport::Notified { fingerprint }) => {
                println!("Page changed, notification sent. Fingerprint: {}", fingerprint)
            }
            Ok(CycleReport::Unchanged { fingerprint }) => {
                println!("No update. Fingerprint: {}", fingerprint)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                if let CycleError::Notify { fingerprint, .. } = &e {
                    eprintln!("New fingerprint was stored: {}", fingerprint);
                }
                std::process::exit(i32::from(e.exit_code()));
            }
        },
        Some(Commands::Normalize { file }) => {
            let raw = std::fs::read_to_string(&file)?;
            print!("{}", normalize(&raw)?);
        }
        Some(Commands::Fingerprint { file }) => {
            let raw = std::fs::read_to_string(&file)?;
            println!("{}", fingerprint(&normalize(&raw)?));
        }
        Some(Commands::Status { json }) => {
            let config = run_config()?;
            let store = FingerprintStore::new(config.state_file());
            let stored = store.peek()?;

            if json {
                let status = StatusReport {
                    state_file: store.path(),
                    fingerprint: stored,
                };
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                match stored {
                    Some(fp) => println!("Stored fingerprint: {}", fp),
                    None => println!("No fingerprint stored."),
                }
            }
        }
        Some(Commands::Reset) => {
            let config = run_config()?;
            FingerprintStore::new(config.state_file()).clear()?;
            println!("Cleared {}", config.state_file().display());
        }
        None => {
            println!("Use 'pagewatch --help' for commands");
        }
    }

    Ok(())
}

fn run_config() -> Result<RunConfig, Box<dyn std::error::Error>> {
    Ok(RunConfig::from_env_values(
        std::env::var(SECRETS_FILE_ENV).ok(),
        std::env::var(STATE_FILE_ENV).ok(),
    )?)
}
