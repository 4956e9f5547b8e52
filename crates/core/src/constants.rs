//! Constants used throughout the pagewatch core crate.
//!
//! Secrets keys, environment variable names and fixed protocol values live here so the
//! runner, the CLI and the tests agree on them.

/// Secrets key holding the URL of the page to watch.
pub const KEY_URL_TO_MONITOR: &str = "URL_TO_MONITOR";

/// Secrets key holding the SMTP server host.
pub const KEY_HOST: &str = "HOST";

/// Secrets key holding the SMTP server port.
pub const KEY_PORT: &str = "PORT";

/// Secrets key holding the sender address (also the SMTP login).
pub const KEY_SENDER: &str = "SENDER";

/// Secrets key holding the SMTP password.
pub const KEY_PASSWORD: &str = "PASSWORD";

/// Secrets key holding the notification recipient.
pub const KEY_RECEIVER: &str = "RECEIVER";

/// Environment variable overriding the secrets file location.
pub const SECRETS_FILE_ENV: &str = "PAGEWATCH_SECRETS_FILE";

/// Environment variable overriding the state file location.
pub const STATE_FILE_ENV: &str = "PAGEWATCH_STATE_FILE";

/// Default secrets file, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.txt";

/// Separator between key and value in the secrets file.
pub const SECRETS_SEPARATOR: &str = ": ";

/// User agent sent with every page fetch.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Subject line of the change notification.
pub const NOTIFY_SUBJECT: &str = "UPDATE DETECTED!!!";
