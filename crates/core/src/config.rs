//! Runtime configuration and secrets.
//!
//! Everything here is resolved once at process startup and then passed into the check
//! cycle. Nothing below the entry point reads environment variables.
//!
//! Two sources are involved:
//! - [`RunConfig`]: file locations, taken from environment values.
//! - [`Secrets`]: the `KEY: value` file holding the watched URL and SMTP credentials.

use crate::constants::{
    DEFAULT_SECRETS_FILE, KEY_HOST, KEY_PASSWORD, KEY_PORT, KEY_RECEIVER, KEY_SENDER,
    KEY_URL_TO_MONITOR, SECRETS_SEPARATOR,
};
use crate::{ConfigError, ConfigResult};
use pagewatch_files::DEFAULT_STATE_FILE;
use pagewatch_types::NonEmptyText;
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File locations resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    secrets_file: PathBuf,
    state_file: PathBuf,
}

impl RunConfig {
    pub fn new(secrets_file: PathBuf, state_file: PathBuf) -> ConfigResult<Self> {
        if secrets_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidInput(
                "secrets file path cannot be empty".into(),
            ));
        }
        if state_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidInput(
                "state file path cannot be empty".into(),
            ));
        }

        Ok(Self {
            secrets_file,
            state_file,
        })
    }

    /// Builds a `RunConfig` from optional environment values.
    ///
    /// `None` falls back to the defaults. A value that is set but blank is rejected, since it
    /// almost always means a broken `.env` line rather than a wish for the default.
    pub fn from_env_values(
        secrets_file: Option<String>,
        state_file: Option<String>,
    ) -> ConfigResult<Self> {
        fn resolve(value: Option<String>, default: &str, name: &str) -> ConfigResult<PathBuf> {
            match value {
                None => Ok(PathBuf::from(default)),
                Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidInput(format!(
                    "{name} is set but empty"
                ))),
                Some(v) => Ok(PathBuf::from(v.trim())),
            }
        }

        Self::new(
            resolve(secrets_file, DEFAULT_SECRETS_FILE, "secrets file")?,
            resolve(state_file, DEFAULT_STATE_FILE, "state file")?,
        )
    }

    pub fn secrets_file(&self) -> &Path {
        &self.secrets_file
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }
}

/// Key/value secrets loaded from a `KEY: value` file.
///
/// `Debug` prints keys only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    entries: BTreeMap<String, String>,
}

impl Secrets {
    /// Parses newline-delimited `KEY: value` pairs.
    ///
    /// Each line is split on the first `": "`. The key is trimmed; the value is kept byte for
    /// byte apart from the line ending, so a password may start or end with spaces. Typed
    /// settings (URL, host, port, addresses) trim when they are resolved. Blank lines and lines
    /// starting with `#` are skipped. A repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedLine`] for a non-blank line without a separator or with
    /// an empty key.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut entries = BTreeMap::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once(SECRETS_SEPARATOR)
                .map(|(k, v)| (k.trim(), v))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| ConfigError::MalformedLine {
                    line: idx + 1,
                    content: line.to_string(),
                })?;

            entries.insert(key.to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    /// Reads and parses the secrets file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Like [`Secrets::load`], but a missing file yields empty secrets.
    ///
    /// The absence is logged; the cycle then fails with [`ConfigError::MissingKey`] as soon
    /// as a key is needed.
    pub fn load_or_empty(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::SecretsRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "secrets file not found at {}, continuing with empty configuration",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, failing if it is absent or blank.
    pub fn require(&self, key: &str) -> ConfigResult<&str> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The URL of the watched page.
    pub fn monitor_url(&self) -> ConfigResult<NonEmptyText> {
        required_text(self, KEY_URL_TO_MONITOR)
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Secrets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// SMTP connection and addressing settings.
///
/// Resolved only once a change has been detected, so a missing mail key never blocks the
/// check itself.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    host: NonEmptyText,
    port: u16,
    sender: NonEmptyText,
    password: String,
    receiver: NonEmptyText,
}

impl SmtpSettings {
    pub fn from_secrets(secrets: &Secrets) -> ConfigResult<Self> {
        let port_text = secrets.require(KEY_PORT)?;
        let port = port_text
            .trim()
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort {
                value: port_text.to_string(),
                source,
            })?;

        Ok(Self {
            host: required_text(secrets, KEY_HOST)?,
            port,
            sender: required_text(secrets, KEY_SENDER)?,
            password: secrets.require(KEY_PASSWORD)?.to_string(),
            receiver: required_text(secrets, KEY_RECEIVER)?,
        })
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn receiver(&self) -> &str {
        self.receiver.as_str()
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("receiver", &self.receiver)
            .finish()
    }
}

fn required_text(secrets: &Secrets, key: &str) -> ConfigResult<NonEmptyText> {
    let value = secrets.require(key)?;
    NonEmptyText::new(value).map_err(|_| ConfigError::MissingKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn full_secrets() -> Secrets {
        Secrets::parse(
            "URL_TO_MONITOR: https://example.com\n\
             PORT: 465\n\
             HOST: smtp.example.com\n\
             SENDER: watcher@example.com\n\
             PASSWORD: hunter2\n\
             RECEIVER: operator@example.com\n",
        )
        .unwrap()
    }

    #[test]
    fn test_parse_simple_pairs() {
        let secrets = Secrets::parse("URL_TO_MONITOR: https://example.com\nPORT: 465\n").unwrap();

        let expected: Secrets = [
            ("URL_TO_MONITOR", "https://example.com"),
            ("PORT", "465"),
        ]
        .into_iter()
        .collect();
        assert_eq!(secrets, expected);
        assert_eq!(secrets.len(), 2);
    }

    #[test]
    fn test_parse_splits_on_first_separator_only() {
        let secrets = Secrets::parse("PASSWORD: a: b: c\n").unwrap();
        assert_eq!(secrets.get("PASSWORD"), Some("a: b: c"));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines_and_crlf() {
        let secrets = Secrets::parse("# mail\r\n\r\nHOST: smtp.example.com\r\n   \n").unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets.get("HOST"), Some("smtp.example.com"));
    }

    #[test]
    fn test_parse_url_colon_is_not_a_separator() {
        let result = Secrets::parse("https://example.com\n");
        assert!(matches!(
            result,
            Err(ConfigError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_line_without_separator() {
        let result = Secrets::parse("HOST: a\nPORT=465\n");
        match result {
            Err(ConfigError::MalformedLine { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "PORT=465");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_keeps_value_whitespace() {
        let secrets = Secrets::parse("PASSWORD:  pass word  \nPORT: 465 \r\n").unwrap();
        assert_eq!(secrets.get("PASSWORD"), Some(" pass word  "));

        let mut entries = full_secrets();
        entries.entries.extend(secrets.entries);
        let smtp = SmtpSettings::from_secrets(&entries).unwrap();
        assert_eq!(smtp.password(), " pass word  ");
        assert_eq!(smtp.port(), 465);
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let secrets = Secrets::parse("PORT: 25\nPORT: 465\n").unwrap();
        assert_eq!(secrets.get("PORT"), Some("465"));
    }

    #[test]
    fn test_require_missing_and_blank_keys() {
        let secrets = Secrets::parse("HOST:  \n").unwrap();
        assert!(matches!(
            secrets.require("HOST"),
            Err(ConfigError::MissingKey(k)) if k == "HOST"
        ));
        assert!(matches!(
            secrets.require("PORT"),
            Err(ConfigError::MissingKey(k)) if k == "PORT"
        ));
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let temp = TempDir::new().unwrap();
        let secrets = Secrets::load_or_empty(&temp.path().join("secrets.txt")).unwrap();

        assert!(secrets.is_empty());
        assert!(matches!(
            secrets.monitor_url(),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("secrets.txt");
        fs::write(&path, "URL_TO_MONITOR: https://example.com/news\n").unwrap();

        let secrets = Secrets::load(&path).unwrap();
        assert_eq!(
            secrets.monitor_url().unwrap().as_str(),
            "https://example.com/news"
        );
    }

    #[test]
    fn test_load_or_empty_still_reports_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("secrets.txt");
        fs::write(&path, "garbage\n").unwrap();

        assert!(matches!(
            Secrets::load_or_empty(&path),
            Err(ConfigError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_debug_does_not_print_values() {
        let rendered = format!("{:?}", full_secrets());
        assert!(rendered.contains("PASSWORD"));
        assert!(!rendered.contains("hunter2"));

        let smtp = SmtpSettings::from_secrets(&full_secrets()).unwrap();
        assert!(!format!("{smtp:?}").contains("hunter2"));
    }

    #[test]
    fn test_smtp_settings_from_secrets() {
        let smtp = SmtpSettings::from_secrets(&full_secrets()).unwrap();

        assert_eq!(smtp.host(), "smtp.example.com");
        assert_eq!(smtp.port(), 465);
        assert_eq!(smtp.sender(), "watcher@example.com");
        assert_eq!(smtp.password(), "hunter2");
        assert_eq!(smtp.receiver(), "operator@example.com");
    }

    #[test]
    fn test_smtp_settings_invalid_port() {
        let secrets: Secrets = [("PORT", "smtps"), ("HOST", "h")].into_iter().collect();
        assert!(matches!(
            SmtpSettings::from_secrets(&secrets),
            Err(ConfigError::InvalidPort { value, .. }) if value == "smtps"
        ));

        let secrets: Secrets = [("PORT", "70000")].into_iter().collect();
        assert!(matches!(
            SmtpSettings::from_secrets(&secrets),
            Err(ConfigError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_smtp_settings_missing_receiver() {
        let secrets: Secrets = [
            ("PORT", "465"),
            ("HOST", "smtp.example.com"),
            ("SENDER", "a@example.com"),
            ("PASSWORD", "pw"),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            SmtpSettings::from_secrets(&secrets),
            Err(ConfigError::MissingKey(k)) if k == "RECEIVER"
        ));
    }

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::from_env_values(None, None).unwrap();
        assert_eq!(config.secrets_file(), Path::new("secrets.txt"));
        assert_eq!(config.state_file(), Path::new("previous_hash.txt"));
    }

    #[test]
    fn test_run_config_overrides_and_blank_rejection() {
        let config = RunConfig::from_env_values(
            Some("/etc/pagewatch/secrets.txt".into()),
            Some(" /var/lib/pagewatch/hash.txt ".into()),
        )
        .unwrap();
        assert_eq!(
            config.state_file(),
            Path::new("/var/lib/pagewatch/hash.txt")
        );

        assert!(matches!(
            RunConfig::from_env_values(Some("   ".into()), None),
            Err(ConfigError::InvalidInput(_))
        ));
    }
}
