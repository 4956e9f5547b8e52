//! One full check cycle: check, then notify if changed.

use crate::config::{RunConfig, Secrets, SmtpSettings};
use crate::detector::ChangeDetector;
use crate::fetch::{HttpPageSource, PageSource};
use crate::notifier::{Notifier, SmtpNotifier};
use crate::{CheckError, CycleError, NotifyError, NotifyResult};
use pagewatch_files::FingerprintStore;
use pagewatch_types::Fingerprint;

/// Successful end state of a cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleReport {
    Unchanged { fingerprint: Fingerprint },
    Notified { fingerprint: Fingerprint },
}

/// Runs the detector once and, on change, builds a notifier and sends the notification.
///
/// `make_notifier` is only called after a change has been persisted. A failure to build or
/// use the notifier becomes [`CycleError::Notify`], which carries the new fingerprint.
pub fn run_cycle<S, N, F>(
    detector: &ChangeDetector<S>,
    url: &str,
    make_notifier: F,
) -> Result<CycleReport, CycleError>
where
    S: PageSource,
    N: Notifier,
    F: FnOnce() -> NotifyResult<N>,
{
    let span = tracing::info_span!("check", url = %url);
    let _enter = span.enter();

    let outcome = detector.check(url)?;
    let fingerprint = outcome.current().clone();

    if !outcome.is_changed() {
        return Ok(CycleReport::Unchanged { fingerprint });
    }

    match make_notifier().and_then(|notifier| notifier.notify(url, &fingerprint)) {
        Ok(()) => Ok(CycleReport::Notified { fingerprint }),
        Err(source) => Err(CycleError::Notify {
            fingerprint,
            source,
        }),
    }
}

/// Loads secrets from `config`, checks the configured page over HTTP, and notifies by SMTP.
pub fn run_once(config: &RunConfig) -> Result<CycleReport, CycleError> {
    let secrets = Secrets::load_or_empty(config.secrets_file()).map_err(CheckError::from)?;
    let url = secrets.monitor_url().map_err(CheckError::from)?;
    let source = HttpPageSource::new().map_err(CheckError::from)?;
    let detector = ChangeDetector::new(source, FingerprintStore::new(config.state_file()));

    run_cycle(&detector, url.as_str(), || -> NotifyResult<SmtpNotifier> {
        let settings = SmtpSettings::from_secrets(&secrets).map_err(NotifyError::from)?;
        SmtpNotifier::new(settings)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::tests::FakePage;
    use crate::ConfigError;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(String, Fingerprint)>>,
        fail: bool,
    }

    impl Notifier for &RecordingNotifier {
        fn notify(&self, url: &str, fingerprint: &Fingerprint) -> NotifyResult<()> {
            if self.fail {
                return Err(NotifyError::Config(ConfigError::MissingKey("HOST".into())));
            }
            self.sent
                .borrow_mut()
                .push((url.to_string(), fingerprint.clone()));
            Ok(())
        }
    }

    const URL: &str = "https://example.com/";

    fn detector(temp: &TempDir, body: &str) -> ChangeDetector<FakePage> {
        ChangeDetector::new(
            FakePage::serving(body),
            FingerprintStore::new(&temp.path().join("hash.txt")),
        )
    }

    #[test]
    fn test_changed_page_is_notified_once() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, "<p>one</p>");
        let notifier = RecordingNotifier::default();

        let report = run_cycle(&detector, URL, || Ok(&notifier)).unwrap();

        assert!(matches!(report, CycleReport::Notified { .. }));
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, URL);
    }

    #[test]
    fn test_unchanged_page_does_not_build_notifier() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, "<p>one</p>");
        let notifier = RecordingNotifier::default();
        run_cycle(&detector, URL, || Ok(&notifier)).unwrap();

        let report = run_cycle(&detector, URL, || -> NotifyResult<&RecordingNotifier> {
            panic!("notifier must not be built when nothing changed")
        })
        .unwrap();

        assert!(matches!(report, CycleReport::Unchanged { .. }));
        assert_eq!(notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn test_notify_failure_keeps_detection() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, "<p>one</p>");
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };

        let err = run_cycle(&detector, URL, || Ok(&notifier)).unwrap_err();

        match &err {
            CycleError::Notify { fingerprint, .. } => {
                assert_eq!(detector.store().load().unwrap(), fingerprint.as_str());
            }
            other => panic!("expected Notify, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_notifier_construction_failure_is_notify_error() {
        let temp = TempDir::new().unwrap();
        let detector = detector(&temp, "<p>one</p>");

        let err = run_cycle(&detector, URL, || -> NotifyResult<&RecordingNotifier> {
            Err(NotifyError::Config(ConfigError::MissingKey("PORT".into())))
        })
        .unwrap_err();

        assert!(matches!(err, CycleError::Notify { .. }));
    }

    #[test]
    fn test_check_failure_never_notifies() {
        let temp = TempDir::new().unwrap();
        let detector = ChangeDetector::new(
            FakePage::failing(),
            FingerprintStore::new(&temp.path().join("hash.txt")),
        );

        let err = run_cycle(&detector, URL, || -> NotifyResult<&RecordingNotifier> {
            panic!("notifier must not be built when the check failed")
        })
        .unwrap_err();

        assert!(matches!(err, CycleError::Check(CheckError::Transport(_))));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_run_once_without_secrets_is_config_failure() {
        let temp = TempDir::new().unwrap();
        let config = RunConfig::new(
            temp.path().join("missing-secrets.txt"),
            temp.path().join("hash.txt"),
        )
        .unwrap();

        let err = run_once(&config).unwrap_err();

        assert!(matches!(
            err,
            CycleError::Check(CheckError::Config(ConfigError::MissingKey(ref k))) if k == "URL_TO_MONITOR"
        ));
        assert!(!config.state_file().exists());
    }

    #[test]
    fn test_run_once_malformed_secrets_is_config_failure() {
        let temp = TempDir::new().unwrap();
        let secrets = temp.path().join("secrets.txt");
        std::fs::write(&secrets, "URL_TO_MONITOR https://example.com\n").unwrap();
        let config = RunConfig::new(secrets, temp.path().join("hash.txt")).unwrap();

        let err = run_once(&config).unwrap_err();

        assert!(matches!(
            err,
            CycleError::Check(CheckError::Config(ConfigError::MalformedLine { line: 1, .. }))
        ));
    }
}
