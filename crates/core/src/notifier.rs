//! Change notification by email.
//!
//! One fixed-template, plain-text message per detected change, sent over implicit TLS
//! (SMTPS) with LOGIN authentication.

use crate::config::SmtpSettings;
use crate::constants::NOTIFY_SUBJECT;
use crate::{NotifyError, NotifyResult};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Message, SmtpTransport, Transport};
use pagewatch_types::Fingerprint;

/// Delivers a change notification for `url`.
pub trait Notifier {
    fn notify(&self, url: &str, fingerprint: &Fingerprint) -> NotifyResult<()>;
}

/// SMTPS notifier built from [`SmtpSettings`].
pub struct SmtpNotifier {
    settings: SmtpSettings,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    /// Prepares the transport. No connection is opened until [`Notifier::notify`].
    pub fn new(settings: SmtpSettings) -> NotifyResult<Self> {
        let transport = SmtpTransport::relay(settings.host())?
            .port(settings.port())
            .credentials(Credentials::new(
                settings.sender().to_string(),
                settings.password().to_string(),
            ))
            .authentication(vec![Mechanism::Login])
            .build();

        Ok(Self {
            settings,
            transport,
        })
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, url: &str, fingerprint: &Fingerprint) -> NotifyResult<()> {
        let message = compose_message(&self.settings, url, fingerprint)?;
        let response = self.transport.send(&message)?;
        tracing::info!(
            receiver = self.settings.receiver(),
            code = %response.code(),
            "notification sent"
        );
        Ok(())
    }
}

/// Builds the notification email without sending it.
pub fn compose_message(
    settings: &SmtpSettings,
    url: &str,
    fingerprint: &Fingerprint,
) -> NotifyResult<Message> {
    let message = Message::builder()
        .from(mailbox(settings.sender())?)
        .to(mailbox(settings.receiver())?)
        .subject(NOTIFY_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(message_body(url, fingerprint))?;
    Ok(message)
}

fn message_body(url: &str, fingerprint: &Fingerprint) -> String {
    format!(
        "The monitored page has been updated.\n\nURL: {}\nFingerprint: {}\n",
        url, fingerprint
    )
}

fn mailbox(value: &str) -> NotifyResult<Mailbox> {
    value.parse::<Mailbox>().map_err(|source| NotifyError::Address {
        value: value.to_string(),
        source,
    })
}
