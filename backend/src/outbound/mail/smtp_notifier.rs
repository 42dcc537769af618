//! SMTP adapter for the gate pass notifier port.
//!
//! Connects with implicit TLS (SMTPS) and authenticates with the configured
//! credentials on every send. The transport is built once at startup;
//! building it does not open a connection.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::template;
use crate::domain::GatePassRecord;
use crate::domain::ports::{GatePassNotifier, NotificationError};

/// Connection and addressing settings for [`SmtpGatePassNotifier`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Relay host name, e.g. `smtp.gmail.com`.
    pub host: String,
    /// Relay port; `465` for implicit TLS.
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login secret.
    pub password: String,
    /// `From` address.
    pub sender: String,
    /// Addresses copied on every notification.
    pub cc: Vec<String>,
    /// Upper bound for each network operation.
    pub timeout: Duration,
}

/// Notifier submitting gate pass emails to an SMTP relay.
pub struct SmtpGatePassNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    cc: Vec<Mailbox>,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse()
        .map_err(|err: lettre::address::AddressError| {
            NotificationError::address(address, err.to_string())
        })
}

impl SmtpGatePassNotifier {
    /// Build the notifier from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Address`] when the sender or a CC address
    /// does not parse, and [`NotificationError::Transport`] when the relay
    /// host is rejected.
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let SmtpSettings {
            host,
            port,
            username,
            password,
            sender,
            cc,
            timeout,
        } = settings;

        let sender = parse_mailbox(&sender)?;
        let cc = cc
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>, _>>()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .map_err(|err| NotificationError::transport(err.to_string()))?
            .port(port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            cc,
        })
    }

    /// Assemble the message for `record` without sending it.
    ///
    /// The envelope lists `recipient` followed by the CC addresses.
    fn build_message(
        &self,
        recipient: &str,
        record: &GatePassRecord,
    ) -> Result<Message, NotificationError> {
        let to = parse_mailbox(recipient)?;
        let builder = self
            .cc
            .iter()
            .cloned()
            .fold(Message::builder().from(self.sender.clone()).to(to), |builder, cc| {
                builder.cc(cc)
            });

        builder
            .subject(template::subject(record))
            .multipart(MultiPart::alternative_plain_html(
                template::plain_body(record),
                template::html_body(record),
            ))
            .map_err(|err| NotificationError::message(err.to_string()))
    }
}

#[async_trait]
impl GatePassNotifier for SmtpGatePassNotifier {
    async fn send(
        &self,
        recipient: &str,
        record: &GatePassRecord,
    ) -> Result<(), NotificationError> {
        let message = self.build_message(recipient, record)?;
        self.transport
            .send(message)
            .await
            .map(drop)
            .map_err(|err| NotificationError::transport(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GatePassId, GatePassStatus};
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            port: 465,
            username: "gate@example.com".into(),
            password: "secret".into(),
            sender: "gate@example.com".into(),
            cc: vec!["manager@example.com".into(), "security@example.com".into()],
            timeout: Duration::from_secs(10),
        }
    }

    #[fixture]
    fn record() -> GatePassRecord {
        GatePassRecord {
            id: GatePassId::new(7),
            name: "A".into(),
            department: "X".into(),
            user_email: "a@b.com".into(),
            reason: "R".into(),
            timestamp: "2025-06-15T09:30:00+00:00".into(),
            status: GatePassStatus::Pending,
        }
    }

    #[rstest]
    fn envelope_targets_recipient_and_cc_list(settings: SmtpSettings, record: GatePassRecord) {
        let notifier = SmtpGatePassNotifier::new(settings).expect("valid settings");
        let message = notifier
            .build_message("a@b.com", &record)
            .expect("message builds");

        let envelope = message.envelope();
        let to: Vec<_> = envelope.to().iter().map(ToString::to_string).collect();
        assert_eq!(
            to,
            vec!["a@b.com", "manager@example.com", "security@example.com"]
        );
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("gate@example.com")
        );
    }

    #[rstest]
    fn message_carries_subject_with_id(settings: SmtpSettings, record: GatePassRecord) {
        let notifier = SmtpGatePassNotifier::new(settings).expect("valid settings");
        let message = notifier
            .build_message("a@b.com", &record)
            .expect("message builds");

        let formatted = String::from_utf8(message.formatted()).expect("ascii message");
        assert!(formatted.contains("Subject: Gate Pass Request #7 - A"));
    }

    #[rstest]
    fn malformed_recipient_is_an_address_error(settings: SmtpSettings, record: GatePassRecord) {
        let notifier = SmtpGatePassNotifier::new(settings).expect("valid settings");
        let err = notifier
            .build_message("not an address", &record)
            .expect_err("invalid recipient");
        assert!(matches!(err, NotificationError::Address { .. }));
    }

    #[rstest]
    fn malformed_cc_fails_construction(mut settings: SmtpSettings) {
        settings.cc.push("broken@".into());
        let err = SmtpGatePassNotifier::new(settings)
            .err()
            .expect("invalid CC rejected");
        assert!(matches!(
            err,
            NotificationError::Address { ref address, .. } if address == "broken@"
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_relay_reports_transport_error(
        mut settings: SmtpSettings,
        record: GatePassRecord,
    ) {
        settings.host = "localhost".into();
        settings.port = 1;
        settings.timeout = Duration::from_secs(2);
        let notifier = SmtpGatePassNotifier::new(settings).expect("valid settings");

        let err = notifier
            .send("a@b.com", &record)
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, NotificationError::Transport { .. }));
    }
}
