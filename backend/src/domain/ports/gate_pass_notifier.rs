//! Port for announcing new gate passes to staff.
//!
//! Delivery is best-effort. Every failure mode collapses into
//! [`NotificationError`] so callers only need to know that the message did
//! not go out, and log the diagnostic.

use async_trait::async_trait;

use crate::domain::GatePassRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum NotificationError {
        /// A sender, recipient or CC address could not be parsed.
        Address { address: String, message: String } =>
            "invalid email address {address}: {message}",
        /// The message could not be assembled.
        Message { message: String } => "failed to build email: {message}",
        /// Connecting, authenticating or submitting to the relay failed.
        Transport { message: String } => "email delivery failed: {message}",
        /// No relay is configured, so nothing can be delivered.
        Disabled { reason: String } => "email delivery disabled: {reason}",
    }
}

/// Port for sending the "new gate pass" email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatePassNotifier: Send + Sync {
    /// Send a notification about `record` to `recipient`, copying the
    /// configured CC list.
    async fn send(&self, recipient: &str, record: &GatePassRecord)
    -> Result<(), NotificationError>;
}

/// Notifier used when no relay is configured.
///
/// Every send fails, so callers report the submission as saved but not
/// announced.
#[derive(Debug, Clone)]
pub struct DisabledGatePassNotifier {
    reason: String,
}

impl DisabledGatePassNotifier {
    /// Create a notifier whose failures carry `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl GatePassNotifier for DisabledGatePassNotifier {
    async fn send(
        &self,
        _recipient: &str,
        _record: &GatePassRecord,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::disabled(self.reason.clone()))
    }
}

/// Notifier that reports success without sending anything.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGatePassNotifier;

#[cfg(test)]
#[async_trait]
impl GatePassNotifier for FixtureGatePassNotifier {
    async fn send(
        &self,
        _recipient: &str,
        _record: &GatePassRecord,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GatePassId, GatePassStatus};
    use rstest::rstest;

    fn record() -> GatePassRecord {
        GatePassRecord {
            id: GatePassId::FIRST,
            name: "A".into(),
            department: "X".into(),
            user_email: "a@b.com".into(),
            reason: "R".into(),
            timestamp: "2025-01-01".into(),
            status: GatePassStatus::Pending,
        }
    }

    #[tokio::test]
    async fn disabled_notifier_always_fails_with_reason() {
        let err = DisabledGatePassNotifier::new("SMTP credentials not configured")
            .send("a@b.com", &record())
            .await
            .expect_err("disabled notifier never delivers");
        assert_eq!(
            err,
            NotificationError::Disabled {
                reason: "SMTP credentials not configured".to_owned()
            }
        );
        assert_eq!(
            err.to_string(),
            "email delivery disabled: SMTP credentials not configured"
        );
    }

    #[rstest]
    fn address_error_names_offending_address() {
        let error = NotificationError::address("not-an-address", "missing domain");
        assert_eq!(
            error.to_string(),
            "invalid email address not-an-address: missing domain"
        );
    }
}
