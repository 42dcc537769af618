//! Driving port for gate pass submission.
//!
//! Inbound adapters call [`GatePassSubmissionService::submit`] with the raw
//! request fields. The service validates, persists and notifies, and tells
//! the adapter whether the notification went out.

use async_trait::async_trait;

use crate::domain::{Error, GatePassId, GatePassRequest};

/// Outcome category of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePassSubmissionStatus {
    /// Persisted and the notification was sent.
    Success,
    /// Persisted, but the notification failed.
    Warning,
}

/// Result of a submission that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePassSubmissionResponse {
    /// Identifier assigned to the new record.
    pub gatepass_id: GatePassId,
    /// Whether the notification was delivered.
    pub status: GatePassSubmissionStatus,
}

impl GatePassSubmissionResponse {
    /// Response for a record that was saved and announced.
    #[must_use]
    pub const fn notified(gatepass_id: GatePassId) -> Self {
        Self {
            gatepass_id,
            status: GatePassSubmissionStatus::Success,
        }
    }

    /// Response for a record that was saved but not announced.
    #[must_use]
    pub const fn notification_failed(gatepass_id: GatePassId) -> Self {
        Self {
            gatepass_id,
            status: GatePassSubmissionStatus::Warning,
        }
    }
}

/// Driving port for gate pass submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatePassSubmissionService: Send + Sync {
    /// Validate, persist and announce a gate pass.
    ///
    /// A failed notification is not an error: it yields
    /// [`GatePassSubmissionStatus::Warning`].
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `InvalidRequest`: a required field is missing or blank; nothing was
    ///   stored.
    /// - `InternalError`: the record could not be written.
    async fn submit(&self, request: GatePassRequest) -> Result<GatePassSubmissionResponse, Error>;
}
