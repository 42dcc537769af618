//! Gate pass submission orchestration.
//!
//! Implements [`GatePassSubmissionService`] on top of the repository and
//! notifier ports: validate, assign the next identifier, append and save,
//! then attempt the notification. The notification result only changes the
//! reported status; the record stays stored either way.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::ports::{
    GatePassNotifier, GatePassRepository, GatePassSubmissionResponse, GatePassSubmissionService,
};
use crate::domain::{Error, GatePassDraft, GatePassRecord, GatePassRequest};

/// Concrete implementation of [`GatePassSubmissionService`].
///
/// The load, append and save steps run under a single lock owned by the
/// service, so concurrent requests handled by one process never overwrite
/// each other's records. Separate processes sharing the file are not
/// coordinated.
pub struct GatePassSubmissionServiceImpl<R: ?Sized, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl<R: ?Sized, N: ?Sized> GatePassSubmissionServiceImpl<R, N> {
    /// Create a service persisting through `repository` and announcing
    /// through `notifier`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use gatepass::domain::GatePassSubmissionServiceImpl;
    /// # use gatepass::domain::ports::{DisabledGatePassNotifier, InMemoryGatePassRepository};
    /// # use mockable::DefaultClock;
    /// let service = GatePassSubmissionServiceImpl::new(
    ///     Arc::new(InMemoryGatePassRepository::default()),
    ///     Arc::new(DisabledGatePassNotifier::new("relay not configured")),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            notifier,
            clock,
            write_lock: Mutex::new(()),
        }
    }
}

impl<R, N> GatePassSubmissionServiceImpl<R, N>
where
    R: GatePassRepository + ?Sized,
    N: GatePassNotifier + ?Sized,
{
    async fn append(&self, draft: GatePassDraft) -> Result<GatePassRecord, Error> {
        let _guard = self.write_lock.lock().await;

        let mut stored = self.repository.load().await;
        let id = stored.next_id();
        let record = draft.into_record(id, self.clock.utc().to_rfc3339());
        stored.records.push(record.clone());

        self.repository.save(&stored).await.map_err(|err| {
            error!(gatepass_id = %id, error = %err, "failed to persist gate pass");
            Error::internal(format!("failed to persist gate pass #{id}: {err}"))
        })?;
        Ok(record)
    }
}

#[async_trait]
impl<R, N> GatePassSubmissionService for GatePassSubmissionServiceImpl<R, N>
where
    R: GatePassRepository + ?Sized,
    N: GatePassNotifier + ?Sized,
{
    async fn submit(&self, request: GatePassRequest) -> Result<GatePassSubmissionResponse, Error> {
        let draft = request.validate().map_err(|err| {
            let fields: Vec<_> = err.fields().iter().map(|field| field.as_str()).collect();
            warn!(?fields, reason = %err, "rejected gate pass submission");
            Error::invalid_request(err.to_string())
        })?;

        let record = self.append(draft).await?;
        info!(gatepass_id = %record.id, "gate pass stored");

        match self.notifier.send(&record.user_email, &record).await {
            Ok(()) => {
                info!(
                    gatepass_id = %record.id,
                    recipient = %record.user_email,
                    "gate pass notification sent"
                );
                Ok(GatePassSubmissionResponse::notified(record.id))
            }
            Err(err) => {
                warn!(
                    gatepass_id = %record.id,
                    recipient = %record.user_email,
                    error = %err,
                    "gate pass notification failed"
                );
                Ok(GatePassSubmissionResponse::notification_failed(record.id))
            }
        }
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
