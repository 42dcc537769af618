//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::GatePassSubmissionService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Use-case behind `POST /api/gatepass`.
    pub submission: Arc<dyn GatePassSubmissionService>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    #[must_use]
    pub fn new(submission: Arc<dyn GatePassSubmissionService>) -> Self {
        Self { submission }
    }
}
