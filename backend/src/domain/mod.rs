//! Domain primitives, services and ports.
//!
//! Purpose: define the gate pass entity, its validation and retention rules,
//! and the submission service. Keep this layer free of HTTP, SMTP and
//! filesystem details; adapters reach it only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - GatePassRecord and friends: the persisted entity and its identifier.
//! - GatePassRequest: unvalidated input; `validate` yields a draft.
//! - RetentionPolicy: age-based purge applied at startup.
//! - GatePassSubmissionServiceImpl: validate, persist, notify.

pub mod error;
pub mod gate_pass;
pub mod ports;
pub mod retention;
mod submission_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gate_pass::{
    GatePassDraft, GatePassField, GatePassId, GatePassRecord, GatePassRequest, GatePassStatus,
    GatePassValidationError, next_gate_pass_id,
};
pub use self::retention::{DEFAULT_RETENTION_DAYS, RetentionPolicy, run_retention_sweep};
pub use self::submission_service::GatePassSubmissionServiceImpl;
