//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod gate_pass_notifier;
mod gate_pass_repository;
mod gate_pass_submission;

#[cfg(test)]
pub use gate_pass_notifier::{FixtureGatePassNotifier, MockGatePassNotifier};
pub use gate_pass_notifier::{DisabledGatePassNotifier, GatePassNotifier, NotificationError};
#[cfg(test)]
pub use gate_pass_repository::MockGatePassRepository;
pub use gate_pass_repository::{
    GatePassRepository, GatePassRepositoryError, InMemoryGatePassRepository, StoredGatePasses,
};
#[cfg(test)]
pub use gate_pass_submission::MockGatePassSubmissionService;
pub use gate_pass_submission::{
    GatePassSubmissionResponse, GatePassSubmissionService, GatePassSubmissionStatus,
};
