//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use gatepass::domain::ports::GatePassSubmissionService;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) submission: Arc<dyn GatePassSubmissionService>,
}

impl ServerConfig {
    /// Bind to `bind_addr` and serve submissions through `submission`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, submission: Arc<dyn GatePassSubmissionService>) -> Self {
        Self {
            bind_addr,
            submission,
        }
    }
}
