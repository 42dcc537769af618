//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the gate pass submission endpoint, the health checks
//! and the shared response envelope. The document is served by Swagger UI in
//! debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::envelope::{ApiEnvelope, ApiStatus};
use crate::inbound::http::gate_pass::GatePassSubmission;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gate pass API",
        description = "Submit gate pass requests and check service health."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::gate_pass::submit_gate_pass,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(GatePassSubmission, ApiEnvelope, ApiStatus)),
    tags(
        (name = "gatepass", description = "Gate pass submission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
