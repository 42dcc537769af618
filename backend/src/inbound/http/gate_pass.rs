//! Gate pass API handlers.
//!
//! ```text
//! POST /api/gatepass  Submit a gate pass request
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use super::envelope::{ApiEnvelope, ApiStatus};
use crate::domain::GatePassRequest;
use crate::domain::ports::{GatePassSubmissionResponse, GatePassSubmissionStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Gate pass submission body.
///
/// Every field is required and must not be blank; presence is checked by
/// the domain so that missing and empty values get distinct messages.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GatePassSubmission {
    /// Requester's name.
    #[schema(example = "A. Kumar")]
    pub name: Option<String>,
    /// Requester's department.
    #[schema(example = "Mechanical")]
    pub department: Option<String>,
    /// Why the requester needs to leave the premises.
    #[schema(example = "Medical appointment")]
    pub reason: Option<String>,
    /// Address the notification is sent to.
    #[schema(example = "a.kumar@example.com")]
    pub user_email: Option<String>,
}

impl From<GatePassSubmission> for GatePassRequest {
    fn from(value: GatePassSubmission) -> Self {
        let GatePassSubmission {
            name,
            department,
            reason,
            user_email,
        } = value;
        Self {
            name,
            department,
            reason,
            user_email,
        }
    }
}

fn envelope_for(response: GatePassSubmissionResponse) -> ApiEnvelope {
    let id = response.gatepass_id;
    let (status, message) = match response.status {
        GatePassSubmissionStatus::Success => (
            ApiStatus::Success,
            format!("Gate Pass #{id} submitted and email sent successfully."),
        ),
        GatePassSubmissionStatus::Warning => (
            ApiStatus::Warning,
            format!(
                "Gate Pass #{id} submitted and saved, but email notification failed. Check server logs."
            ),
        ),
    };
    ApiEnvelope {
        status,
        message,
        gatepass_id: Some(id.get()),
    }
}

/// Submit a gate pass request.
///
/// The record is stored before the notification is attempted, so a failed
/// email still answers `200` with `status: "warning"`.
///
/// # Errors
///
/// - `400 Bad Request`: malformed JSON, or a required field is missing or
///   blank.
/// - `500 Internal Server Error`: the record could not be written.
#[utoipa::path(
    post,
    path = "/api/gatepass",
    request_body = GatePassSubmission,
    responses(
        (status = 200, description = "Gate pass stored; see status for the notification outcome", body = ApiEnvelope),
        (status = 400, description = "Invalid request", body = ApiEnvelope),
        (status = 500, description = "Gate pass could not be stored", body = ApiEnvelope)
    ),
    tags = ["gatepass"],
    operation_id = "submitGatePass"
)]
#[post("/gatepass")]
pub async fn submit_gate_pass(
    state: web::Data<HttpState>,
    payload: web::Json<GatePassSubmission>,
) -> ApiResult<HttpResponse> {
    let response = state.submission.submit(payload.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(envelope_for(response)))
}
