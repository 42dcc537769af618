//! JSON envelope shared by every gate pass API response.
//!
//! ```json
//! {"status": "success", "message": "...", "gatepass_id": 3}
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome category reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    /// Stored and notified.
    Success,
    /// Stored, but the notification failed.
    Warning,
    /// Rejected or failed; nothing was stored.
    Error,
}

/// Response body for the gate pass API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiEnvelope {
    /// Outcome category.
    pub status: ApiStatus,
    /// Human-readable summary.
    #[schema(example = "Gate Pass #1 submitted and email sent successfully.")]
    pub message: String,
    /// Identifier of the stored record; absent on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub gatepass_id: Option<u64>,
}

impl ApiEnvelope {
    /// Envelope for a failed request.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            message: message.into(),
            gatepass_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_envelope_omits_identifier() {
        let value = serde_json::to_value(ApiEnvelope::error("bad")).expect("serialize envelope");
        assert_eq!(value, json!({"status": "error", "message": "bad"}));
    }

    #[test]
    fn identifier_is_serialised_when_present() {
        let envelope = ApiEnvelope {
            status: ApiStatus::Warning,
            message: "saved".into(),
            gatepass_id: Some(4),
        };
        let value = serde_json::to_value(envelope).expect("serialize envelope");
        assert_eq!(
            value,
            json!({"status": "warning", "message": "saved", "gatepass_id": 4})
        );
    }
}
