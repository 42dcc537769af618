//! Gate pass records and submission validation.
//!
//! A [`GatePassRecord`] is the only persisted entity. Inbound adapters build a
//! [`GatePassRequest`] from whatever they received and call
//! [`GatePassRequest::validate`] to obtain a [`GatePassDraft`]; the draft only
//! becomes a record once the store has assigned it an identifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Monotonically assigned gate pass identifier.
///
/// Serialised as a bare JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatePassId(u64);

impl GatePassId {
    /// Identifier handed out when the store is empty.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for GatePassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the identifier for the next record.
///
/// Uses the maximum identifier present rather than the last element, so the
/// result stays unique when records are stored out of order.
///
/// # Examples
/// ```
/// use gatepass::domain::{GatePassId, next_gate_pass_id};
///
/// assert_eq!(next_gate_pass_id(&[]), GatePassId::FIRST);
/// ```
#[must_use]
pub fn next_gate_pass_id(records: &[GatePassRecord]) -> GatePassId {
    records
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(GatePassId::FIRST, GatePassId::next)
}

/// Approval state of a gate pass.
///
/// New records are always `pending`. The other values are recognised when
/// reading a store edited by hand; nothing in the service transitions them.
/// Any other string is kept as [`GatePassStatus::Other`] and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePassStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Access granted.
    Approved,
    /// Access refused.
    Rejected,
    /// Status string this service does not know.
    #[serde(untagged)]
    Other(String),
}

/// Persisted gate pass.
///
/// `id` also deserialises from `s_no` and `timestamp` from `date` so stores
/// written with the older field names load unchanged. The timestamp is kept
/// verbatim; see [`GatePassRecord::created_on`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePassRecord {
    /// Unique identifier within the store.
    #[serde(alias = "s_no")]
    pub id: GatePassId,
    /// Requester name.
    pub name: String,
    /// Requester department.
    pub department: String,
    /// Address the notification is sent to.
    pub user_email: String,
    /// Free-text reason for the pass.
    pub reason: String,
    /// Creation time as written to the store.
    #[serde(alias = "date")]
    pub timestamp: String,
    /// Approval state.
    #[serde(default)]
    pub status: GatePassStatus,
}

impl GatePassRecord {
    /// Calendar date the record was created on, if the timestamp parses.
    ///
    /// Accepts RFC 3339, a naive ISO-8601 date-time (`2025-01-31T09:30:00`,
    /// optional fraction) or a bare `YYYY-MM-DD` date. Zoned timestamps
    /// yield the date in their own offset.
    #[must_use]
    pub fn created_on(&self) -> Option<NaiveDate> {
        let raw = self.timestamp.trim();
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Some(zoned.date_naive());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Fields a submission must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePassField {
    /// `name`
    Name,
    /// `department`
    Department,
    /// `reason`
    Reason,
    /// `user_email`
    UserEmail,
}

impl GatePassField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Department => "department",
            Self::Reason => "reason",
            Self::UserEmail => "user_email",
        }
    }
}

impl std::fmt::Display for GatePassField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatePassValidationError {
    /// At least one required key was absent.
    #[error("Missing required fields.")]
    MissingFields {
        /// Absent fields, in declaration order.
        fields: Vec<GatePassField>,
    },
    /// Every key was present but some values were blank.
    #[error("Required fields must not be empty.")]
    EmptyFields {
        /// Blank fields, in declaration order.
        fields: Vec<GatePassField>,
    },
}

impl GatePassValidationError {
    /// Fields responsible for the rejection.
    #[must_use]
    pub fn fields(&self) -> &[GatePassField] {
        match self {
            Self::MissingFields { fields } | Self::EmptyFields { fields } => fields,
        }
    }
}

/// Unvalidated submission as received by an inbound adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatePassRequest {
    /// Requester name.
    pub name: Option<String>,
    /// Requester department.
    pub department: Option<String>,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Requester email address.
    pub user_email: Option<String>,
}

impl GatePassRequest {
    /// Check that every required field is present and non-blank.
    ///
    /// Missing keys are reported in preference to blank values.
    ///
    /// # Errors
    /// Returns [`GatePassValidationError`] naming the offending fields.
    ///
    /// # Examples
    /// ```
    /// use gatepass::domain::{GatePassRequest, GatePassValidationError};
    ///
    /// let request = GatePassRequest {
    ///     name: Some("A".into()),
    ///     department: Some("X".into()),
    ///     reason: Some("R".into()),
    ///     user_email: None,
    /// };
    /// assert!(matches!(
    ///     request.validate(),
    ///     Err(GatePassValidationError::MissingFields { .. })
    /// ));
    /// ```
    pub fn validate(self) -> Result<GatePassDraft, GatePassValidationError> {
        let Self {
            name,
            department,
            reason,
            user_email,
        } = self;
        match (name, department, reason, user_email) {
            (Some(name), Some(department), Some(reason), Some(user_email)) => {
                let empty: Vec<_> = [
                    (GatePassField::Name, &name),
                    (GatePassField::Department, &department),
                    (GatePassField::Reason, &reason),
                    (GatePassField::UserEmail, &user_email),
                ]
                .into_iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(field, _)| field)
                .collect();
                if !empty.is_empty() {
                    return Err(GatePassValidationError::EmptyFields { fields: empty });
                }
                Ok(GatePassDraft {
                    name,
                    department,
                    reason,
                    user_email,
                })
            }
            (name, department, reason, user_email) => {
                let fields = [
                    (GatePassField::Name, name.is_none()),
                    (GatePassField::Department, department.is_none()),
                    (GatePassField::Reason, reason.is_none()),
                    (GatePassField::UserEmail, user_email.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(GatePassValidationError::MissingFields { fields })
            }
        }
    }
}

/// Validated submission awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePassDraft {
    name: String,
    department: String,
    reason: String,
    user_email: String,
}

impl GatePassDraft {
    /// Requester email address.
    #[must_use]
    pub fn user_email(&self) -> &str {
        self.user_email.as_str()
    }

    /// Turn the draft into a pending record.
    #[must_use]
    pub fn into_record(self, id: GatePassId, timestamp: String) -> GatePassRecord {
        GatePassRecord {
            id,
            name: self.name,
            department: self.department,
            user_email: self.user_email,
            reason: self.reason,
            timestamp,
            status: GatePassStatus::Pending,
        }
    }
}
