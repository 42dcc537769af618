//! Port for gate pass persistence.
//!
//! The [`GatePassRepository`] trait hides the record file behind a
//! load/save contract so the submission service never touches the
//! filesystem directly. Reads never fail: an unreadable store degrades to
//! empty contents and the adapter logs why. Entries that are valid JSON but
//! not valid records travel alongside the records so a save keeps them.
//! Writes report failure so callers can decide whether it is fatal.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{GatePassId, GatePassRecord, next_gate_pass_id};

use super::define_port_error;

define_port_error! {
    /// Errors raised by gate pass repository adapters.
    pub enum GatePassRepositoryError {
        /// Records could not be encoded.
        Serialization { message: String } =>
            "gate pass records could not be serialised: {message}",
        /// The backing store could not be written.
        Write { path: String, message: String } =>
            "failed to write gate pass store {path}: {message}",
    }
}

/// Everything read from a gate pass store.
///
/// `unreadable` holds entries that failed to decode as a
/// [`GatePassRecord`]. Services leave them alone and adapters write them back
/// after the records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredGatePasses {
    /// Decoded records, in store order.
    pub records: Vec<GatePassRecord>,
    /// Raw entries that could not be decoded.
    pub unreadable: Vec<Value>,
}

impl StoredGatePasses {
    /// Contents made only of decoded records.
    #[must_use]
    pub fn from_records(records: Vec<GatePassRecord>) -> Self {
        Self {
            records,
            unreadable: Vec::new(),
        }
    }

    /// Total number of entries, decoded or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len() + self.unreadable.len()
    }

    /// Whether the store holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.unreadable.is_empty()
    }

    /// Identifier for the next record.
    ///
    /// Integer `id` or `s_no` values found in unreadable entries are
    /// reserved too, so a new record never reuses them.
    #[must_use]
    pub fn next_id(&self) -> GatePassId {
        let reserved = self
            .unreadable
            .iter()
            .filter_map(|entry| entry.get("id").or_else(|| entry.get("s_no")))
            .filter_map(Value::as_u64)
            .max()
            .map(|id| GatePassId::new(id).next());
        let decoded = next_gate_pass_id(&self.records);
        reserved.map_or(decoded, |reserved| decoded.max(reserved))
    }
}

/// Port for loading and saving the full list of gate passes.
///
/// There is no per-record API: callers read everything, modify the list in
/// memory, then write everything back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatePassRepository: Send + Sync {
    /// Read every stored entry.
    ///
    /// Returns empty contents when the store does not exist or is not a
    /// JSON array.
    async fn load(&self) -> StoredGatePasses;

    /// Replace the store contents with `stored`.
    async fn save(&self, stored: &StoredGatePasses) -> Result<(), GatePassRepositoryError>;
}

/// Repository holding records in memory.
///
/// Useful in tests and for running the HTTP surface without a writable
/// disk. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryGatePassRepository {
    stored: Mutex<StoredGatePasses>,
}

impl InMemoryGatePassRepository {
    /// Create a repository pre-populated with `records`.
    #[must_use]
    pub fn with_records(records: Vec<GatePassRecord>) -> Self {
        Self::with_contents(StoredGatePasses::from_records(records))
    }

    /// Create a repository pre-populated with `stored`.
    #[must_use]
    pub fn with_contents(stored: StoredGatePasses) -> Self {
        Self {
            stored: Mutex::new(stored),
        }
    }

    /// Copy of the decoded records currently held.
    #[must_use]
    pub fn snapshot(&self) -> Vec<GatePassRecord> {
        self.contents().records
    }

    /// Copy of everything currently held.
    #[must_use]
    pub fn contents(&self) -> StoredGatePasses {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GatePassRepository for InMemoryGatePassRepository {
    async fn load(&self) -> StoredGatePasses {
        self.contents()
    }

    async fn save(&self, stored: &StoredGatePasses) -> Result<(), GatePassRepositoryError> {
        let mut guard = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = stored.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GatePassStatus;
    use rstest::rstest;
    use serde_json::json;

    fn record(id: u64) -> GatePassRecord {
        GatePassRecord {
            id: GatePassId::new(id),
            name: "A".into(),
            department: "X".into(),
            user_email: "a@b.com".into(),
            reason: "R".into(),
            timestamp: "2025-01-01".into(),
            status: GatePassStatus::Pending,
        }
    }

    #[tokio::test]
    async fn in_memory_repository_starts_empty() {
        let repo = InMemoryGatePassRepository::default();
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn in_memory_repository_replaces_contents_on_save() {
        let repo = InMemoryGatePassRepository::with_records(vec![record(1)]);
        repo.save(&StoredGatePasses::from_records(vec![record(2), record(3)]))
            .await
            .expect("in-memory save succeeds");

        let ids: Vec<_> = repo.snapshot().iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[rstest]
    #[case(Vec::new(), Vec::new(), 1)]
    #[case(vec![7, 3], Vec::new(), 8)]
    #[case(vec![2], vec![json!({"id": 9, "name": 5})], 10)]
    #[case(vec![4], vec![json!({"s_no": 3})], 5)]
    #[case(Vec::new(), vec![json!({"id": "x"}), json!("loose")], 1)]
    fn next_id_reserves_ids_of_unreadable_entries(
        #[case] ids: Vec<u64>,
        #[case] unreadable: Vec<Value>,
        #[case] expected: u64,
    ) {
        let stored = StoredGatePasses {
            records: ids.into_iter().map(record).collect(),
            unreadable,
        };
        assert_eq!(stored.next_id(), GatePassId::new(expected));
    }

    #[rstest]
    fn write_error_names_path() {
        let error = GatePassRepositoryError::write("/data/gatepass_data.json", "read-only");
        assert_eq!(
            error.to_string(),
            "failed to write gate pass store /data/gatepass_data.json: read-only"
        );
    }
}
