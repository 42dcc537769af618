//! Age-based retention for stored gate passes.
//!
//! The sweep runs once when the process starts. Records whose timestamp
//! cannot be parsed count as expired and are removed with the old ones.
//! Entries the store could not decode are never purged.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::GatePassRecord;
use crate::domain::ports::{GatePassRepository, GatePassRepositoryError};

/// Retention window applied when none is configured.
pub const DEFAULT_RETENTION_DAYS: u32 = 45;

/// Maximum record age, in whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_age_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_DAYS)
    }
}

impl RetentionPolicy {
    /// Create a policy keeping records at most `max_age_days` old.
    ///
    /// A window of `0` disables purging.
    #[must_use]
    pub const fn new(max_age_days: u32) -> Self {
        Self { max_age_days }
    }

    /// Configured window in days.
    #[must_use]
    pub const fn max_age_days(self) -> u32 {
        self.max_age_days
    }

    /// Whether the policy removes anything at all.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.max_age_days > 0
    }

    /// Keep the records created within the window ending at `now`.
    ///
    /// Age is measured between calendar dates, so a record exactly
    /// `max_age_days` old is kept. Dated-in-the-future records are kept.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use gatepass::domain::{GatePassId, GatePassRecord, GatePassStatus, RetentionPolicy};
    ///
    /// let record = GatePassRecord {
    ///     id: GatePassId::FIRST,
    ///     name: "A".into(),
    ///     department: "X".into(),
    ///     user_email: "a@b.com".into(),
    ///     reason: "R".into(),
    ///     timestamp: "bad-date".into(),
    ///     status: GatePassStatus::Pending,
    /// };
    /// assert!(RetentionPolicy::default().purge(vec![record], Utc::now()).is_empty());
    /// ```
    #[must_use]
    pub fn purge(self, records: Vec<GatePassRecord>, now: DateTime<Utc>) -> Vec<GatePassRecord> {
        if !self.is_enabled() {
            return records;
        }
        let today = now.date_naive();
        let max_age = i64::from(self.max_age_days);
        records
            .into_iter()
            .filter(|record| {
                record
                    .created_on()
                    .is_some_and(|created| (today - created).num_days() <= max_age)
            })
            .collect()
    }
}

/// Load the store, drop expired records and write back what remains.
///
/// The store is only rewritten when something was removed. Returns the
/// number of purged records.
///
/// # Errors
/// Propagates [`GatePassRepositoryError`] when the purged list cannot be
/// saved.
pub async fn run_retention_sweep<R>(
    repository: &R,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<usize, GatePassRepositoryError>
where
    R: GatePassRepository + ?Sized,
{
    if !policy.is_enabled() {
        info!("retention sweep disabled");
        return Ok(0);
    }

    let mut stored = repository.load().await;
    let before = stored.records.len();
    stored.records = policy.purge(std::mem::take(&mut stored.records), now);
    let removed = before - stored.records.len();

    if removed == 0 {
        info!(
            retained = stored.records.len(),
            unreadable = stored.unreadable.len(),
            max_age_days = policy.max_age_days(),
            "retention sweep found nothing to purge"
        );
        return Ok(0);
    }

    if let Err(error) = repository.save(&stored).await {
        warn!(%error, removed, "failed to persist retention sweep");
        return Err(error);
    }
    info!(
        removed,
        retained = stored.records.len(),
        unreadable = stored.unreadable.len(),
        max_age_days = policy.max_age_days(),
        "purged expired gate passes"
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockGatePassRepository, StoredGatePasses};
    use crate::domain::{GatePassId, GatePassStatus};
    use chrono::{Duration, NaiveDate, TimeZone};
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn record(id: u64, timestamp: impl Into<String>) -> GatePassRecord {
        GatePassRecord {
            id: GatePassId::new(id),
            name: "A".into(),
            department: "X".into(),
            user_email: "a@b.com".into(),
            reason: "R".into(),
            timestamp: timestamp.into(),
            status: GatePassStatus::Pending,
        }
    }

    fn days_ago(now: DateTime<Utc>, days: i64) -> String {
        (now - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn mixed_records(now: DateTime<Utc>) -> Vec<GatePassRecord> {
        vec![
            record(1, now.to_rfc3339()),
            record(2, days_ago(now, 44)),
            record(3, days_ago(now, 46)),
            record(4, "bad-date"),
        ]
    }

    #[rstest]
    fn purge_keeps_recent_and_drops_old_or_unparsable(
        now: DateTime<Utc>,
        mixed_records: Vec<GatePassRecord>,
    ) {
        let kept = RetentionPolicy::default().purge(mixed_records, now);
        let ids: Vec<_> = kept.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    fn purge_keeps_record_exactly_at_window(now: DateTime<Utc>) {
        let kept = RetentionPolicy::new(45).purge(vec![record(1, days_ago(now, 45))], now);
        assert_eq!(kept.len(), 1);
    }

    #[rstest]
    fn purge_keeps_future_dated_records(now: DateTime<Utc>) {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 16).expect("valid date");
        let kept = RetentionPolicy::default().purge(vec![record(1, tomorrow.to_string())], now);
        assert_eq!(kept.len(), 1);
    }

    #[rstest]
    fn disabled_policy_keeps_everything(now: DateTime<Utc>, mixed_records: Vec<GatePassRecord>) {
        let kept = RetentionPolicy::new(0).purge(mixed_records.clone(), now);
        assert_eq!(kept, mixed_records);
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_saves_retained_and_unreadable_entries(
        now: DateTime<Utc>,
        mixed_records: Vec<GatePassRecord>,
    ) {
        let mut repo = MockGatePassRepository::new();
        repo.expect_load()
            .times(1)
            .return_once(move || StoredGatePasses {
                records: mixed_records,
                unreadable: vec![json!({"id": 9, "status": 1})],
            });
        repo.expect_save()
            .withf(|stored| {
                stored.records.iter().map(|r| r.id.get()).eq([1, 2])
                    && stored.unreadable == [json!({"id": 9, "status": 1})]
            })
            .times(1)
            .returning(|_| Ok(()));

        let removed = run_retention_sweep(&repo, RetentionPolicy::default(), now)
            .await
            .expect("sweep succeeds");
        assert_eq!(removed, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_skips_save_when_nothing_expired(now: DateTime<Utc>) {
        let mut repo = MockGatePassRepository::new();
        let fresh = vec![record(1, now.to_rfc3339())];
        repo.expect_load()
            .times(1)
            .return_once(move || StoredGatePasses::from_records(fresh));
        repo.expect_save().never();

        let removed = run_retention_sweep(&repo, RetentionPolicy::default(), now)
            .await
            .expect("sweep succeeds");
        assert_eq!(removed, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_propagates_save_failure(
        now: DateTime<Utc>,
        mixed_records: Vec<GatePassRecord>,
    ) {
        let mut repo = MockGatePassRepository::new();
        repo.expect_load()
            .times(1)
            .return_once(move || StoredGatePasses::from_records(mixed_records));
        repo.expect_save()
            .times(1)
            .returning(|_| Err(GatePassRepositoryError::write("gatepass_data.json", "disk full")));

        let err = run_retention_sweep(&repo, RetentionPolicy::default(), now)
            .await
            .expect_err("save failure surfaces");
        assert!(err.to_string().contains("disk full"));
    }
}
