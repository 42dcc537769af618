//! JSON file adapter for the gate pass repository port.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde::{Deserialize, Serialize, Serializer as _};
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, error, warn};

use super::atomic_io::write_atomic;
use crate::domain::GatePassRecord;
use crate::domain::ports::{GatePassRepository, GatePassRepositoryError, StoredGatePasses};

/// Suffix of the copy kept when the store is not a JSON array.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Gate pass repository persisting to a single JSON file.
///
/// The adapter holds a capability for the directory containing the file and
/// only writes the file itself, its temporary siblings and the
/// [`CORRUPT_SUFFIX`] backup. File I/O runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileGatePassRepository {
    dir: Arc<Dir>,
    file_name: String,
    path: Utf8PathBuf,
}

impl JsonFileGatePassRepository {
    /// Bind the repository to `path`, creating its directory if needed.
    ///
    /// The file itself is created on the first save.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when `path` does not end in a
    /// file name, or the underlying error when the directory cannot be
    /// created or opened.
    pub fn open(path: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let Some(file_name) = path.file_name() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("gate pass store path {path} must name a file"),
            ));
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        Dir::create_ambient_dir_all(parent, ambient_authority())?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            file_name: file_name.to_owned(),
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing file, as configured.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn read_store(dir: &Dir, file_name: &str, path: &Utf8Path) -> StoredGatePasses {
    let contents = match dir.read(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(%path, "gate pass store does not exist yet");
            return StoredGatePasses::default();
        }
        Err(err) => {
            warn!(%path, error = %err, "failed to read gate pass store; starting with empty data");
            return StoredGatePasses::default();
        }
    };
    if contents.iter().all(u8::is_ascii_whitespace) {
        debug!(%path, "gate pass store is empty");
        return StoredGatePasses::default();
    }

    let entries: Vec<Value> = match serde_json::from_slice(&contents) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%path, error = %err, "gate pass store is corrupted; starting with empty data");
            back_up_corrupt(dir, file_name, path, &contents);
            return StoredGatePasses::default();
        }
    };

    let mut stored = StoredGatePasses::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match GatePassRecord::deserialize(&entry) {
            Ok(record) => stored.records.push(record),
            Err(err) => {
                warn!(%path, index, error = %err, "keeping undecodable gate pass entry as is");
                stored.unreadable.push(entry);
            }
        }
    }
    stored
}

/// Copy a store that is not a JSON array aside before anything replaces it.
fn back_up_corrupt(dir: &Dir, file_name: &str, path: &Utf8Path, contents: &[u8]) {
    let backup = format!("{file_name}{CORRUPT_SUFFIX}");
    match write_atomic(dir, &backup, contents) {
        Ok(()) => warn!(%path, %backup, "saved a copy of the corrupted gate pass store"),
        Err(err) => error!(%path, %backup, error = %err, "failed to back up corrupted gate pass store"),
    }
}

/// Entry written to the store: a record or an entry kept verbatim.
#[derive(Serialize)]
#[serde(untagged)]
enum StoredEntry<'a> {
    Record(&'a GatePassRecord),
    Unreadable(&'a Value),
}

fn encode_store(stored: &StoredGatePasses) -> Result<Vec<u8>, GatePassRepositoryError> {
    let entries = stored
        .records
        .iter()
        .map(StoredEntry::Record)
        .chain(stored.unreadable.iter().map(StoredEntry::Unreadable));

    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    (&mut serializer)
        .collect_seq(entries)
        .map_err(|err| GatePassRepositoryError::serialization(err.to_string()))?;
    Ok(buffer)
}

#[async_trait]
impl GatePassRepository for JsonFileGatePassRepository {
    async fn load(&self) -> StoredGatePasses {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || read_store(&dir, &file_name, &path)).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %self.path, error = %err, "gate pass store read task failed; starting with empty data");
                StoredGatePasses::default()
            }
        }
    }

    async fn save(&self, stored: &StoredGatePasses) -> Result<(), GatePassRepositoryError> {
        let contents = encode_store(stored).inspect_err(|err| {
            error!(path = %self.path, error = %err, "failed to encode gate pass data");
        })?;

        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let written = tokio::task::spawn_blocking(move || write_atomic(&dir, &file_name, &contents))
            .await
            .map_err(|err| io::Error::other(err.to_string()))
            .and_then(|result| result);

        written.map_err(|err| {
            error!(path = %self.path, error = %err, "failed to save gate pass data");
            GatePassRepositoryError::write(self.path.as_str(), err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GatePassId, GatePassStatus};
    use rstest::{fixture, rstest};
    use serde_json::json;

    struct StoreFixture {
        _tmp: tempfile::TempDir,
        path: Utf8PathBuf,
    }

    impl StoreFixture {
        fn repository(&self) -> JsonFileGatePassRepository {
            JsonFileGatePassRepository::open(&self.path).expect("open repository")
        }

        fn write_raw(&self, contents: &str) {
            std::fs::write(&self.path, contents).expect("seed store file");
        }

        fn read_raw(&self) -> String {
            std::fs::read_to_string(&self.path).expect("read store file")
        }

        fn read_json(&self) -> Value {
            serde_json::from_str(&self.read_raw()).expect("store is valid JSON")
        }

        fn backup_path(&self) -> Utf8PathBuf {
            Utf8PathBuf::from(format!("{}{CORRUPT_SUFFIX}", self.path))
        }
    }

    #[fixture]
    fn store() -> StoreFixture {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 temp path");
        StoreFixture {
            path: root.join("data").join("gatepass_data.json"),
            _tmp: tmp,
        }
    }

    fn record(id: u64) -> GatePassRecord {
        GatePassRecord {
            id: GatePassId::new(id),
            name: format!("name-{id}"),
            department: "X".into(),
            user_email: "a@b.com".into(),
            reason: "Visit \"site\"\nsecond line".into(),
            timestamp: "2025-06-15T09:30:00+00:00".into(),
            status: GatePassStatus::Pending,
        }
    }

    fn records(ids: &[u64]) -> StoredGatePasses {
        StoredGatePasses::from_records(ids.iter().copied().map(record).collect())
    }

    #[rstest]
    #[tokio::test]
    async fn load_returns_empty_when_file_missing(store: StoreFixture) {
        assert!(store.repository().load().await.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[tokio::test]
    async fn blank_file_loads_empty_without_backup(store: StoreFixture, #[case] contents: &str) {
        let repo = store.repository();
        store.write_raw(contents);

        assert!(repo.load().await.is_empty());
        assert!(!store.backup_path().exists());
    }

    #[rstest]
    #[case("{ not json")]
    #[case(r#"{"id": 1}"#)]
    #[tokio::test]
    async fn corrupted_file_loads_empty_and_is_backed_up(
        store: StoreFixture,
        #[case] contents: &str,
    ) {
        let repo = store.repository();
        store.write_raw(contents);

        assert!(repo.load().await.is_empty());
        let backup = std::fs::read_to_string(store.backup_path()).expect("backup written");
        assert_eq!(backup, contents);

        repo.save(&records(&[1])).await.expect("save succeeds");
        let backup = std::fs::read_to_string(store.backup_path()).expect("backup kept");
        assert_eq!(backup, contents);
    }

    #[rstest]
    #[tokio::test]
    async fn odd_entries_beside_valid_records_are_preserved(store: StoreFixture) {
        let repo = store.repository();
        let valid = serde_json::to_value(record(1)).expect("serialise record");
        let closed = json!({
            "id": 2, "name": "B", "department": "Y", "user_email": "b@c.com",
            "reason": "S", "timestamp": "2025-06-14", "status": "closed"
        });
        let broken = json!({"id": 7, "department": "Z"});
        store.write_raw(&json!([valid, closed, broken]).to_string());

        let stored = repo.load().await;

        let ids: Vec<_> = stored.records.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            stored.records.get(1).map(|r| r.status.clone()),
            Some(GatePassStatus::Other("closed".into()))
        );
        assert_eq!(stored.unreadable, vec![broken.clone()]);
        assert_eq!(stored.next_id(), GatePassId::new(8));
        assert!(!store.backup_path().exists());

        repo.save(&stored).await.expect("save succeeds");
        assert_eq!(store.read_json(), json!([valid, closed, broken]));
    }

    #[rstest]
    #[tokio::test]
    async fn save_then_load_round_trips(store: StoreFixture) {
        let repo = store.repository();
        let stored = records(&[1, 2]);

        repo.save(&stored).await.expect("save succeeds");

        assert_eq!(repo.load().await, stored);
    }

    #[rstest]
    #[tokio::test]
    async fn save_overwrites_previous_contents(store: StoreFixture) {
        let repo = store.repository();
        repo.save(&records(&[1, 2])).await.expect("first save");
        repo.save(&records(&[2])).await.expect("second save");

        assert_eq!(repo.load().await, records(&[2]));
    }

    #[rstest]
    #[tokio::test]
    async fn save_reports_write_error_when_target_is_a_directory(store: StoreFixture) {
        let repo = store.repository();
        std::fs::create_dir(&store.path).expect("occupy store path");

        let err = repo
            .save(&records(&[1]))
            .await
            .expect_err("rename onto a directory fails");

        assert!(matches!(
            &err,
            GatePassRepositoryError::Write { path, .. } if path == store.path.as_str()
        ));
        let leftovers: Vec<_> = std::fs::read_dir(store.path.parent().expect("has parent"))
            .expect("list store directory")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty(), "temporary file should be removed");
    }

    #[rstest]
    #[tokio::test]
    async fn save_writes_indented_human_readable_json(store: StoreFixture) {
        let repo = store.repository();
        repo.save(&records(&[1])).await.expect("save succeeds");

        let raw = store.read_raw();
        assert!(raw.starts_with("[\n    {\n        \"id\": 1,"));
        assert!(raw.contains("\"status\": \"pending\""));
    }

    #[rstest]
    #[tokio::test]
    async fn load_accepts_legacy_field_names(store: StoreFixture) {
        let repo = store.repository();
        store.write_raw(
            r#"[{"s_no": 3, "name": "A", "department": "X", "user_email": "a@b.com",
                "reason": "R", "date": "2025-06-01", "status": "pending"}]"#,
        );

        let stored = repo.load().await;
        let first = stored.records.first().expect("one record");
        assert_eq!(first.id, GatePassId::new(3));
        assert_eq!(first.timestamp, "2025-06-01");
    }

    #[rstest]
    fn open_rejects_paths_without_file_name() {
        let err = JsonFileGatePassRepository::open("data/..").expect_err("no file name");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn open_creates_missing_directory(store: StoreFixture) {
        let repo = store.repository();
        assert!(store.path.parent().expect("has parent").is_dir());
        assert_eq!(repo.path(), store.path.as_path());
    }
}
