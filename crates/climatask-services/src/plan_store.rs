//! Append-only storage for saved picnic plans.

use climatask_core::PersistenceError;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::plan::PicnicPlan;
use crate::storage::write_json_atomic;

/// Storage for saved plans.
///
/// Plans are only ever appended; prior entries are never edited or removed.
pub trait PlanStore: Send + Sync {
    /// All readable plans in save order. Never fails: a missing or corrupt
    /// store reads as empty and malformed entries are skipped.
    fn load_all(&self) -> Vec<PicnicPlan>;

    /// Append a plan, keeping every prior entry. An existing store that
    /// cannot be read is an error and is left untouched.
    fn append(&self, plan: &PicnicPlan) -> Result<(), PersistenceError>;
}

/// Plans kept as a JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonPlanStore {
    path: PathBuf,
}

impl JsonPlanStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw array entries. A missing file is empty and unparseable content is
    /// `Corrupt`; any other read failure is an error.
    fn read_entries(&self) -> Result<Stored, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Stored::Entries(Vec::new())),
            Err(e) => return Err(PersistenceError::read(&self.path, e)),
        };
        Ok(match serde_json::from_slice(&bytes) {
            Ok(entries) => Stored::Entries(entries),
            Err(e) => Stored::Corrupt(e.to_string()),
        })
    }
}

/// What a read of the plan file found.
enum Stored {
    Entries(Vec<Value>),
    Corrupt(String),
}

impl PlanStore for JsonPlanStore {
    fn load_all(&self) -> Vec<PicnicPlan> {
        let entries = match self.read_entries() {
            Ok(Stored::Entries(entries)) => entries,
            Ok(Stored::Corrupt(reason)) => {
                tracing::warn!("Ignoring corrupt plan store {:?}: {}", self.path, reason);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable plan store: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(plan) => Some(plan),
                Err(e) => {
                    tracing::warn!("Skipping saved plan {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    fn append(&self, plan: &PicnicPlan) -> Result<(), PersistenceError> {
        // Only a corrupt file is started over; an unreadable one is left alone.
        let mut entries = match self.read_entries()? {
            Stored::Entries(entries) => entries,
            Stored::Corrupt(reason) => {
                tracing::warn!("Plan store corrupt, starting a new list: {}", reason);
                Vec::new()
            }
        };
        let value =
            serde_json::to_value(plan).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
        entries.push(value);

        write_json_atomic(&self.path, &entries)?;
        tracing::info!("Saved plan \"{}\" ({} total)", plan.name, entries.len());
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: Mutex<Vec<PicnicPlan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn load_all(&self) -> Vec<PicnicPlan> {
        self.plans.lock().clone()
    }

    fn append(&self, plan: &PicnicPlan) -> Result<(), PersistenceError> {
        self.plans.lock().push(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn plan(name: &str) -> PicnicPlan {
        PicnicPlan {
            date: NaiveDate::from_ymd_opt(2026, 6, 6).unwrap(),
            name: name.to_string(),
            items: vec!["Snacks".into()],
            participants: vec!["Alice".into()],
            weather_summary: "Clear sky".into(),
            temperature: "22.0°C".into(),
            created_at: None,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonPlanStore {
        JsonPlanStore::new(dir.path().join("picnic_plans.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load_all().is_empty());
    }

    #[test]
    fn test_append_keeps_prior_plans_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append(&plan("First")).unwrap();
        store.append(&plan("Second")).unwrap();

        let names: Vec<String> = store.load_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_append_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load_all().is_empty());
        store.append(&plan("Fresh")).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_malformed_entries_skipped_but_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"name": "no date"}, {"date": "2026-06-07", "items": [], "weather": "Fog", "temperature": "14.0°C"}]"#,
        )
        .unwrap();

        let plans = store.load_all();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].weather_summary, "Fog");

        store.append(&plan("Third")).unwrap();
        let raw: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(store.load_all().len(), 2);
    }

    #[test]
    fn test_append_refuses_unreadable_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        // A directory in place of the file fails to read without being missing.
        fs::create_dir(store.path()).unwrap();

        let err = store.append(&plan("Lost")).unwrap_err();
        assert!(matches!(err, PersistenceError::Read { .. }));
        assert!(store.path().is_dir());
        assert!(store.load_all().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_append_keeps_plans_when_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&plan("A")).unwrap();
        store.append(&plan("B")).unwrap();

        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(store.path()).is_ok() {
            // Running with privileges that ignore file modes.
            return;
        }

        let err = store.append(&plan("C")).unwrap_err();
        assert!(matches!(err, PersistenceError::Read { .. }));

        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        let names: Vec<String> = store.load_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPlanStore::new();
        store.append(&plan("A")).unwrap();
        assert_eq!(store.load_all(), vec![plan("A")]);
    }
}
