use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};
use crate::models::Snapshot;

/// Key holding the current serialized [`Snapshot`].
pub const CANONICAL_KEY: &str = "SPORT_STATE_V1";

/// Loads and saves the whole snapshot under [`CANONICAL_KEY`].
#[derive(Clone, Debug)]
pub struct SnapshotStore<K> {
    backend: K,
}

impl<K: KeyValueStore> SnapshotStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn into_backend(self) -> K {
        self.backend
    }

    /// Loads the canonical snapshot.
    ///
    /// Returns `Ok(None)` when nothing is stored or when the stored value
    /// is not a valid snapshot. Only failures to read at all are errors.
    pub fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = match self.backend.get(CANONICAL_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) => {
                debug!(
                    water_days = snapshot.water.len(),
                    foods = snapshot.nutrition.len(),
                    workouts = snapshot.exercise.len(),
                    "loaded snapshot"
                );
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(key = CANONICAL_KEY, error = %e, "ignoring malformed snapshot");
                Ok(None)
            }
        }
    }

    /// Replaces the stored snapshot with `snapshot`.
    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshot)?;
        self.backend.set(CANONICAL_KEY, &json)?;
        debug!(bytes = json.len(), "saved snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewFood, NewWorkout};
    use crate::storage::{FileStore, MemoryStore};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut snapshot = Snapshot::default();
        snapshot.water.insert(date, 1250);
        snapshot.nutrition.push(
            NewFood::new(date, "Oats", 150)
                .with_carbs(27.0)
                .into_entry("f1".to_string()),
        );
        snapshot
            .exercise
            .push(NewWorkout::new(date, "Cycling", 45, 400).into_entry("w1".to_string()));
        snapshot.goals.kcal_per_day = 1900;
        snapshot
    }

    #[test]
    fn test_load_absent_returns_none() {
        let store = SnapshotStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut store = SnapshotStore::new(MemoryStore::new());
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = SnapshotStore::new(FileStore::new(temp_dir.path().to_path_buf()));
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();

        let reopened = SnapshotStore::new(FileStore::new(temp_dir.path().to_path_buf()));
        assert_eq!(reopened.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_malformed_snapshot_is_treated_as_absent() {
        let backend = MemoryStore::new().with_entry(CANONICAL_KEY, "{not json");
        let store = SnapshotStore::new(backend);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let mut store = SnapshotStore::new(MemoryStore::new());
        store.save(&sample_snapshot()).unwrap();
        store.save(&Snapshot::default()).unwrap();

        assert_eq!(store.load().unwrap(), Some(Snapshot::default()));
        assert_eq!(store.backend().writes(), 2);
    }
}
