use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Key-value store backed by one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. Nothing is touched on disk
    /// until the first write.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the file backing `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{}.json", key)))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path(key).map(|p| p.exists()).unwrap_or(false)
    }
}

impl KeyValueStore for FileStore {
    /// Returns `Ok(None)` if the file doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// reader never observes a half-written value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;

        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Io { path, source })?;

        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_path_uses_json_extension() {
        let (store, _temp) = test_store();
        let path = store.path("SPORT_STATE_V1").unwrap();
        assert!(path.ends_with("SPORT_STATE_V1.json"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (store, _temp) = test_store();
        assert!(matches!(
            store.path("../escape"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_get_nonexistent_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.get("waterData").unwrap().is_none());
        assert!(!store.exists("waterData"));
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let mut store = FileStore::new(nested_dir.clone());

        store.set("waterData", "[]").unwrap();

        assert!(nested_dir.exists());
        assert!(store.exists("waterData"));
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let (mut store, _temp) = test_store();

        store.set("ayubi_water", r#"{"current":1800}"#).unwrap();

        assert_eq!(
            store.get("ayubi_water").unwrap(),
            Some(r#"{"current":1800}"#.to_string())
        );
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let (mut store, temp) = test_store();

        store.set("SPORT_STATE_V1", r#"{"water":{"2024-03-04":250}}"#).unwrap();
        store.set("SPORT_STATE_V1", "{}").unwrap();

        assert_eq!(store.get("SPORT_STATE_V1").unwrap(), Some("{}".to_string()));
        assert!(!temp.path().join("SPORT_STATE_V1.json.tmp").exists());
    }
}
