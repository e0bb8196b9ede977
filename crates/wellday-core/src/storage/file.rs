//! Directory-backed store: one `<key>.json` file per key.

use std::path::PathBuf;

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::File {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::File { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        std::fs::write(&path, value).map_err(|source| StorageError::File { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn one_file_per_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::open(temp_dir.path().join("store")).unwrap();

        store.set("calendar_data", "[]").unwrap();
        assert!(temp_dir.path().join("store/calendar_data.json").exists());
        assert_eq!(store.get("calendar_data").unwrap().as_deref(), Some("[]"));

        store.set("calendar_data", "[{}]").unwrap();
        assert_eq!(store.get("calendar_data").unwrap().as_deref(), Some("[{}]"));
        assert!(store.get("water_calendar").unwrap().is_none());
    }

    #[test]
    fn keys_cannot_escape_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        assert_eq!(store.path("../x"), temp_dir.path().join("___x.json"));
    }
}
