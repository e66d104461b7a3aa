//! JSON file backed storage.
//!
//! All keys live in a single `storage.json` object of string values. The
//! file is read once when opened; every `set` rewrites it through a
//! temporary file and a rename.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Storage, StorageError};

/// Name of the storage file inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Application directory name under the platform data directory.
const APP_DIR_NAME: &str = "time-tracker";

/// Returns the default data directory (e.g. `~/.local/share/time-tracker`).
///
/// # Errors
///
/// Returns `StorageError::DataDirNotFound` if the platform has no data
/// directory.
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(StorageError::DataDirNotFound)
}

/// Storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens (or prepares) the storage file inside `dir`.
    ///
    /// The directory is created if missing. An unreadable or malformed file
    /// is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let path = dir.join(STORAGE_FILE_NAME);
        let entries = Self::load(&path);
        debug!("Opened storage {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    /// Path of the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read {}: {}, starting empty", path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, json).map_err(|e| StorageError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let storage = FileStorage::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(storage.path(), dir.join(STORAGE_FILE_NAME));
        assert_eq!(storage.get("anything"), None);
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();

        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("TimeTrackerData", r#"{"timerValue":60}"#).unwrap();
        drop(storage);

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(
            reopened.get("TimeTrackerData"),
            Some(r#"{"timerValue":60}"#.to_string())
        );
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("a"), Some("1".to_string()));
        assert_eq!(reopened.get("b"), Some("2".to_string()));
    }

    #[test]
    fn test_malformed_file_is_treated_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(STORAGE_FILE_NAME), "not json at all").unwrap();

        let storage = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.get("TimeTrackerData"), None);

        // The next write replaces the broken file.
        storage.set("key", "value").unwrap();
        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_no_temporary_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("key", "value").unwrap();

        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(STORAGE_FILE_NAME)]);
    }
}
