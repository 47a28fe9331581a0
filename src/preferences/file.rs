//! JSON file backend.
//!
//! The whole store is a single JSON object kept in memory and rewritten on
//! every change:
//!
//! ```text
//! <config_dir>/cuImage/
//! └── preferences.json    # { "keepWindowsOnTop": true, ... }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::backend::PreferenceBackend;
use crate::error::CuImageResult;

const APP_DIR_NAME: &str = "cuImage";
const PREFERENCES_FILENAME: &str = "preferences.json";

/// Preference backend persisted as a JSON file.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileBackend {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that does not parse is logged
    /// and treated as empty; it is replaced on the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> CuImageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => {
                    log::debug!("[PREFERENCES] Loaded {} values from {:?}", map.len(), path);
                    map
                },
                Ok(_) => {
                    log::warn!("[PREFERENCES] {:?} is not a JSON object, starting empty", path);
                    Map::new()
                },
                Err(e) => {
                    log::warn!("[PREFERENCES] Failed to parse {:?}: {}, starting empty", path, e);
                    Map::new()
                },
            }
        } else {
            log::info!("[PREFERENCES] No preference file at {:?}, using defaults", path);
            Map::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Default location: `<config_dir>/cuImage/preferences.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(PREFERENCES_FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> CuImageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(values)?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        log::debug!("[PREFERENCES] Saved preferences to {:?}", self.path);
        Ok(())
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn value(&self, name: &str) -> Option<Value> {
        self.values.read().get(name).cloned()
    }

    fn set_value(&self, name: &str, value: Value) -> CuImageResult<()> {
        let mut values = self.values.write();
        let mut updated = values.clone();
        updated.insert(name.to_string(), value);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }

    fn remove_value(&self, name: &str) -> CuImageResult<()> {
        let mut values = self.values.write();
        if !values.contains_key(name) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(name);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CuImageError;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("nested").join(PREFERENCES_FILENAME)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(store_path(&dir)).unwrap();
        assert_eq!(backend.value("anything"), None);
        assert!(!backend.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let backend = JsonFileBackend::open(&path).unwrap();
        backend.set_value("currentHost", json!("qiniu")).unwrap();
        backend.set_value("launchAtLogin", json!(true)).unwrap();
        backend.remove_value("launchAtLogin").unwrap();
        drop(backend);

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(reopened.value("currentHost"), Some(json!("qiniu")));
        assert_eq!(reopened.value("launchAtLogin"), None);
    }

    #[test]
    fn test_write_is_immediate() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let backend = JsonFileBackend::open(&path).unwrap();

        backend.set_value("keepWindowsOnTop", json!(false)).unwrap();

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({ "keepWindowsOnTop": false }));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "{ this is not json").unwrap();

        let backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(backend.value("currentHost"), None);

        backend.set_value("currentHost", json!("qiniu")).unwrap();
        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(reopened.value("currentHost"), Some(json!("qiniu")));
    }

    #[test]
    fn test_non_object_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "[1, 2, 3]").unwrap();

        let backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(backend.value("0"), None);
    }

    #[test]
    fn test_failed_write_leaves_values_unchanged() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("nested");
        fs::write(&blocker, "not a directory").unwrap();
        let backend = JsonFileBackend::open(store_path(&dir)).unwrap();

        let result = backend.set_value("keepWindowsOnTop", json!(false));

        assert!(matches!(result, Err(CuImageError::Storage(_))));
        assert_eq!(backend.value("keepWindowsOnTop"), None);
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(store_path(&dir)).unwrap();
        backend.set_value("launchAtLogin", json!(true)).unwrap();

        // Swap the store's directory for a plain file so the rewrite fails
        let nested = dir.path().join("nested");
        fs::remove_dir_all(&nested).unwrap();
        fs::write(&nested, "not a directory").unwrap();

        assert!(backend.remove_value("launchAtLogin").is_err());
        assert_eq!(backend.value("launchAtLogin"), Some(json!(true)));
    }

    #[test]
    fn test_default_path_ends_with_app_file() {
        let path = JsonFileBackend::default_path();
        assert!(path.ends_with("cuImage/preferences.json"));
    }
}
