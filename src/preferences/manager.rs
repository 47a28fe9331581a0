//! Typed access to the preference store.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::backend::{MemoryBackend, PreferenceBackend};
use super::file::JsonFileBackend;
use super::key::PreferenceKey;
use super::keys::default_preferences;
use super::value::{PreferenceValue, WritablePreference};
use crate::error::CuImageResult;
use crate::shortcut::{value_transformer, ValueTransformer, KEYED_UNARCHIVE_FROM_DATA};

/// Typed accessor over a persistent preference backend.
///
/// Construct one at startup and pass it by reference. Reads never fail: a
/// missing or mistyped value resolves to the registered default, then to the
/// kind's zero value. Shortcuts are the exception: stored data that does not
/// decode reads as the empty shortcut, matching what the binder registers.
///
/// ```
/// use cuimage_lib::preferences::{keys, PreferenceManager};
///
/// let prefs = PreferenceManager::in_memory();
/// assert!(prefs.get(keys::KEEP_WINDOWS_ON_TOP));
///
/// prefs.set(keys::KEEP_WINDOWS_ON_TOP, false).unwrap();
/// assert!(!prefs.get(keys::KEEP_WINDOWS_ON_TOP));
/// ```
pub struct PreferenceManager {
    backend: Box<dyn PreferenceBackend>,
    defaults: RwLock<Map<String, Value>>,
    /// Transformer for shortcut data, set by the binder. `None` uses the
    /// built-in archive.
    shortcut_transformer: RwLock<Option<Arc<dyn ValueTransformer>>>,
}

impl PreferenceManager {
    /// Wrap a backend and register the defaults of every declared key.
    pub fn new<B: PreferenceBackend + 'static>(backend: B) -> Self {
        let manager = Self {
            backend: Box::new(backend),
            defaults: RwLock::new(Map::new()),
            shortcut_transformer: RwLock::new(None),
        };
        manager.register_defaults(default_preferences());
        manager
    }

    /// Store backed by memory only.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Store persisted to the JSON file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> CuImageResult<Self> {
        Ok(Self::new(JsonFileBackend::open(path)?))
    }

    /// Merge defaults into the registration table. Later registrations win.
    ///
    /// Defaults are never persisted.
    pub fn register_defaults<I>(&self, defaults: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut table = self.defaults.write();
        for (name, value) in defaults {
            table.insert(name, value);
        }
        log::debug!("[PREFERENCES] {} defaults registered", table.len());
    }

    /// Read a value of the key's kind.
    pub fn get<T: PreferenceValue>(&self, key: PreferenceKey<T>) -> T {
        if let Some(stored) = self.backend.value(key.name()) {
            match T::from_stored_in(&stored, self) {
                Some(value) => return value,
                None if !T::DEFAULT_ON_MISMATCH => {
                    log::debug!("[PREFERENCES] get({}) does not decode, using zero value", key);
                    return T::default();
                },
                None => {},
            }
        }

        let default = self.defaults.read().get(key.name()).cloned();
        default
            .and_then(|value| T::from_stored_in(&value, self))
            .unwrap_or_default()
    }

    /// Persist a value immediately.
    ///
    /// Only writable kinds are accepted. Shortcuts are written by the
    /// shortcut binder, so this does not compile:
    ///
    /// ```compile_fail
    /// use cuimage_lib::preferences::{keys, PreferenceManager};
    /// use cuimage_lib::shortcut::Shortcut;
    ///
    /// let prefs = PreferenceManager::in_memory();
    /// prefs.set(keys::UPLOAD_IMAGE_SHORTCUT, Shortcut::default()).unwrap();
    /// ```
    pub fn set<T: WritablePreference>(&self, key: PreferenceKey<T>, value: T) -> CuImageResult<()> {
        self.set_raw_value(key.name(), value.into_stored())
    }

    /// Drop the persisted value so the default applies again.
    pub fn remove<T>(&self, key: PreferenceKey<T>) -> CuImageResult<()> {
        log::debug!("[PREFERENCES] remove({})", key);
        self.backend.remove_value(key.name())
    }

    /// Whether a value has been persisted for the key (defaults excluded).
    pub fn has_stored_value<T>(&self, key: PreferenceKey<T>) -> bool {
        self.backend.value(key.name()).is_some()
    }

    /// Decode shortcut data through `transformer` from now on.
    pub(crate) fn set_shortcut_transformer(&self, transformer: Arc<dyn ValueTransformer>) {
        *self.shortcut_transformer.write() = Some(transformer);
    }

    /// The transformer shortcut data is read through.
    pub(crate) fn shortcut_transformer(&self) -> Option<Arc<dyn ValueTransformer>> {
        self.shortcut_transformer
            .read()
            .clone()
            .or_else(|| value_transformer(KEYED_UNARCHIVE_FROM_DATA))
    }

    pub(crate) fn set_raw_value(&self, name: &str, value: Value) -> CuImageResult<()> {
        if value.is_null() {
            log::debug!("[PREFERENCES] set({}) to null, removing", name);
            return self.backend.remove_value(name);
        }
        log::debug!("[PREFERENCES] set({})", name);
        self.backend.set_value(name, value)
    }
}

impl std::fmt::Debug for PreferenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceManager")
            .field("defaults", &self.defaults.read().len())
            .finish_non_exhaustive()
    }
}
