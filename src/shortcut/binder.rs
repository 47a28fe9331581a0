//! Binds persisted shortcuts to actions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::descriptor::Shortcut;
use super::transformer::{value_transformer, ValueTransformer};
use crate::error::{CuImageError, CuImageResult};
use crate::preferences::value::encode_data;
use crate::preferences::{PreferenceKey, PreferenceManager};

/// Callback run when a bound shortcut fires.
pub type ShortcutAction = Arc<dyn Fn() + Send + Sync>;

/// Registers key combinations with the operating system.
pub trait HotkeyBackend {
    /// Register a shortcut and return the id its events will carry.
    fn register(&mut self, shortcut: &Shortcut) -> CuImageResult<u32>;

    /// Release a registration made by [`HotkeyBackend::register`].
    fn unregister(&mut self, id: u32) -> CuImageResult<()>;
}

/// How the binder persists and restores shortcut values.
#[derive(Clone)]
pub struct BindingOptions {
    transformer_name: String,
    transformer: Arc<dyn ValueTransformer>,
}

impl BindingOptions {
    /// Use the transformer registered under `name`.
    pub fn with_transformer_named(name: &str) -> CuImageResult<Self> {
        let transformer = value_transformer(name).ok_or_else(|| {
            CuImageError::Config(format!("no value transformer registered as {:?}", name))
        })?;
        Ok(Self {
            transformer_name: name.to_string(),
            transformer,
        })
    }

    pub fn transformer_name(&self) -> &str {
        &self.transformer_name
    }
}

impl fmt::Debug for BindingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingOptions")
            .field("transformer_name", &self.transformer_name)
            .finish()
    }
}

struct Binding {
    shortcut: Shortcut,
    /// `None` while the shortcut is empty or its registration failed.
    hotkey_id: Option<u32>,
    action: ShortcutAction,
}

/// Keeps at most one active binding per preference key.
pub struct ShortcutBinder<B: HotkeyBackend> {
    backend: Mutex<B>,
    options: RwLock<Option<BindingOptions>>,
    bindings: RwLock<HashMap<&'static str, Binding>>,
}

impl<B: HotkeyBackend> ShortcutBinder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
            options: RwLock::new(None),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_binding_options(&self, options: BindingOptions) {
        log::debug!(
            "[SHORTCUT] Binding options use transformer {:?}",
            options.transformer_name()
        );
        *self.options.write() = Some(options);
    }

    pub fn binding_options(&self) -> Option<BindingOptions> {
        self.options.read().clone()
    }

    fn required_options(&self) -> CuImageResult<BindingOptions> {
        self.binding_options()
            .ok_or_else(|| CuImageError::Config("shortcut binding options are not set".to_string()))
    }

    /// Bind the shortcut stored under `key` to `action`.
    ///
    /// Replaces any earlier binding of the same key. An empty shortcut is
    /// remembered but nothing is registered. If registration fails the
    /// binding is kept inactive and the error returned.
    ///
    /// Shortcut reads on `preferences` decode through the same transformer
    /// from then on.
    pub fn bind_shortcut(
        &self,
        preferences: &PreferenceManager,
        key: PreferenceKey<Shortcut>,
        action: ShortcutAction,
    ) -> CuImageResult<()> {
        let options = self.required_options()?;
        preferences.set_shortcut_transformer(Arc::clone(&options.transformer));
        let shortcut = preferences.get(key);

        self.install(key.name(), shortcut, action)
    }

    /// Persist a new shortcut for `key` and re-bind it if bound.
    ///
    /// This is the only write path for shortcut preferences.
    pub fn record_shortcut(
        &self,
        preferences: &PreferenceManager,
        key: PreferenceKey<Shortcut>,
        shortcut: Shortcut,
    ) -> CuImageResult<()> {
        let options = self.required_options()?;
        let data = options
            .transformer
            .reverse_transformed_value(&shortcut)
            .ok_or_else(|| {
                CuImageError::Encoding(format!("cannot archive shortcut {}", shortcut))
            })?;
        preferences.set_shortcut_transformer(Arc::clone(&options.transformer));
        preferences.set_raw_value(key.name(), encode_data(&data))?;
        log::info!("[SHORTCUT] {} recorded as {}", key, shortcut);

        let action = self
            .bindings
            .read()
            .get(key.name())
            .map(|binding| binding.action.clone());
        match action {
            Some(action) => self.install(key.name(), shortcut, action),
            None => Ok(()),
        }
    }

    fn install(
        &self,
        name: &'static str,
        shortcut: Shortcut,
        action: ShortcutAction,
    ) -> CuImageResult<()> {
        let mut bindings = self.bindings.write();
        let mut backend = self.backend.lock();

        if let Some(previous) = bindings.remove(name) {
            if let Some(id) = previous.hotkey_id {
                if let Err(e) = backend.unregister(id) {
                    log::warn!(
                        "[SHORTCUT] Failed to release {} for {}: {}",
                        previous.shortcut,
                        name,
                        e
                    );
                }
            }
        }

        let (hotkey_id, result) = if shortcut.is_empty() {
            log::info!("[SHORTCUT] {} has no shortcut, nothing registered", name);
            (None, Ok(()))
        } else {
            match backend.register(&shortcut) {
                Ok(id) => {
                    log::info!("[SHORTCUT] Bound {} to {}", shortcut, name);
                    (Some(id), Ok(()))
                },
                Err(e) => {
                    log::warn!(
                        "[SHORTCUT] Failed to register {} for {}: {}",
                        shortcut,
                        name,
                        e
                    );
                    (None, Err(e))
                },
            }
        };

        bindings.insert(
            name,
            Binding {
                shortcut,
                hotkey_id,
                action,
            },
        );
        result
    }

    /// Run the action bound to a fired hotkey. Returns whether one matched.
    pub fn dispatch(&self, hotkey_id: u32) -> bool {
        let action = self
            .bindings
            .read()
            .values()
            .find(|binding| binding.hotkey_id == Some(hotkey_id))
            .map(|binding| binding.action.clone());

        match action {
            Some(action) => {
                action();
                true
            },
            None => {
                log::debug!("[SHORTCUT] No binding for hotkey id {}", hotkey_id);
                false
            },
        }
    }

    /// Number of bindings with a live registration.
    pub fn binding_count(&self) -> usize {
        self.bindings
            .read()
            .values()
            .filter(|binding| binding.hotkey_id.is_some())
            .count()
    }

    /// Whether `key` has a binding with a live registration.
    pub fn is_bound(&self, key: PreferenceKey<Shortcut>) -> bool {
        self.hotkey_id_for(key).is_some()
    }

    pub fn shortcut_for(&self, key: PreferenceKey<Shortcut>) -> Option<Shortcut> {
        self.bindings
            .read()
            .get(key.name())
            .map(|binding| binding.shortcut.clone())
    }

    pub fn hotkey_id_for(&self, key: PreferenceKey<Shortcut>) -> Option<u32> {
        self.bindings
            .read()
            .get(key.name())
            .and_then(|binding| binding.hotkey_id)
    }
}
