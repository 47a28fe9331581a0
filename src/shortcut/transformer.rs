//! Named byte-to-shortcut transformers.
//!
//! Shortcut values are persisted as opaque bytes. Whoever restores or persists
//! them looks the converter up by name in a process-wide registry, so the
//! format can be swapped without touching the preference store.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use super::descriptor::Shortcut;

/// Name of the built-in archive transformer.
pub const KEYED_UNARCHIVE_FROM_DATA: &str = "KeyedUnarchiveFromData";

/// Converts between persisted bytes and shortcuts.
pub trait ValueTransformer: Send + Sync {
    /// Bytes to shortcut. `None` when the bytes are not an archive.
    fn transformed_value(&self, data: &[u8]) -> Option<Shortcut>;

    /// Shortcut to bytes.
    fn reverse_transformed_value(&self, shortcut: &Shortcut) -> Option<Vec<u8>>;
}

/// Built-in transformer using [`Shortcut::data`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortcutArchiveTransformer;

impl ValueTransformer for ShortcutArchiveTransformer {
    fn transformed_value(&self, data: &[u8]) -> Option<Shortcut> {
        Shortcut::from_data(data)
    }

    fn reverse_transformed_value(&self, shortcut: &Shortcut) -> Option<Vec<u8>> {
        Some(shortcut.data())
    }
}

lazy_static! {
    /// Registered transformers by name.
    static ref VALUE_TRANSFORMERS: RwLock<HashMap<String, Arc<dyn ValueTransformer>>> = {
        let mut transformers: HashMap<String, Arc<dyn ValueTransformer>> = HashMap::new();
        transformers.insert(
            KEYED_UNARCHIVE_FROM_DATA.to_string(),
            Arc::new(ShortcutArchiveTransformer),
        );
        RwLock::new(transformers)
    };
}

/// Look up a transformer by name.
pub fn value_transformer(name: &str) -> Option<Arc<dyn ValueTransformer>> {
    VALUE_TRANSFORMERS.read().get(name).cloned()
}

/// Register (or replace) a transformer under `name`.
pub fn set_value_transformer(name: &str, transformer: Arc<dyn ValueTransformer>) {
    log::debug!("[SHORTCUT] Registering value transformer {:?}", name);
    VALUE_TRANSFORMERS
        .write()
        .insert(name.to_string(), transformer);
}
