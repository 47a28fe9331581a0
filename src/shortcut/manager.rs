//! Application shortcut wiring.

use super::binder::{BindingOptions, HotkeyBackend, ShortcutAction, ShortcutBinder};
use super::descriptor::Shortcut;
use super::transformer::KEYED_UNARCHIVE_FROM_DATA;
use crate::error::CuImageResult;
use crate::preferences::keys::UPLOAD_IMAGE_SHORTCUT;
use crate::preferences::PreferenceManager;

/// Owns the binder once the app's shortcuts are bound.
///
/// The only constructors are the `init` functions, so holding a
/// `ShortcutManager` means the upload shortcut has been bound. There is no
/// way back to the unbound state.
pub struct ShortcutManager<B: HotkeyBackend> {
    binder: ShortcutBinder<B>,
}

impl<B: HotkeyBackend> ShortcutManager<B> {
    /// Bind the upload shortcut using the built-in archive transformer.
    pub fn init(
        preferences: &PreferenceManager,
        backend: B,
        upload_image: ShortcutAction,
    ) -> CuImageResult<Self> {
        Self::init_with_transformer(KEYED_UNARCHIVE_FROM_DATA, preferences, backend, upload_image)
    }

    /// Bind the upload shortcut, persisting shortcuts through the transformer
    /// registered as `transformer_name`.
    ///
    /// A missing transformer is a configuration error. A hotkey the system
    /// refuses (for instance one taken by another app) is logged and left
    /// inactive.
    pub fn init_with_transformer(
        transformer_name: &str,
        preferences: &PreferenceManager,
        backend: B,
        upload_image: ShortcutAction,
    ) -> CuImageResult<Self> {
        let options = BindingOptions::with_transformer_named(transformer_name)?;

        let binder = ShortcutBinder::new(backend);
        binder.set_binding_options(options);

        if let Err(e) = binder.bind_shortcut(preferences, UPLOAD_IMAGE_SHORTCUT, upload_image) {
            log::warn!("[SHORTCUT] Upload shortcut is inactive: {}", e);
        }

        Ok(Self { binder })
    }

    pub fn binder(&self) -> &ShortcutBinder<B> {
        &self.binder
    }

    /// Change the upload shortcut, persisting it and re-registering.
    pub fn record_upload_shortcut(
        &self,
        preferences: &PreferenceManager,
        shortcut: Shortcut,
    ) -> CuImageResult<()> {
        self.binder
            .record_shortcut(preferences, UPLOAD_IMAGE_SHORTCUT, shortcut)
    }

    /// Run the action for a fired hotkey id.
    pub fn dispatch(&self, hotkey_id: u32) -> bool {
        self.binder.dispatch(hotkey_id)
    }
}
