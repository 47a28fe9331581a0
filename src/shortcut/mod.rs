//! Global shortcut binding.
//!
//! - `descriptor`: the `Shortcut` key-combination type
//! - `transformer`: named byte-to-shortcut converters
//! - `binder`: one binding per preference key, dispatch by hotkey id
//! - `manager`: binds the app's upload shortcut at startup
//! - `hotkey`: the `global-hotkey` backend and event pump

pub mod binder;
pub mod descriptor;
pub mod hotkey;
pub mod manager;
#[cfg(test)]
pub(crate) mod test_support;
pub mod transformer;

pub use binder::{BindingOptions, HotkeyBackend, ShortcutAction, ShortcutBinder};
pub use descriptor::{Modifier, Shortcut};
pub use hotkey::{pump_events, GlobalHotkeyBackend};
pub use manager::ShortcutManager;
pub use transformer::{
    set_value_transformer, value_transformer, ShortcutArchiveTransformer, ValueTransformer,
    KEYED_UNARCHIVE_FROM_DATA,
};
