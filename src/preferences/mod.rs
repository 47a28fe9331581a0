//! Typed preference store.
//!
//! ## Architecture
//!
//! ```text
//! mod.rs (public API)
//!   |
//!   +-- key.rs (PreferenceKey<T>)
//!   +-- keys.rs (declared keys + default table)
//!   +-- value.rs (PreferenceValue / WritablePreference kinds)
//!   +-- manager.rs (PreferenceManager: typed get/set)
//!   +-- backend.rs (PreferenceBackend trait, MemoryBackend)
//!   +-- file.rs (JsonFileBackend)
//!   +-- tests.rs (unit tests)
//! ```
//!
//! A key's type parameter picks the accessor. Writing requires
//! [`WritablePreference`], which the shortcut kind deliberately lacks: its
//! bytes belong to the shortcut binder's value transformer.

pub mod backend;
pub mod file;
pub mod key;
pub mod keys;
pub mod manager;
pub mod value;

pub use backend::{MemoryBackend, PreferenceBackend};
pub use file::JsonFileBackend;
pub use key::PreferenceKey;
pub use manager::PreferenceManager;
pub use value::{PreferenceValue, WritablePreference};
