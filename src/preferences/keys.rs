//! Declared preference keys and their defaults.

use serde_json::{Map, Value};

use super::key::PreferenceKey;
use super::value::encode_data;
use crate::hosts::{QiniuHostInfo, SupportedHost};
use crate::shortcut::Shortcut;

// General
pub const LAUNCH_AT_LOGIN: PreferenceKey<bool> = PreferenceKey::new("launchAtLogin");
pub const KEEP_WINDOWS_ON_TOP: PreferenceKey<bool> = PreferenceKey::new("keepWindowsOnTop");

// Shortcuts
pub const UPLOAD_IMAGE_SHORTCUT: PreferenceKey<Shortcut> =
    PreferenceKey::new("uploadImageShortcut");

// Hosts
pub const CURRENT_HOST: PreferenceKey<String> = PreferenceKey::new("currentHost");
pub const QINIU_HOST_INFO: PreferenceKey<Map<String, Value>> =
    PreferenceKey::new("qiniuHostInfo");

/// Names of every declared key.
pub const DECLARED_KEYS: &[&str] = &[
    LAUNCH_AT_LOGIN.name(),
    KEEP_WINDOWS_ON_TOP.name(),
    UPLOAD_IMAGE_SHORTCUT.name(),
    CURRENT_HOST.name(),
    QINIU_HOST_INFO.name(),
];

/// Default value for every declared key, in stored form.
pub fn default_preferences() -> Map<String, Value> {
    let mut defaults = Map::new();

    // General
    defaults.insert(LAUNCH_AT_LOGIN.name().to_string(), Value::Bool(false));
    defaults.insert(KEEP_WINDOWS_ON_TOP.name().to_string(), Value::Bool(true));

    // Shortcuts
    defaults.insert(
        UPLOAD_IMAGE_SHORTCUT.name().to_string(),
        encode_data(&Shortcut::upload_image_default().data()),
    );

    // Hosts
    defaults.insert(
        CURRENT_HOST.name().to_string(),
        Value::String(SupportedHost::Qiniu.as_str().to_string()),
    );
    defaults.insert(
        QINIU_HOST_INFO.name().to_string(),
        Value::Object(QiniuHostInfo::default().dictionary()),
    );

    defaults
}
