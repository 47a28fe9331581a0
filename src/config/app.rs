//! Startup configuration.
//!
//! Holds the settings that are fixed for the life of the process:
//! - Where preferences and logs live
//! - Upload image processing (compression factor, thumbnail bound)
//!
//! User-editable settings belong in the preference store instead.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::preferences::JsonFileBackend;

pub const ENV_PREFERENCES: &str = "CUIMAGE_PREFERENCES";
pub const ENV_LOG_DIR: &str = "CUIMAGE_LOG_DIR";
pub const ENV_COMPRESSION: &str = "CUIMAGE_COMPRESSION";
pub const ENV_THUMBNAIL_SIZE: &str = "CUIMAGE_THUMBNAIL_SIZE";

/// Process-wide settings read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Preference file location.
    pub preferences_path: PathBuf,
    /// Directory for daily log files. `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    /// JPEG compression factor for uploads, 0.0 (smallest) to 1.0 (best).
    pub compression_factor: f32,
    /// Largest thumbnail side in pixels.
    pub thumbnail_max_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preferences_path: JsonFileBackend::default_path(),
            log_dir: None,
            compression_factor: 0.8,
            thumbnail_max_size: 200.0,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `CUIMAGE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    ///
    /// Values that do not parse are logged and skipped.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_PREFERENCES).filter(|v| !v.trim().is_empty()) {
            config.preferences_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(factor) = parse_var(&lookup, ENV_COMPRESSION) {
            config.compression_factor = factor;
        }
        if let Some(size) = parse_var(&lookup, ENV_THUMBNAIL_SIZE) {
            config.thumbnail_max_size = size;
        }

        log::debug!("[APP_CONFIG] {:?}", config);
        config
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("[APP_CONFIG] Ignoring {}={:?}: {}", name, raw, e);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.compression_factor, 0.8);
        assert_eq!(config.thumbnail_max_size, 200.0);
        assert!(config.log_dir.is_none());
        assert!(config.preferences_path.ends_with("preferences.json"));
    }

    #[test]
    fn test_no_variables_gives_defaults() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_PREFERENCES, "/tmp/prefs.json"),
            (ENV_LOG_DIR, "/tmp/logs"),
            (ENV_COMPRESSION, "0.5"),
            (ENV_THUMBNAIL_SIZE, " 64 "),
        ]));

        assert_eq!(config.preferences_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.compression_factor, 0.5);
        assert_eq!(config.thumbnail_max_size, 64.0);
    }

    #[test]
    fn test_unparsable_numbers_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_COMPRESSION, "high"),
            (ENV_THUMBNAIL_SIZE, ""),
        ]));

        assert_eq!(config.compression_factor, 0.8);
        assert_eq!(config.thumbnail_max_size, 200.0);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AppConfig = serde_json::from_str(r#"{"compressionFactor": 0.3}"#).unwrap();
        assert_eq!(config.compression_factor, 0.3);
        assert_eq!(config.thumbnail_max_size, 200.0);
    }
}
