//! Upload hosts and their stored settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CuImageError;

/// Hosts images can be uploaded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedHost {
    #[default]
    Qiniu,
}

impl SupportedHost {
    /// Raw value stored under `currentHost`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedHost::Qiniu => "qiniu",
        }
    }
}

impl fmt::Display for SupportedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedHost {
    type Err = CuImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qiniu" => Ok(SupportedHost::Qiniu),
            other => Err(CuImageError::Config(format!("unsupported host: {}", other))),
        }
    }
}

/// Account settings for the Qiniu object store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QiniuHostInfo {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub domain: String,
}

impl QiniuHostInfo {
    /// The record as stored under `qiniuHostInfo`.
    pub fn dictionary(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Rebuild from a stored record. Missing fields take their defaults.
    pub fn from_dictionary(dictionary: &Map<String, Value>) -> Option<Self> {
        serde_json::from_value(Value::Object(dictionary.clone())).ok()
    }

    /// Whether enough is filled in to attempt an upload.
    pub fn is_configured(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty() && !self.bucket.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_raw_values() {
        assert_eq!(SupportedHost::Qiniu.as_str(), "qiniu");
        assert_eq!("qiniu".parse::<SupportedHost>().unwrap(), SupportedHost::Qiniu);
        assert!("imgur".parse::<SupportedHost>().is_err());
        assert_eq!(serde_json::to_value(SupportedHost::Qiniu).unwrap(), json!("qiniu"));
    }

    #[test]
    fn test_default_dictionary() {
        let dictionary = QiniuHostInfo::default().dictionary();
        assert_eq!(
            Value::Object(dictionary),
            json!({ "accessKey": "", "secretKey": "", "bucket": "", "domain": "" })
        );
    }

    #[test]
    fn test_from_partial_dictionary() {
        let stored = json!({ "bucket": "screenshots", "domain": "img.example.com" });
        let info = QiniuHostInfo::from_dictionary(stored.as_object().unwrap()).unwrap();
        assert_eq!(info.bucket, "screenshots");
        assert_eq!(info.domain, "img.example.com");
        assert!(info.access_key.is_empty());
        assert!(!info.is_configured());
    }
}
