//! Value kinds the preference store understands.
//!
//! Values are stored as JSON. Each kind knows how to read itself back out of
//! a stored value (with the same lenient coercions a settings store usually
//! applies) and, if it is writable, how to turn itself into one.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Number, Value};
use url::Url;

use super::manager::PreferenceManager;

/// A kind that can be read from the preference store.
///
/// `Default` is the kind's zero value, returned when nothing usable is
/// stored and no default is registered.
pub trait PreferenceValue: Default + Sized {
    /// Whether a persisted value that does not decode falls back to the
    /// registered default. When `false` it reads as the zero value instead.
    const DEFAULT_ON_MISMATCH: bool = true;

    /// Decode a stored value. `None` means the stored value is not of this kind.
    fn from_stored(value: &Value) -> Option<Self>;

    /// Decode a value read from `preferences`. Kinds whose encoding depends on
    /// store settings override this.
    fn from_stored_in(value: &Value, _preferences: &PreferenceManager) -> Option<Self> {
        Self::from_stored(value)
    }
}

/// A kind that can also be written through the preference store.
///
/// Kinds whose serialization belongs to someone else (shortcuts) implement
/// only [`PreferenceValue`], which makes `set` on their keys a type error.
pub trait WritablePreference: PreferenceValue {
    /// Encode for storage. `Value::Null` removes the stored entry.
    fn into_stored(self) -> Value;
}

/// Decode a base64 blob.
pub(crate) fn decode_data(value: &Value) -> Option<Vec<u8>> {
    STANDARD.decode(value.as_str()?).ok()
}

/// Encode a blob as base64.
pub(crate) fn encode_data(data: &[u8]) -> Value {
    Value::String(STANDARD.encode(data))
}

impl PreferenceValue for bool {
    fn from_stored(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl WritablePreference for bool {
    fn into_stored(self) -> Value {
        Value::Bool(self)
    }
}

impl PreferenceValue for i64 {
    fn from_stored(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }
}

impl WritablePreference for i64 {
    fn into_stored(self) -> Value {
        Value::Number(self.into())
    }
}

impl PreferenceValue for f64 {
    fn from_stored(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl WritablePreference for f64 {
    /// Non-finite numbers have no JSON form and clear the entry.
    fn into_stored(self) -> Value {
        Number::from_f64(self).map_or(Value::Null, Value::Number)
    }
}

impl PreferenceValue for f32 {
    fn from_stored(value: &Value) -> Option<Self> {
        f64::from_stored(value).map(|f| f as f32)
    }
}

impl WritablePreference for f32 {
    fn into_stored(self) -> Value {
        f64::from(self).into_stored()
    }
}

impl PreferenceValue for String {
    fn from_stored(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl WritablePreference for String {
    fn into_stored(self) -> Value {
        Value::String(self)
    }
}

impl PreferenceValue for Vec<u8> {
    fn from_stored(value: &Value) -> Option<Self> {
        decode_data(value)
    }
}

impl WritablePreference for Vec<u8> {
    fn into_stored(self) -> Value {
        encode_data(&self)
    }
}

impl PreferenceValue for Option<Url> {
    fn from_stored(value: &Value) -> Option<Self> {
        Url::parse(value.as_str()?).ok().map(Some)
    }
}

impl WritablePreference for Option<Url> {
    fn into_stored(self) -> Value {
        self.map_or(Value::Null, |url| Value::String(url.into()))
    }
}

impl PreferenceValue for Vec<Value> {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

impl WritablePreference for Vec<Value> {
    fn into_stored(self) -> Value {
        Value::Array(self)
    }
}

impl PreferenceValue for Vec<String> {
    fn from_stored(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }
}

impl WritablePreference for Vec<String> {
    fn into_stored(self) -> Value {
        Value::Array(self.into_iter().map(Value::String).collect())
    }
}

impl PreferenceValue for Map<String, Value> {
    fn from_stored(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl WritablePreference for Map<String, Value> {
    fn into_stored(self) -> Value {
        Value::Object(self)
    }
}

/// The untyped kind: whatever is stored, as-is.
impl PreferenceValue for Value {
    fn from_stored(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl WritablePreference for Value {
    fn into_stored(self) -> Value {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_coercions() {
        assert_eq!(bool::from_stored(&json!(true)), Some(true));
        assert_eq!(bool::from_stored(&json!(0)), Some(false));
        assert_eq!(bool::from_stored(&json!(2.5)), Some(true));
        assert_eq!(bool::from_stored(&json!("YES")), Some(true));
        assert_eq!(bool::from_stored(&json!("no")), Some(false));
        assert_eq!(bool::from_stored(&json!("maybe")), None);
        assert_eq!(bool::from_stored(&json!([true])), None);
    }

    #[test]
    fn test_integer_coercions() {
        assert_eq!(i64::from_stored(&json!(42)), Some(42));
        assert_eq!(i64::from_stored(&json!(3.9)), Some(3));
        assert_eq!(i64::from_stored(&json!(" 17 ")), Some(17));
        assert_eq!(i64::from_stored(&json!("8.2")), Some(8));
        assert_eq!(i64::from_stored(&json!(true)), Some(1));
        assert_eq!(i64::from_stored(&json!("eight")), None);
    }

    #[test]
    fn test_float_coercions() {
        assert_eq!(f64::from_stored(&json!(0.25)), Some(0.25));
        assert_eq!(f64::from_stored(&json!("1.5")), Some(1.5));
        assert_eq!(f32::from_stored(&json!(2)), Some(2.0));
        assert_eq!(f64::NAN.into_stored(), Value::Null);
    }

    #[test]
    fn test_string_coercions() {
        assert_eq!(String::from_stored(&json!("qiniu")).as_deref(), Some("qiniu"));
        assert_eq!(String::from_stored(&json!(12)).as_deref(), Some("12"));
        assert_eq!(String::from_stored(&json!(false)).as_deref(), Some("false"));
        assert_eq!(String::from_stored(&json!({"a": 1})), None);
    }

    #[test]
    fn test_blob_is_base64() {
        let stored = vec![0u8, 1, 2, 254, 255].into_stored();
        assert_eq!(stored, json!("AAEC/v8="));
        assert_eq!(Vec::<u8>::from_stored(&stored), Some(vec![0, 1, 2, 254, 255]));
        assert_eq!(Vec::<u8>::from_stored(&json!("%%%")), None);
    }

    #[test]
    fn test_url_kind() {
        let url = Url::parse("https://example.com/upload").unwrap();
        let stored = Some(url.clone()).into_stored();
        assert_eq!(stored, json!("https://example.com/upload"));
        assert_eq!(Option::<Url>::from_stored(&stored), Some(Some(url)));
        assert_eq!(Option::<Url>::from_stored(&json!("not a url")), None);
        assert_eq!(None::<Url>.into_stored(), Value::Null);
    }

    #[test]
    fn test_string_list_requires_strings() {
        assert_eq!(
            Vec::<String>::from_stored(&json!(["a", "b"])),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Vec::<String>::from_stored(&json!(["a", 1])), None);
        assert_eq!(
            Vec::<Value>::from_stored(&json!(["a", 1])),
            Some(vec![json!("a"), json!(1)])
        );
    }

    #[test]
    fn test_map_kind() {
        let stored = json!({"bucket": "images"});
        let map = Map::<String, Value>::from_stored(&stored).unwrap();
        assert_eq!(map.get("bucket"), Some(&json!("images")));
        assert_eq!(Map::<String, Value>::from_stored(&json!([])), None);
    }
}
