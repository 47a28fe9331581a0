//! Key-combination descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transformer::{value_transformer, KEYED_UNARCHIVE_FROM_DATA};
use crate::error::CuImageError;
use crate::preferences::value::decode_data;
use crate::preferences::{PreferenceManager, PreferenceValue};

/// Modifier keys, in the order they are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Command,
}

impl Modifier {
    fn label(self) -> &'static str {
        match self {
            Modifier::Control => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Command => "Command",
        }
    }

    /// Token understood by the global hotkey parser.
    fn accelerator_token(self) -> &'static str {
        match self {
            Modifier::Control => "control",
            Modifier::Alt => "alt",
            Modifier::Shift => "shift",
            Modifier::Command => "super",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Control),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "cmd" | "command" | "super" | "meta" => Some(Modifier::Command),
            _ => None,
        }
    }
}

/// A global key combination, e.g. Command+Shift+U.
///
/// An empty key means "no shortcut" and is the zero value of the kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Shortcut {
    key: String,
    modifiers: Vec<Modifier>,
}

impl Shortcut {
    /// Build a shortcut. Modifiers are sorted and deduplicated, single-letter
    /// keys are uppercased.
    pub fn new<I>(key: &str, modifiers: I) -> Self
    where
        I: IntoIterator<Item = Modifier>,
    {
        let key = key.trim();
        let key = if key.chars().count() == 1 {
            key.to_uppercase()
        } else {
            key.to_string()
        };

        let mut modifiers: Vec<Modifier> = modifiers.into_iter().collect();
        modifiers.sort();
        modifiers.dedup();

        Self { key, modifiers }
    }

    /// Command+Shift+U, the out-of-the-box upload shortcut.
    pub fn upload_image_default() -> Self {
        Self::new("U", [Modifier::Command, Modifier::Shift])
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Accelerator string for the hotkey library, e.g. `shift+super+U`.
    pub fn accelerator(&self) -> String {
        self.modifiers
            .iter()
            .map(|m| m.accelerator_token())
            .chain(std::iter::once(self.key.as_str()))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Archived form, as written by the built-in value transformer.
    pub fn data(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Restore from [`Shortcut::data`].
    pub fn from_data(data: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(data)
            .ok()
            .map(|s| Self::new(&s.key, s.modifiers))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Shortcut {
    type Err = CuImageError;

    /// Parse "Command+Shift+U" style descriptions. The last token is the key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key, modifier_tokens)) = tokens.split_last() else {
            return Err(CuImageError::Config("empty shortcut".to_string()));
        };
        if key.is_empty() {
            return Err(CuImageError::Config(format!("shortcut has no key: {:?}", s)));
        }

        let modifiers = modifier_tokens
            .iter()
            .map(|token| {
                Modifier::parse(token).ok_or_else(|| {
                    CuImageError::Config(format!("unknown modifier {:?} in {:?}", token, s))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(key, modifiers))
    }
}

/// Read-only kind, decoded through a registered value transformer.
///
/// Data that does not decode reads as the empty shortcut rather than the
/// default, so the accessor agrees with what the binder registers.
impl PreferenceValue for Shortcut {
    const DEFAULT_ON_MISMATCH: bool = false;

    fn from_stored(value: &Value) -> Option<Self> {
        let data = decode_data(value)?;
        value_transformer(KEYED_UNARCHIVE_FROM_DATA)?.transformed_value(&data)
    }

    /// Uses the transformer the binder configured for `preferences`.
    fn from_stored_in(value: &Value, preferences: &PreferenceManager) -> Option<Self> {
        let data = decode_data(value)?;
        preferences.shortcut_transformer()?.transformed_value(&data)
    }
}
