//! Typed preference identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A named handle into the preference store, tagged with the kind of value
/// it holds.
///
/// The name must be unique across all declared keys. `T` only selects which
/// accessor applies; it never constrains what is physically stored.
pub struct PreferenceKey<T> {
    name: &'static str,
    kind: PhantomData<fn() -> T>,
}

impl<T> PreferenceKey<T> {
    /// Declare a key. Intended for `const` items.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            kind: PhantomData,
        }
    }

    /// The raw name used in the backing store.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: derives would demand the same traits of `T`.

impl<T> Clone for PreferenceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PreferenceKey<T> {}

impl<T> PartialEq for PreferenceKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for PreferenceKey<T> {}

impl<T> Hash for PreferenceKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for PreferenceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreferenceKey").field(&self.name).finish()
    }
}

impl<T> fmt::Display for PreferenceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct NotClone;

    const FLAG: PreferenceKey<bool> = PreferenceKey::new("flag");

    #[test]
    fn test_key_name() {
        assert_eq!(FLAG.name(), "flag");
        assert_eq!(FLAG.to_string(), "flag");
        assert_eq!(format!("{:?}", FLAG), "PreferenceKey(\"flag\")");
    }

    #[test]
    fn test_key_is_copy_for_any_kind() {
        let key: PreferenceKey<NotClone> = PreferenceKey::new("opaque");
        let copy = key;
        assert_eq!(key, copy);
    }

    #[test]
    fn test_key_hashes_by_name() {
        let mut set = HashSet::new();
        set.insert(FLAG);
        set.insert(PreferenceKey::new("flag"));
        set.insert(PreferenceKey::new("other"));
        assert_eq!(set.len(), 2);
    }
}
