//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`MetaMap`] - Insertion-ordered mapping that makes up a metadata document
//! - [`MetaValue`] - A scalar string or a nested [`MetaMap`]
//! - [`Oid`] - Git object identifier (SHA)
//!
//! # Ordering
//!
//! Key order in a [`MetaMap`] is the order of first insertion. Re-inserting
//! an existing key replaces its value in place, so the document keeps its
//! original field order no matter how often a field is overwritten.
//!
//! # Examples
//!
//! ```
//! use testmeta::core::types::{MetaMap, MetaValue};
//!
//! let mut distro = MetaMap::new();
//! distro.insert("id", "poky");
//! distro.insert("version_id", "5.0");
//!
//! let mut doc = MetaMap::new();
//! doc.insert("hostname", "builder-01");
//! doc.insert("distro", distro);
//!
//! assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["hostname", "distro"]);
//! assert_eq!(doc.get_str("hostname"), Some("builder-01"));
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A value in a metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// A leaf string value.
    Scalar(String),
    /// A nested mapping.
    Map(MetaMap),
}

impl MetaValue {
    /// Get the scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Scalar(s) => Some(s),
            MetaValue::Map(_) => None,
        }
    }

    /// Get the nested mapping, if this is a mapping.
    pub fn as_map(&self) -> Option<&MetaMap> {
        match self {
            MetaValue::Scalar(_) => None,
            MetaValue::Map(m) => Some(m),
        }
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Scalar(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Scalar(value.to_string())
    }
}

impl From<usize> for MetaValue {
    fn from(value: usize) -> Self {
        MetaValue::Scalar(value.to_string())
    }
}

impl From<MetaMap> for MetaValue {
    fn from(value: MetaMap) -> Self {
        MetaValue::Map(value)
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetaValue::Scalar(s) => serializer.serialize_str(s),
            MetaValue::Map(m) => m.serialize(serializer),
        }
    }
}

/// An insertion-ordered string-keyed mapping.
///
/// Documents are small (tens of keys), so lookups are linear scans over a
/// `Vec` rather than a hashed index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaMap {
    entries: Vec<(String, MetaValue)>,
}

impl MetaMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    ///
    /// An existing key keeps its position; only its value changes.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a scalar value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    /// Look up a nested mapping by key.
    pub fn get_map(&self, key: &str) -> Option<&MetaMap> {
        self.get(key).and_then(MetaValue::as_map)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for MetaMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MetaMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<'a> IntoIterator for &'a MetaMap {
    type Item = (&'a str, &'a MetaValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a MetaValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for MetaMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use testmeta::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get the full hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(format!(
                "contains non-hex characters: {}",
                oid
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod meta_map {
        use super::*;

        #[test]
        fn preserves_insertion_order() {
            let mut map = MetaMap::new();
            map.insert("zeta", "1");
            map.insert("alpha", "2");
            map.insert("mid", "3");
            assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        }

        #[test]
        fn reinsert_keeps_position_and_replaces_value() {
            let mut map = MetaMap::new();
            map.insert("a", "1");
            map.insert("b", "2");
            let old = map.insert("a", "3");

            assert_eq!(old, Some(MetaValue::from("1")));
            assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
            assert_eq!(map.get_str("a"), Some("3"));
        }

        #[test]
        fn nested_lookup() {
            let mut inner = MetaMap::new();
            inner.insert("commit", "abc");
            let mut outer = MetaMap::new();
            outer.insert("meta", inner);

            assert_eq!(outer.get_map("meta").unwrap().get_str("commit"), Some("abc"));
            assert!(outer.get_str("meta").is_none());
        }

        #[test]
        fn json_keeps_order() {
            let map: MetaMap = vec![("z", "1"), ("a", "2")].into_iter().collect();
            let json = serde_json::to_string(&map).unwrap();
            assert_eq!(json, r#"{"z":"1","a":"2"}"#);
        }

        #[test]
        fn usize_becomes_decimal_scalar() {
            assert_eq!(MetaValue::from(42usize).as_str(), Some("42"));
        }
    }

    mod oid {
        use super::*;

        #[test]
        fn valid_sha1() {
            assert!(Oid::new("abc123def4567890abc123def4567890abc12345").is_ok());
        }

        #[test]
        fn valid_sha256() {
            let sha256 = "a".repeat(64);
            assert!(Oid::new(sha256).is_ok());
        }

        #[test]
        fn invalid_length() {
            assert!(Oid::new("abc123").is_err());
        }

        #[test]
        fn invalid_chars() {
            assert!(Oid::new("ghijklmnopqrstuvwxyz1234567890123456789a").is_err());
        }
    }
}
