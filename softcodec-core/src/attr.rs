//! Generic typed key/value description of a media track.
//!
//! An [`AttributeMap`] is produced externally per track, consumed
//! synchronously during one configuration pass, and never persisted.
//! Keys are unique; insertion order is irrelevant.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A tagged attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// UTF-8 string.
    Str(String),
    /// Opaque byte blob.
    Bytes(Vec<u8>),
}

/// Declared kind of an attribute value.
///
/// `Bytes` and `CodecSpecific` exist only for the codec-specific-data blob
/// path and do not round-trip through the attribute map by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// UTF-8 string.
    String,
    /// Opaque byte blob, emitted under its own attribute name.
    Bytes,
    /// Codec-specific-data blob, split into `csd-N` segments.
    CodecSpecific,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => write!(f, "int32"),
            Self::Int64 => write!(f, "int64"),
            Self::String => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
            Self::CodecSpecific => write!(f, "codec-specific-data"),
        }
    }
}

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Str(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }
}

/// Generic typed key/value store for track properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMap {
    values: HashMap<String, Value>,
}

impl AttributeMap {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value, replacing any previous entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Set a 32-bit integer attribute.
    pub fn set_i32(&mut self, key: impl Into<String>, value: i32) {
        self.insert(key, Value::Int32(value));
    }

    /// Set a 64-bit integer attribute.
    pub fn set_i64(&mut self, key: impl Into<String>, value: i64) {
        self.insert(key, Value::Int64(value));
    }

    /// Set a string attribute.
    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Value::Str(value.into()));
    }

    /// Set a byte-blob attribute.
    pub fn set_bytes(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.insert(key, Value::Bytes(value.into()));
    }

    /// Look up a 32-bit integer. Returns `None` when the key is absent or
    /// carries a different kind.
    pub fn i32(&self, key: &str) -> Option<i32> {
        match self.values.get(key) {
            Some(Value::Int32(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a 64-bit integer.
    pub fn i64(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(Value::Int64(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Look up a byte blob.
    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.values.get(key) {
            Some(Value::Bytes(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Look up the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Require a 32-bit integer attribute.
    ///
    /// Distinguishes an absent key ([`ConfigError::MissingAttribute`]) from
    /// a key that is present with the wrong kind
    /// ([`ConfigError::TypeMismatch`]).
    pub fn require_i32(&self, key: &'static str) -> Result<i32> {
        match self.values.get(key) {
            Some(Value::Int32(v)) => Ok(*v),
            Some(_) => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: ValueKind::Int32,
            }),
            None => Err(ConfigError::MissingAttribute(key)),
        }
    }

    /// Whether the map contains the key, regardless of kind.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of attributes in the map.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32("channel-count", 2);
        attrs.set_i64("thumbnail-time", 1_000_000);
        attrs.set_str("file-format", "video/avi");
        attrs.set_bytes("raw-codec-data", vec![1, 2, 3]);

        assert_eq!(attrs.i32("channel-count"), Some(2));
        assert_eq!(attrs.i64("thumbnail-time"), Some(1_000_000));
        assert_eq!(attrs.str("file-format"), Some("video/avi"));
        assert_eq!(attrs.bytes("raw-codec-data"), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_wrong_kind_returns_none() {
        let mut attrs = AttributeMap::new();
        attrs.set_str("channel-count", "two");
        assert_eq!(attrs.i32("channel-count"), None);
    }

    #[test]
    fn test_require_i32_missing() {
        let attrs = AttributeMap::new();
        let err = attrs.require_i32("sample-rate").unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute("sample-rate")));
    }

    #[test]
    fn test_require_i32_type_mismatch() {
        let mut attrs = AttributeMap::new();
        attrs.set_str("sample-rate", "44100");
        let err = attrs.require_i32("sample-rate").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn test_insert_replaces() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32("bitrate", 128_000);
        attrs.set_i32("bitrate", 192_000);
        assert_eq!(attrs.i32("bitrate"), Some(192_000));
        assert_eq!(attrs.len(), 1);
    }
}
