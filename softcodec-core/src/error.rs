//! Error types for the softcodec configuration layer.
//!
//! Two levels exist: [`StoreError`] is the opaque status a codec node
//! reports from a get/set call, and [`ConfigError`] is the taxonomy this
//! layer surfaces to its caller. A store failure aborts the current
//! marshalling routine and bubbles up unchanged.

use thiserror::Error;

use crate::attr::ValueKind;

/// Main error type for configuration and marshalling routines.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required attribute is absent from the attribute map.
    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// An attribute is present but carries the wrong value kind.
    #[error("attribute {key} has wrong kind, expected {expected}")]
    TypeMismatch {
        /// Attribute name as it appears in the map.
        key: String,
        /// The kind the schema or routine declared for this attribute.
        expected: ValueKind,
    },

    /// Unrecognized mime type or sub-variant on a path that requires
    /// resolution.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The requested operation is not provided by this layer (e.g. an
    /// encode request on a decode-only family).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The codec node rejected a get/set call.
    #[error("codec node store failure: {0}")]
    Store(#[from] StoreError),
}

/// Status reported by a codec node for a parameter get/set call.
///
/// These are passed through opaquely; this layer never retries a store
/// failure except for the documented raw-PCM bit-depth downgrade.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StoreError {
    /// The record contents were rejected.
    #[error("invalid argument")]
    InvalidArgument,

    /// The record index is not recognized by the node.
    #[error("unsupported index")]
    UnsupportedIndex,

    /// The index is recognized but the requested setting is not.
    #[error("unsupported setting")]
    UnsupportedSetting,

    /// Generic store failure with a vendor-specific code.
    #[error("store failure (code {0})")]
    Other(i32),
}

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Create an unsupported-format error.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        ConfigError::UnsupportedFormat(msg.into())
    }

    /// Create an unsupported-operation error.
    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        ConfigError::UnsupportedOperation(msg.into())
    }

    /// Whether this error came from the codec node rather than from
    /// attribute validation.
    #[must_use]
    pub fn is_store(&self) -> bool {
        matches!(self, ConfigError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingAttribute("block-align");
        assert_eq!(err.to_string(), "missing required attribute: block-align");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ConfigError = StoreError::UnsupportedSetting.into();
        assert!(err.is_store());
        assert!(matches!(
            err,
            ConfigError::Store(StoreError::UnsupportedSetting)
        ));
    }
}
