//! Per-track configuration input.

use serde::{Deserialize, Serialize};

use crate::attr::AttributeMap;

/// Everything the negotiation layer knows about one track.
///
/// Immutable for the duration of one configuration pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Track mime type.
    pub mime: String,
    /// Whether the caller wants an encoder for this track.
    pub is_encoder: bool,
    /// Generic attribute description of the track format.
    pub attributes: AttributeMap,
}

impl TrackDescriptor {
    /// Describe a decode request.
    pub fn decoder(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            is_encoder: false,
            attributes: AttributeMap::new(),
        }
    }

    /// Describe an encode request.
    pub fn encoder(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            is_encoder: true,
            attributes: AttributeMap::new(),
        }
    }

    /// Builder-style attribute map replacement.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }
}
