//! Bidirectional translation between internal metadata and attribute maps.
//!
//! Translation is schema-driven: every key present in the schema whose value
//! matches the declared kind is carried across; everything else is silently
//! dropped. Byte blobs travel one way only (metadata to attributes), and the
//! codec-specific-data blob gets split into `csd-0`/`csd-1` segments for the
//! AVC family.

use std::collections::BTreeMap;

use tracing::trace;

use crate::attr::{AttributeMap, Value, ValueKind};
use crate::mime;
use crate::schema::{names, schema, MetadataKey};

/// Internal metadata: a map from stable numeric identifiers to tagged
/// values, as produced by extractors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    values: BTreeMap<MetadataKey, Value>,
}

impl Metadata {
    /// Create an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value, replacing any previous entry.
    pub fn insert(&mut self, key: MetadataKey, value: Value) {
        self.values.insert(key, value);
    }

    /// Set a 32-bit integer entry.
    pub fn set_i32(&mut self, key: MetadataKey, value: i32) {
        self.insert(key, Value::Int32(value));
    }

    /// Set a 64-bit integer entry.
    pub fn set_i64(&mut self, key: MetadataKey, value: i64) {
        self.insert(key, Value::Int64(value));
    }

    /// Set a string entry.
    pub fn set_str(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.insert(key, Value::Str(value.into()));
    }

    /// Set a byte-blob entry.
    pub fn set_bytes(&mut self, key: MetadataKey, value: impl Into<Vec<u8>>) {
        self.insert(key, Value::Bytes(value.into()));
    }

    /// Look up the raw value for a key.
    pub fn get(&self, key: MetadataKey) -> Option<&Value> {
        self.values.get(&key)
    }

    /// Look up a string entry.
    pub fn str(&self, key: MetadataKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(Value::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Translate internal metadata to a generic attribute map.
///
/// Int32/Int64/String entries are carried under their schema names. A
/// `RawCodecData` blob is carried under its own name. A
/// `RawCodecSpecificData` blob turns into `csd-0` (and `csd-1` for the AVC
/// family, see [`split_avc_specific_data`]).
pub fn to_attributes(meta: &Metadata) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    for e in schema().entries() {
        let Some(value) = meta.get(e.key) else {
            continue;
        };
        match (e.kind, value) {
            (ValueKind::Int32, Value::Int32(v)) => attrs.set_i32(e.name, *v),
            (ValueKind::Int64, Value::Int64(v)) => attrs.set_i64(e.name, *v),
            (ValueKind::String, Value::Str(v)) => attrs.set_str(e.name, v.clone()),
            (ValueKind::Bytes, Value::Bytes(v)) => attrs.set_bytes(e.name, v.clone()),
            (ValueKind::CodecSpecific, Value::Bytes(v)) => {
                emit_codec_specific(meta, v, &mut attrs);
            }
            // kind mismatch: the entry is dropped, same as an unknown key
            _ => trace!(name = e.name, "metadata value kind does not match schema"),
        }
    }
    attrs
}

/// Translate a generic attribute map back to internal metadata.
///
/// Only Int32/Int64/String kinds round-trip; byte blobs and the
/// codec-specific-data segments stay on the attribute side. Attribute names
/// not present in the schema are silently dropped.
pub fn to_metadata(attrs: &AttributeMap) -> Metadata {
    let mut meta = Metadata::new();
    for (name, value) in attrs.iter() {
        let Some(e) = schema().by_name(name) else {
            continue;
        };
        match (e.kind, value) {
            (ValueKind::Int32, Value::Int32(v)) => meta.set_i32(e.key, *v),
            (ValueKind::Int64, Value::Int64(v)) => meta.set_i64(e.key, *v),
            (ValueKind::String, Value::Str(v)) => meta.set_str(e.key, v.clone()),
            _ => {}
        }
    }
    meta
}

fn emit_codec_specific(meta: &Metadata, blob: &[u8], attrs: &mut AttributeMap) {
    let is_avc = meta
        .str(MetadataKey::MimeType)
        .is_some_and(|m| mime::eq(m, mime::VIDEO_AVC));

    // Only the AVC family carries a combined sequence+picture header blob.
    // Anything else (and anything too short to contain two headers) passes
    // through verbatim as the first segment.
    if !is_avc || blob.len() < 8 {
        attrs.set_bytes(names::CSD_0, blob.to_vec());
        return;
    }

    let split = split_avc_specific_data(blob);
    attrs.set_bytes(names::CSD_0, blob[..split].to_vec());
    attrs.set_bytes(names::CSD_1, blob[split..].to_vec());
}

/// Locate the boundary between the sequence and picture headers in a
/// combined AVC codec-specific-data blob.
///
/// The blob is scanned for the four-byte start code `00 00 00 01` over the
/// index range `[4, len - 4)`; the LAST match wins. This is a boundary
/// heuristic, not a bitstream parser: picture headers may themselves start
/// with embedded start codes, so an earlier match must not terminate the
/// scan. No match yields 0 (an empty sequence segment).
pub fn split_avc_specific_data(blob: &[u8]) -> usize {
    const START_CODE: [u8; 4] = [0, 0, 0, 1];
    let mut boundary = 0;
    if blob.len() < 8 {
        return boundary;
    }
    for i in 4..blob.len() - 4 {
        if blob[i..i + 4] == START_CODE {
            boundary = i;
        }
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avc_meta(blob: &[u8]) -> Metadata {
        let mut meta = Metadata::new();
        meta.set_str(MetadataKey::MimeType, mime::VIDEO_AVC);
        meta.set_bytes(MetadataKey::RawCodecSpecificData, blob.to_vec());
        meta
    }

    #[test]
    fn test_int_roundtrip() {
        let mut meta = Metadata::new();
        meta.set_i32(MetadataKey::ChannelCount, 6);
        meta.set_i32(MetadataKey::SampleRate, 48_000);
        meta.set_i64(MetadataKey::ThumbnailTime, 33_000);
        meta.set_str(MetadataKey::FileFormat, "video/avi");

        let attrs = to_attributes(&meta);
        assert_eq!(attrs.i32(names::CHANNEL_COUNT), Some(6));
        assert_eq!(attrs.i32(names::SAMPLE_RATE), Some(48_000));
        assert_eq!(attrs.i64(names::THUMBNAIL_TIME), Some(33_000));
        assert_eq!(attrs.str(names::FILE_FORMAT), Some("video/avi"));

        assert_eq!(to_metadata(&attrs), meta);
    }

    #[test]
    fn test_unknown_attribute_dropped() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32("frame-rate", 30);
        assert!(to_metadata(&attrs).is_empty());
    }

    #[test]
    fn test_kind_mismatch_dropped() {
        let mut attrs = AttributeMap::new();
        attrs.set_str(names::CHANNEL_COUNT, "2");
        assert!(to_metadata(&attrs).is_empty());
    }

    #[test]
    fn test_bytes_do_not_roundtrip() {
        let mut meta = Metadata::new();
        meta.set_bytes(MetadataKey::RawCodecData, vec![9, 9, 9]);
        let attrs = to_attributes(&meta);
        assert_eq!(attrs.bytes(names::RAW_CODEC_DATA), Some(&[9u8, 9, 9][..]));
        assert!(to_metadata(&attrs).is_empty());
    }

    #[test]
    fn test_csd_verbatim_for_non_avc() {
        let mut meta = Metadata::new();
        meta.set_str(MetadataKey::MimeType, mime::VIDEO_HEVC);
        meta.set_bytes(MetadataKey::RawCodecSpecificData, vec![1u8; 16]);
        let attrs = to_attributes(&meta);
        assert_eq!(attrs.bytes(names::CSD_0), Some(&[1u8; 16][..]));
        assert_eq!(attrs.bytes(names::CSD_1), None);
    }

    #[test]
    fn test_csd_split_marker_at_4() {
        // 12-byte blob, start code at offset 4, no other marker
        let blob = [0xaa, 0xbb, 0xcc, 0xdd, 0, 0, 0, 1, 0x11, 0x22, 0x33, 0x44];
        let attrs = to_attributes(&avc_meta(&blob));
        assert_eq!(attrs.bytes(names::CSD_0).map(<[u8]>::len), Some(4));
        assert_eq!(attrs.bytes(names::CSD_1).map(<[u8]>::len), Some(8));
        assert_eq!(attrs.bytes(names::CSD_1).unwrap()[..4], [0, 0, 0, 1]);
    }

    #[test]
    fn test_csd_split_last_marker_wins() {
        let mut blob = vec![0u8; 24];
        blob[4..8].copy_from_slice(&[0, 0, 0, 1]);
        blob[16..20].copy_from_slice(&[0, 0, 0, 1]);
        // markers at 4 and 16; the scan must keep the later one
        assert_eq!(split_avc_specific_data(&blob), 16);
    }

    #[test]
    fn test_csd_no_marker_yields_empty_seq() {
        let blob = [0xffu8; 12];
        assert_eq!(split_avc_specific_data(&blob), 0);
        let attrs = to_attributes(&avc_meta(&blob));
        assert_eq!(attrs.bytes(names::CSD_0).map(<[u8]>::len), Some(0));
        assert_eq!(attrs.bytes(names::CSD_1).map(<[u8]>::len), Some(12));
    }

    #[test]
    fn test_csd_marker_out_of_bounds_ignored() {
        // marker begins at len-4: outside the scanned range
        let blob = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 1];
        assert_eq!(split_avc_specific_data(&blob), 0);
    }

    #[test]
    fn test_csd_short_blob_passes_verbatim() {
        let blob = [0u8, 0, 0, 1, 2];
        let attrs = to_attributes(&avc_meta(&blob));
        assert_eq!(attrs.bytes(names::CSD_0), Some(&blob[..]));
        assert_eq!(attrs.bytes(names::CSD_1), None);
    }
}
