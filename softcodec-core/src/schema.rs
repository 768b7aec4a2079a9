//! Static translation schema between metadata keys and attribute names.
//!
//! The schema is a bijective table: every [`MetadataKey`] maps to exactly
//! one wire-visible attribute name with a declared value kind, and no two
//! keys share a name. The table is validated once at first use; violating
//! the bijection would silently break round-trip translation, so a broken
//! builtin table is a programming error and panics at startup.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::attr::ValueKind;

/// Wire-visible attribute names.
pub mod names {
    /// AAC audio object type.
    pub const AAC_PROFILE: &str = "aac-profile";
    /// Arbitrary frame-packing request for vendor decoders.
    pub const USE_ARBITRARY_MODE: &str = "use-arbitrary-mode";
    /// Bits per raw sample as declared by the extractor.
    pub const BITS_PER_RAW_SAMPLE: &str = "bits-per-raw-sample";
    /// Average bit rate in bits per second.
    pub const BITRATE: &str = "bitrate";
    /// Block alignment in bytes.
    pub const BLOCK_ALIGN: &str = "block-align";
    /// Channel count.
    pub const CHANNEL_COUNT: &str = "channel-count";
    /// Codec identifier for the generic fallback families.
    pub const CODEC_ID: &str = "codec-id";
    /// Coded (container) sample bit depth.
    pub const CODED_SAMPLE_BITS: &str = "coded-sample-bits";
    /// Container identifier the track was extracted from.
    pub const FILE_FORMAT: &str = "file-format";
    /// Track mime type.
    pub const MIME: &str = "mime";
    /// Opaque codec data blob, passed through under its own name.
    pub const RAW_CODEC_DATA: &str = "raw-codec-data";
    /// Codec-specific data blob, split into `csd-N` segments.
    pub const RAW_CODEC_SPECIFIC_DATA: &str = "raw-codec-specific-data";
    /// Requested PCM encoding, see [`crate::format::PcmEncoding`].
    pub const PCM_ENCODING: &str = "pcm-encoding";
    /// RealVideo sub-version.
    pub const RV_VERSION: &str = "rv-version";
    /// Fallback-decoder sample format.
    pub const SAMPLE_FORMAT: &str = "sample-format";
    /// Sample rate in Hz.
    pub const SAMPLE_RATE: &str = "sample-rate";
    /// WMA sub-version.
    pub const WMA_VERSION: &str = "wma-version";
    /// WMV sub-version.
    pub const WMV_VERSION: &str = "wmv-version";
    /// DivX sub-version.
    pub const DIVX_VERSION: &str = "divx-version";
    /// Requested thumbnail timestamp in microseconds.
    pub const THUMBNAIL_TIME: &str = "thumbnail-time";
    /// Secondary block-align key written by some WMA extractors.
    pub const WMA_BLOCK_ALIGN: &str = "wma-block-align";
    /// WMA bit depth override written by some extractors.
    pub const WMA_BITS_PER_SAMPLE: &str = "wma-bits-per-sample";
    /// WMA encode options; absence marks a track the native decoder
    /// cannot handle.
    pub const WMA_ENCODE_OPT: &str = "wma-encode-opt";
    /// First codec-specific-data segment (sequence header).
    pub const CSD_0: &str = "csd-0";
    /// Second codec-specific-data segment (picture header).
    pub const CSD_1: &str = "csd-1";
    /// Thumbnail (sync-frame-only) decode request.
    pub const THUMBNAIL_MODE: &str = "thumbnail-mode";
    /// Frame width in pixels (generic key, not part of the schema table).
    pub const WIDTH: &str = "width";
    /// Frame height in pixels (generic key, not part of the schema table).
    pub const HEIGHT: &str = "height";
    /// User-extradata request flag.
    pub const ENABLE_EXTRADATA_USER: &str = "enable-extradata-user";
}

/// Stable internal metadata identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
    /// AAC audio object type.
    AacProfile,
    /// Arbitrary frame-packing request.
    ArbitraryMode,
    /// Bits per raw sample.
    BitsPerRawSample,
    /// Average bit rate.
    BitRate,
    /// Block alignment.
    BlockAlign,
    /// Channel count.
    ChannelCount,
    /// Fallback codec identifier.
    CodecId,
    /// Coded sample bit depth.
    CodedSampleBits,
    /// Source container identifier.
    FileFormat,
    /// Track mime type.
    MimeType,
    /// Opaque codec data blob.
    RawCodecData,
    /// Codec-specific data blob.
    RawCodecSpecificData,
    /// Requested PCM encoding.
    PcmEncoding,
    /// RealVideo sub-version.
    RvVersion,
    /// Fallback sample format.
    SampleFormat,
    /// Sample rate.
    SampleRate,
    /// WMA sub-version.
    WmaVersion,
    /// WMV sub-version.
    WmvVersion,
    /// DivX sub-version.
    DivxVersion,
    /// Thumbnail timestamp.
    ThumbnailTime,
    /// Secondary WMA block-align.
    WmaBlockAlign,
    /// WMA bit depth override.
    WmaBitsPerSample,
    /// WMA encode options.
    WmaEncodeOpt,
}

/// One schema row: metadata key, wire name, declared kind.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEntry {
    /// Internal metadata identifier.
    pub key: MetadataKey,
    /// Wire-visible attribute name.
    pub name: &'static str,
    /// Declared value kind.
    pub kind: ValueKind,
}

const fn entry(key: MetadataKey, name: &'static str, kind: ValueKind) -> SchemaEntry {
    SchemaEntry { key, name, kind }
}

/// The builtin translation table.
///
/// `file-format` is declared as a string: container identifiers are mime
/// strings and every consumer reads it as one.
pub static ENTRIES: &[SchemaEntry] = &[
    entry(MetadataKey::AacProfile, names::AAC_PROFILE, ValueKind::Int32),
    entry(MetadataKey::ArbitraryMode, names::USE_ARBITRARY_MODE, ValueKind::Int32),
    entry(MetadataKey::BitsPerRawSample, names::BITS_PER_RAW_SAMPLE, ValueKind::Int32),
    entry(MetadataKey::BitRate, names::BITRATE, ValueKind::Int32),
    entry(MetadataKey::BlockAlign, names::BLOCK_ALIGN, ValueKind::Int32),
    entry(MetadataKey::ChannelCount, names::CHANNEL_COUNT, ValueKind::Int32),
    entry(MetadataKey::CodecId, names::CODEC_ID, ValueKind::Int32),
    entry(MetadataKey::CodedSampleBits, names::CODED_SAMPLE_BITS, ValueKind::Int32),
    entry(MetadataKey::FileFormat, names::FILE_FORMAT, ValueKind::String),
    entry(MetadataKey::MimeType, names::MIME, ValueKind::String),
    entry(MetadataKey::RawCodecData, names::RAW_CODEC_DATA, ValueKind::Bytes),
    entry(
        MetadataKey::RawCodecSpecificData,
        names::RAW_CODEC_SPECIFIC_DATA,
        ValueKind::CodecSpecific,
    ),
    entry(MetadataKey::PcmEncoding, names::PCM_ENCODING, ValueKind::Int32),
    entry(MetadataKey::RvVersion, names::RV_VERSION, ValueKind::Int32),
    entry(MetadataKey::SampleFormat, names::SAMPLE_FORMAT, ValueKind::Int32),
    entry(MetadataKey::SampleRate, names::SAMPLE_RATE, ValueKind::Int32),
    entry(MetadataKey::WmaVersion, names::WMA_VERSION, ValueKind::Int32),
    entry(MetadataKey::WmvVersion, names::WMV_VERSION, ValueKind::Int32),
    entry(MetadataKey::DivxVersion, names::DIVX_VERSION, ValueKind::Int32),
    entry(MetadataKey::ThumbnailTime, names::THUMBNAIL_TIME, ValueKind::Int64),
    entry(MetadataKey::WmaBlockAlign, names::WMA_BLOCK_ALIGN, ValueKind::Int32),
    entry(MetadataKey::WmaBitsPerSample, names::WMA_BITS_PER_SAMPLE, ValueKind::Int32),
    entry(MetadataKey::WmaEncodeOpt, names::WMA_ENCODE_OPT, ValueKind::Int32),
];

/// Schema construction failure: the table is not bijective.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two entries share the same metadata key.
    #[error("duplicate metadata key for attribute {0}")]
    DuplicateKey(&'static str),
    /// Two entries share the same attribute name.
    #[error("duplicate attribute name {0}")]
    DuplicateName(&'static str),
}

/// Validated, immutable bijective lookup over the schema table.
#[derive(Debug)]
pub struct TranslationSchema {
    by_key: HashMap<MetadataKey, &'static SchemaEntry>,
    by_name: HashMap<&'static str, &'static SchemaEntry>,
}

impl TranslationSchema {
    /// Build a schema from a static entry table, checking the bijection in
    /// both directions.
    pub fn new(entries: &'static [SchemaEntry]) -> Result<Self, SchemaError> {
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for e in entries {
            if by_key.insert(e.key, e).is_some() {
                return Err(SchemaError::DuplicateKey(e.name));
            }
            if by_name.insert(e.name, e).is_some() {
                return Err(SchemaError::DuplicateName(e.name));
            }
        }
        Ok(Self { by_key, by_name })
    }

    /// Look up the entry for a metadata key.
    pub fn by_key(&self, key: MetadataKey) -> Option<&SchemaEntry> {
        self.by_key.get(&key).copied()
    }

    /// Look up the entry for a wire attribute name.
    pub fn by_name(&self, name: &str) -> Option<&SchemaEntry> {
        self.by_name.get(name).copied()
    }

    /// Iterate over all entries.
    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.by_key.values().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// The process-wide schema over the builtin table, built once.
pub fn schema() -> &'static TranslationSchema {
    static SCHEMA: OnceLock<TranslationSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        TranslationSchema::new(ENTRIES).expect("builtin schema table is bijective")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schema_is_bijective() {
        let s = schema();
        assert_eq!(s.len(), ENTRIES.len());
        for e in ENTRIES {
            assert_eq!(s.by_key(e.key).map(|x| x.name), Some(e.name));
            assert_eq!(s.by_name(e.name).map(|x| x.key), Some(e.key));
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        static BAD: &[SchemaEntry] = &[
            entry(MetadataKey::BitRate, "bitrate", ValueKind::Int32),
            entry(MetadataKey::BitRate, "bit-rate", ValueKind::Int32),
        ];
        // the collision is detected on the second row
        assert!(matches!(
            TranslationSchema::new(BAD),
            Err(SchemaError::DuplicateKey("bit-rate"))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        static BAD: &[SchemaEntry] = &[
            entry(MetadataKey::BitRate, "bitrate", ValueKind::Int32),
            entry(MetadataKey::SampleRate, "bitrate", ValueKind::Int32),
        ];
        assert!(matches!(
            TranslationSchema::new(BAD),
            Err(SchemaError::DuplicateName("bitrate"))
        ));
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(schema().by_name("no-such-attribute").is_none());
    }
}
