//! Fixed-layout parameter records exchanged with a codec node.
//!
//! Each codec family gets its own variant carrying only the fields that
//! family needs; the node addresses them by [`RecordKind`] and port. Two
//! fields deliberately carry a value unrelated to their nominal meaning,
//! kept for compatibility with the decoders consuming them:
//!
//! - [`RaParams::num_regions`] carries the track's block alignment. The
//!   legacy RealAudio (cook) decoder reads its block size from there.
//! - [`FlacParams::compression_level`] carries the PCM encoding
//!   discriminant, so the decoder knows the requested output depth.
//!
//! These are intentional field reuse, not bugs; tests assert them.

/// Port of a codec node a record is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortIndex {
    /// Compressed/input side.
    Input,
    /// Decoded/output side.
    Output,
}

/// Identifier of an addressable parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Port definition (encoding selection).
    PortDefinition,
    /// Linear PCM output parameters.
    Pcm,
    /// Windows Media Audio.
    Wma,
    /// Vorbis.
    Vorbis,
    /// RealAudio.
    Ra,
    /// FLAC.
    Flac,
    /// MPEG audio layer II.
    Mp2,
    /// AC-3.
    Ac3,
    /// Monkey's Audio.
    Ape,
    /// DTS.
    Dts,
    /// Generic fallback audio, addressed by codec id.
    AudioFallback,
    /// Windows Media Video.
    Wmv,
    /// RealVideo.
    Rv,
    /// DivX (vendor record).
    Divx,
    /// Generic fallback video, addressed by codec id.
    VideoFallback,
    /// Vendor frame-packing mode.
    FramePacking,
    /// Vendor timestamp-reorder switch.
    TimestampReorder,
    /// Vendor user-extradata switch.
    UserExtradata,
}

/// Index handle returned by a node's extension lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionIndex(pub u32);

/// A parameter index: either a well-known record kind or a node extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamIndex {
    /// Well-known record.
    Kind(RecordKind),
    /// Extension obtained from `get_extension_index`.
    Extension(ExtensionIndex),
}

impl From<RecordKind> for ParamIndex {
    fn from(kind: RecordKind) -> Self {
        ParamIndex::Kind(kind)
    }
}

impl From<ExtensionIndex> for ParamIndex {
    fn from(index: ExtensionIndex) -> Self {
        ParamIndex::Extension(index)
    }
}

/// Audio encoding selected on a port definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortEncoding {
    /// Port encoding not constrained.
    #[default]
    Unused,
    /// Linear PCM.
    Pcm,
}

/// Port definition record (decoded-output side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortDefinition {
    /// Selected audio encoding for the port.
    pub encoding: PortEncoding,
}

/// Numeric interpretation of PCM samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericData {
    /// Two's-complement signed integers.
    #[default]
    Signed,
    /// Unsigned integers.
    Unsigned,
    /// IEEE floats.
    Float,
}

/// PCM layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PcmMode {
    /// Linear PCM.
    #[default]
    Linear,
}

/// Speaker assignment for one interleaved channel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSlot {
    /// Front left.
    FrontLeft,
    /// Front right.
    FrontRight,
    /// Front center.
    FrontCenter,
    /// Low frequency effects.
    Lfe,
    /// Back left.
    BackLeft,
    /// Back right.
    BackRight,
    /// Side left.
    SideLeft,
    /// Side right.
    SideRight,
    /// Back center.
    BackCenter,
    /// Mono/center for single-channel layouts.
    Center,
}

/// Linear PCM parameters on the decoded-output port.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PcmParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sampling_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u32,
    /// Numeric interpretation of samples.
    pub numeric: NumericData,
    /// Whether channels are interleaved.
    pub interleaved: bool,
    /// PCM layout mode.
    pub mode: PcmMode,
    /// Channel-to-speaker mapping, sized to the channel count.
    pub channel_mapping: Vec<ChannelSlot>,
}

/// WMA sub-format enumeration as the node understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WmaFormat {
    /// Not yet resolved.
    #[default]
    Unused,
    /// WMA v7 bitstream (WMA standard).
    Format7,
    /// WMA v8 bitstream (WMA Pro).
    Format8,
    /// WMA v9 bitstream (WMA Lossless).
    Format9,
}

/// Windows Media Audio parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmaParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sampling_rate: u32,
    /// Average bit rate in bits per second.
    pub bit_rate: u32,
    /// Block alignment in bytes.
    pub block_align: u32,
    /// Bitstream sub-format.
    pub format: WmaFormat,
}

/// Vorbis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VorbisParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// RealAudio sub-format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaFormat {
    /// Not resolved; the decoder probes the bitstream (cook and friends).
    #[default]
    Unused,
}

/// RealAudio parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sampling_rate: u32,
    /// Bitstream sub-format.
    pub format: RaFormat,
    /// Nominally the interleaver region count. OVERLOADED: carries the
    /// track's block alignment, which the legacy decoder reads from here.
    pub num_regions: u32,
}

/// FLAC parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlacParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Nominally the encoder compression level. OVERLOADED: carries the
    /// requested PCM encoding discriminant on the decode path.
    pub compression_level: i32,
}

/// MPEG audio layer II parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mp2Params {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// AC-3 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ac3Params {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Monkey's Audio parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApeParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sampling_rate: u32,
    /// Decoded sample bit depth.
    pub bits_per_sample: u32,
}

/// DTS parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DtsParams {
    /// Channel count.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sampling_rate: u32,
}

/// Generic fallback audio parameters, addressed by codec id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioFallbackParams {
    /// Codec identifier of the compressed format.
    pub codec_id: i32,
    /// Channel count.
    pub channels: u32,
    /// Average bit rate; 0 when unknown.
    pub bit_rate: u32,
    /// Coded sample bit depth; 0 when unknown.
    pub bits_per_sample: u32,
    /// Sample rate in Hz; 0 when unknown.
    pub sample_rate: u32,
    /// Block alignment; 0 when unknown.
    pub block_align: u32,
    /// Sample format tag understood by the fallback decoder.
    pub sample_format: i32,
}

/// WMV sub-format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WmvFormat {
    /// Not yet resolved.
    #[default]
    Unused,
    /// WMV 7 bitstream.
    Format7,
    /// WMV 8 bitstream.
    Format8,
    /// WMV 9 bitstream.
    Format9,
}

/// Windows Media Video parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmvParams {
    /// Bitstream sub-format.
    pub format: WmvFormat,
}

/// RealVideo sub-format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RvFormat {
    /// Not yet resolved.
    #[default]
    Unused,
    /// RealVideo G2.
    FormatG2,
    /// RealVideo 8.
    Format8,
    /// RealVideo 9.
    Format9,
}

/// RealVideo parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RvParams {
    /// Bitstream sub-format.
    pub format: RvFormat,
}

/// DivX sub-format enumeration (vendor record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivxFormat {
    /// Not resolved.
    #[default]
    Unused,
    /// DivX 3.11.
    Format311,
    /// DivX 4.
    Format4,
    /// DivX 5.
    Format5,
    /// DivX 6.
    Format6,
}

/// DivX parameters (vendor record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DivxParams {
    /// Bitstream sub-format.
    pub format: DivxFormat,
    /// Profile; unused, left as the node reports it.
    pub profile: i32,
}

/// Generic fallback video parameters, addressed by codec id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoFallbackParams {
    /// Codec identifier of the compressed format.
    pub codec_id: i32,
    /// Frame width in pixels; 0 when unknown.
    pub width: u32,
    /// Frame height in pixels; 0 when unknown.
    pub height: u32,
}

/// Vendor frame-packing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePackingMode {
    /// Input buffers may carry arbitrary bitstream slices.
    Arbitrary,
    /// Every input buffer carries exactly one complete frame.
    #[default]
    OneCompleteFrame,
}

/// Vendor frame-packing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePackingParams {
    /// Requested packing mode.
    pub mode: FramePackingMode,
}

/// Generic boolean switch record (timestamp reorder, extradata requests,
/// extension-addressed toggles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnableParams {
    /// Whether the feature is enabled.
    pub enable: bool,
}

/// Tagged parameter record, one variant per codec family.
///
/// Adding a family is a compile-time-checked addition: every consumer
/// matches exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamRecord {
    /// Port definition.
    PortDefinition(PortDefinition),
    /// Linear PCM.
    Pcm(PcmParams),
    /// Windows Media Audio.
    Wma(WmaParams),
    /// Vorbis.
    Vorbis(VorbisParams),
    /// RealAudio.
    Ra(RaParams),
    /// FLAC.
    Flac(FlacParams),
    /// MPEG audio layer II.
    Mp2(Mp2Params),
    /// AC-3.
    Ac3(Ac3Params),
    /// Monkey's Audio.
    Ape(ApeParams),
    /// DTS.
    Dts(DtsParams),
    /// Generic fallback audio.
    AudioFallback(AudioFallbackParams),
    /// Windows Media Video.
    Wmv(WmvParams),
    /// RealVideo.
    Rv(RvParams),
    /// DivX.
    Divx(DivxParams),
    /// Generic fallback video.
    VideoFallback(VideoFallbackParams),
    /// Vendor frame packing.
    FramePacking(FramePackingParams),
    /// Boolean switch.
    Enable(EnableParams),
}

impl ParamRecord {
    /// The default (zeroed) record a node reports for a kind it has never
    /// been configured with.
    pub fn default_for(kind: RecordKind) -> ParamRecord {
        match kind {
            RecordKind::PortDefinition => ParamRecord::PortDefinition(PortDefinition::default()),
            RecordKind::Pcm => ParamRecord::Pcm(PcmParams::default()),
            RecordKind::Wma => ParamRecord::Wma(WmaParams::default()),
            RecordKind::Vorbis => ParamRecord::Vorbis(VorbisParams::default()),
            RecordKind::Ra => ParamRecord::Ra(RaParams::default()),
            RecordKind::Flac => ParamRecord::Flac(FlacParams::default()),
            RecordKind::Mp2 => ParamRecord::Mp2(Mp2Params::default()),
            RecordKind::Ac3 => ParamRecord::Ac3(Ac3Params::default()),
            RecordKind::Ape => ParamRecord::Ape(ApeParams::default()),
            RecordKind::Dts => ParamRecord::Dts(DtsParams::default()),
            RecordKind::AudioFallback => {
                ParamRecord::AudioFallback(AudioFallbackParams::default())
            }
            RecordKind::Wmv => ParamRecord::Wmv(WmvParams::default()),
            RecordKind::Rv => ParamRecord::Rv(RvParams::default()),
            RecordKind::Divx => ParamRecord::Divx(DivxParams::default()),
            RecordKind::VideoFallback => {
                ParamRecord::VideoFallback(VideoFallbackParams::default())
            }
            RecordKind::FramePacking => ParamRecord::FramePacking(FramePackingParams::default()),
            RecordKind::TimestampReorder | RecordKind::UserExtradata => {
                ParamRecord::Enable(EnableParams::default())
            }
        }
    }
}

macro_rules! record_variant {
    ($variant:ident, $params:ty) => {
        impl From<$params> for ParamRecord {
            fn from(p: $params) -> Self {
                ParamRecord::$variant(p)
            }
        }

        impl TryFrom<ParamRecord> for $params {
            type Error = softcodec_core::StoreError;

            fn try_from(r: ParamRecord) -> Result<Self, Self::Error> {
                match r {
                    ParamRecord::$variant(p) => Ok(p),
                    // a node answering with a different record shape is a
                    // store-level contract violation
                    _ => Err(softcodec_core::StoreError::InvalidArgument),
                }
            }
        }
    };
}

record_variant!(PortDefinition, PortDefinition);
record_variant!(Pcm, PcmParams);
record_variant!(Wma, WmaParams);
record_variant!(Vorbis, VorbisParams);
record_variant!(Ra, RaParams);
record_variant!(Flac, FlacParams);
record_variant!(Mp2, Mp2Params);
record_variant!(Ac3, Ac3Params);
record_variant!(Ape, ApeParams);
record_variant!(Dts, DtsParams);
record_variant!(AudioFallback, AudioFallbackParams);
record_variant!(Wmv, WmvParams);
record_variant!(Rv, RvParams);
record_variant!(Divx, DivxParams);
record_variant!(VideoFallback, VideoFallbackParams);
record_variant!(FramePacking, FramePackingParams);
record_variant!(Enable, EnableParams);

/// Default speaker mapping for an interleaved channel count.
///
/// Only layouts up to 7.1 have a standard assignment; `None` beyond that.
pub fn channel_mapping(channels: u32) -> Option<Vec<ChannelSlot>> {
    use ChannelSlot::*;
    let mapping: &[ChannelSlot] = match channels {
        1 => &[Center],
        2 => &[FrontLeft, FrontRight],
        3 => &[FrontLeft, FrontRight, FrontCenter],
        4 => &[FrontLeft, FrontRight, BackLeft, BackRight],
        5 => &[FrontLeft, FrontRight, FrontCenter, BackLeft, BackRight],
        6 => &[FrontLeft, FrontRight, FrontCenter, Lfe, BackLeft, BackRight],
        7 => &[
            FrontLeft,
            FrontRight,
            FrontCenter,
            Lfe,
            BackLeft,
            BackRight,
            BackCenter,
        ],
        8 => &[
            FrontLeft,
            FrontRight,
            FrontCenter,
            Lfe,
            BackLeft,
            BackRight,
            SideLeft,
            SideRight,
        ],
        _ => return None,
    };
    Some(mapping.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_try_from() {
        let rec: ParamRecord = WmaParams {
            channels: 2,
            ..WmaParams::default()
        }
        .into();
        let params = WmaParams::try_from(rec).unwrap();
        assert_eq!(params.channels, 2);

        let wrong = PcmParams::try_from(ParamRecord::Wma(WmaParams::default()));
        assert!(wrong.is_err());
    }

    #[test]
    fn test_default_for_matches_kind() {
        assert!(matches!(
            ParamRecord::default_for(RecordKind::Flac),
            ParamRecord::Flac(_)
        ));
        assert!(matches!(
            ParamRecord::default_for(RecordKind::UserExtradata),
            ParamRecord::Enable(EnableParams { enable: false })
        ));
    }

    #[test]
    fn test_channel_mapping_sized_to_count() {
        for n in 1..=8u32 {
            assert_eq!(channel_mapping(n).map(|m| m.len()), Some(n as usize));
        }
        assert_eq!(channel_mapping(0), None);
        assert_eq!(channel_mapping(9), None);
    }
}
