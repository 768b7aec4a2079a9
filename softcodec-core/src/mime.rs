//! Mime type constants for the formats this layer negotiates.

/// Windows Media Video.
pub const VIDEO_WMV: &str = "video/x-ms-wmv";
/// RealVideo.
pub const VIDEO_RV: &str = "video/vnd.rn-realvideo";
/// VC-1.
pub const VIDEO_VC1: &str = "video/vc1";
/// Sorenson Spark / Flash Video.
pub const VIDEO_FLV1: &str = "video/x-flv";
/// DivX (versions 4 and up).
pub const VIDEO_DIVX: &str = "video/divx";
/// DivX 4, as tagged by some containers.
pub const VIDEO_DIVX4: &str = "video/divx4";
/// DivX 3.11.
pub const VIDEO_DIVX311: &str = "video/divx311";
/// H.265 / HEVC.
pub const VIDEO_HEVC: &str = "video/hevc";
/// H.264 / AVC. Pass-through family for codec-specific data.
pub const VIDEO_AVC: &str = "video/avc";
/// Generic fallback video, identified by an explicit codec id.
pub const VIDEO_FALLBACK: &str = "video/ffmpeg";

/// Windows Media Audio.
pub const AUDIO_WMA: &str = "audio/x-ms-wma";
/// Vorbis.
pub const AUDIO_VORBIS: &str = "audio/vorbis";
/// RealAudio.
pub const AUDIO_RA: &str = "audio/vnd.rn-realaudio";
/// FLAC.
pub const AUDIO_FLAC: &str = "audio/flac";
/// MPEG audio layer II.
pub const AUDIO_MP2: &str = "audio/mpeg-L2";
/// AC-3.
pub const AUDIO_AC3: &str = "audio/ac3";
/// Monkey's Audio.
pub const AUDIO_APE: &str = "audio/x-ape";
/// DTS.
pub const AUDIO_DTS: &str = "audio/vnd.dts";
/// AAC.
pub const AUDIO_AAC: &str = "audio/mp4a-latm";
/// Raw linear PCM.
pub const AUDIO_RAW: &str = "audio/raw";
/// Generic fallback audio, identified by an explicit codec id.
pub const AUDIO_FALLBACK: &str = "audio/ffmpeg";

/// AVI container, as carried in the `file-format` attribute.
pub const CONTAINER_AVI: &str = "video/avi";
/// MPEG-2 transport stream container.
pub const CONTAINER_MPEG2TS: &str = "video/mp2ts";

/// Whether `mime` is one of the DivX variants.
pub fn is_divx(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(VIDEO_DIVX)
        || mime.eq_ignore_ascii_case(VIDEO_DIVX4)
        || mime.eq_ignore_ascii_case(VIDEO_DIVX311)
}

/// Case-insensitive mime comparison, the way node component roles and
/// container tags are matched everywhere in this layer.
pub fn eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
