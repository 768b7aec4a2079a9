//! Component selection: which codec implementation should handle a track.
//!
//! [`select_component`] is a pure, deterministic function of the track
//! descriptor. Override rules are evaluated in a fixed priority order and
//! the first matching rule wins; the mime-to-coding-type resolution is
//! orthogonal and never depends on the override outcome.

use serde::Serialize;
use tracing::debug;

use softcodec_core::{mime, names, ConfigError, PcmEncoding, Result, TrackDescriptor, WmvVersion};

/// Fallback WMV decoder component.
pub const FALLBACK_WMV_DECODER: &str = "OMX.ffmpeg.wmv.decoder";
/// Fallback WMA decoder component.
pub const FALLBACK_WMA_DECODER: &str = "OMX.ffmpeg.wma.decoder";
/// Fallback AAC decoder component.
pub const FALLBACK_AAC_DECODER: &str = "OMX.ffmpeg.aac.decoder";
/// Fallback FLAC decoder component.
pub const FALLBACK_FLAC_DECODER: &str = "OMX.ffmpeg.flac.decoder";

/// Component name prefix of the fallback decoder family.
pub const FALLBACK_PREFIX: &str = "OMX.ffmpeg.";

/// AAC object type: Main profile.
pub const AAC_OBJECT_MAIN: i32 = 1;
/// AAC object type: Long Term Prediction profile.
pub const AAC_OBJECT_LTP: i32 = 4;

/// Coding type of a video format as the codec node enumerates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VideoCoding {
    /// Windows Media Video.
    Wmv,
    /// RealVideo.
    Rv,
    /// VC-1.
    Vc1,
    /// Sorenson Spark.
    Flv1,
    /// DivX.
    Divx,
    /// HEVC.
    Hevc,
    /// Generic fallback, resolved by codec id.
    AutoDetect,
}

/// Coding type of an audio format as the codec node enumerates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AudioCoding {
    /// Linear PCM.
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
    /// Generic fallback, resolved by codec id.
    AutoDetect,
}

/// Resolved coding type, video or audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Coding {
    /// Video coding type.
    Video(VideoCoding),
    /// Audio coding type.
    Audio(AudioCoding),
}

/// Outcome of component selection. A pure value, never mutated after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentDecision {
    /// Fallback component to use instead of the framework's pick, if any.
    pub override_name: Option<&'static str>,
    /// Coding type the mime resolves to, if this layer knows the format.
    pub coding: Option<Coding>,
}

/// Map a mime type to its video coding type.
pub fn video_coding_for_mime(m: &str) -> Option<VideoCoding> {
    if mime::eq(m, mime::VIDEO_WMV) {
        Some(VideoCoding::Wmv)
    } else if mime::eq(m, mime::VIDEO_RV) {
        Some(VideoCoding::Rv)
    } else if mime::eq(m, mime::VIDEO_VC1) {
        Some(VideoCoding::Vc1)
    } else if mime::eq(m, mime::VIDEO_FLV1) {
        Some(VideoCoding::Flv1)
    } else if mime::is_divx(m) {
        Some(VideoCoding::Divx)
    } else if mime::eq(m, mime::VIDEO_HEVC) {
        Some(VideoCoding::Hevc)
    } else if mime::eq(m, mime::VIDEO_FALLBACK) {
        Some(VideoCoding::AutoDetect)
    } else {
        None
    }
}

/// Map a mime type to its audio coding type.
pub fn audio_coding_for_mime(m: &str) -> Option<AudioCoding> {
    if mime::eq(m, mime::AUDIO_RAW) {
        Some(AudioCoding::Pcm)
    } else if mime::eq(m, mime::AUDIO_WMA) {
        Some(AudioCoding::Wma)
    } else if mime::eq(m, mime::AUDIO_VORBIS) {
        Some(AudioCoding::Vorbis)
    } else if mime::eq(m, mime::AUDIO_RA) {
        Some(AudioCoding::Ra)
    } else if mime::eq(m, mime::AUDIO_FLAC) {
        Some(AudioCoding::Flac)
    } else if mime::eq(m, mime::AUDIO_MP2) {
        Some(AudioCoding::Mp2)
    } else if mime::eq(m, mime::AUDIO_AC3) {
        Some(AudioCoding::Ac3)
    } else if mime::eq(m, mime::AUDIO_APE) {
        Some(AudioCoding::Ape)
    } else if mime::eq(m, mime::AUDIO_DTS) {
        Some(AudioCoding::Dts)
    } else if mime::eq(m, mime::AUDIO_FALLBACK) {
        Some(AudioCoding::AutoDetect)
    } else {
        None
    }
}

/// Whether this layer claims decode-only responsibility for `m`: formats
/// only the fallback decoder family handles, with no encoder anywhere.
pub fn is_decode_only_mime(m: &str) -> bool {
    video_coding_for_mime(m)
        .map(|_| true)
        .or_else(|| audio_coding_for_mime(m).map(|c| c != AudioCoding::Pcm))
        .unwrap_or(false)
}

/// Decide which component should handle `track`.
///
/// Override rules, first match wins:
///
/// 1. encode request on a decode-only family fails with
///    `UnsupportedOperation`;
/// 2. WMV with an explicit sub-version other than the native one routes to
///    the fallback WMV decoder;
/// 3. WMA on the decode path without encode options routes to the fallback
///    WMA decoder;
/// 4. AAC Main/LTP profiles route to the fallback AAC decoder;
/// 5. a requested PCM depth above 16 bits routes AAC and FLAC to their
///    fallback decoders (the native path is 16-bit only).
pub fn select_component(track: &TrackDescriptor) -> Result<ComponentDecision> {
    let m = track.mime.as_str();
    let coding = video_coding_for_mime(m)
        .map(Coding::Video)
        .or_else(|| audio_coding_for_mime(m).map(Coding::Audio));

    if track.is_encoder && is_decode_only_mime(m) {
        return Err(ConfigError::unsupported_operation(format!(
            "no encoder for {m}"
        )));
    }

    let override_name = select_override(track);
    if let Some(name) = override_name {
        debug!(mime = m, component = name, "using fallback component");
    }

    Ok(ComponentDecision {
        override_name,
        coding,
    })
}

fn select_override(track: &TrackDescriptor) -> Option<&'static str> {
    let m = track.mime.as_str();
    let attrs = &track.attributes;

    if mime::eq(m, mime::VIDEO_WMV) {
        if let Some(version) = attrs.i32(names::WMV_VERSION) {
            if WmvVersion::from_i32(version) != Some(WmvVersion::NATIVE) {
                debug!(version, "unsupported wmv sub-version");
                return Some(FALLBACK_WMV_DECODER);
            }
        }
        return None;
    }

    if !track.is_encoder && mime::eq(m, mime::AUDIO_WMA) {
        // tracks sniffed without encode options are beyond the native
        // decoder
        if attrs.i32(names::WMA_ENCODE_OPT).is_none() {
            return Some(FALLBACK_WMA_DECODER);
        }
        return None;
    }

    if !track.is_encoder && mime::eq(m, mime::AUDIO_AAC) {
        if let Some(profile) = attrs.i32(names::AAC_PROFILE) {
            // the native decoder has no Main/LTP support
            if profile == AAC_OBJECT_MAIN || profile == AAC_OBJECT_LTP {
                return Some(FALLBACK_AAC_DECODER);
            }
        }
    }

    // high-res formats the native decoders cap at 16 bits
    if !track.is_encoder {
        let deep = attrs
            .i32(names::PCM_ENCODING)
            .and_then(PcmEncoding::from_i32)
            .map(|e| e.bits() > 16)
            .unwrap_or(false);
        if deep {
            if mime::eq(m, mime::AUDIO_AAC) {
                return Some(FALLBACK_AAC_DECODER);
            }
            if mime::eq(m, mime::AUDIO_FLAC) {
                return Some(FALLBACK_FLAC_DECODER);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use softcodec_core::AttributeMap;

    fn decode_track(m: &str) -> TrackDescriptor {
        TrackDescriptor::decoder(m)
    }

    #[test]
    fn test_encoder_rejected_for_decode_only_mime() {
        let err = select_component(&TrackDescriptor::encoder(mime::VIDEO_WMV)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_wmv_non_native_version_overrides() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::WMV_VERSION, 1);
        let track = decode_track(mime::VIDEO_WMV).with_attributes(attrs);
        let decision = select_component(&track).unwrap();
        assert_eq!(decision.override_name, Some(FALLBACK_WMV_DECODER));
        assert_eq!(decision.coding, Some(Coding::Video(VideoCoding::Wmv)));
    }

    #[test]
    fn test_wmv_native_version_keeps_default() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::WMV_VERSION, 2);
        let track = decode_track(mime::VIDEO_WMV).with_attributes(attrs);
        assert_eq!(select_component(&track).unwrap().override_name, None);
    }

    #[test]
    fn test_wmv_without_version_keeps_default() {
        let track = decode_track(mime::VIDEO_WMV);
        assert_eq!(select_component(&track).unwrap().override_name, None);
    }

    #[test]
    fn test_wma_without_encode_opt_overrides() {
        let track = decode_track(mime::AUDIO_WMA);
        let decision = select_component(&track).unwrap();
        assert_eq!(decision.override_name, Some(FALLBACK_WMA_DECODER));
        assert_eq!(decision.coding, Some(Coding::Audio(AudioCoding::Wma)));
    }

    #[test]
    fn test_wma_with_encode_opt_keeps_default() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::WMA_ENCODE_OPT, 0x1f);
        let track = decode_track(mime::AUDIO_WMA).with_attributes(attrs);
        assert_eq!(select_component(&track).unwrap().override_name, None);
    }

    #[test]
    fn test_aac_main_profile_overrides() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::AAC_PROFILE, AAC_OBJECT_MAIN);
        let track = decode_track(mime::AUDIO_AAC).with_attributes(attrs);
        assert_eq!(
            select_component(&track).unwrap().override_name,
            Some(FALLBACK_AAC_DECODER)
        );
    }

    #[test]
    fn test_aac_lc_profile_keeps_default() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::AAC_PROFILE, 2); // LC
        let track = decode_track(mime::AUDIO_AAC).with_attributes(attrs);
        assert_eq!(select_component(&track).unwrap().override_name, None);
    }

    #[test]
    fn test_high_res_flac_overrides() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Float.as_i32());
        let track = decode_track(mime::AUDIO_FLAC).with_attributes(attrs);
        assert_eq!(
            select_component(&track).unwrap().override_name,
            Some(FALLBACK_FLAC_DECODER)
        );
    }

    #[test]
    fn test_sixteen_bit_flac_keeps_default() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Pcm16.as_i32());
        let track = decode_track(mime::AUDIO_FLAC).with_attributes(attrs);
        assert_eq!(select_component(&track).unwrap().override_name, None);
    }

    #[test]
    fn test_selection_is_pure() {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::WMV_VERSION, 3);
        let track = decode_track(mime::VIDEO_WMV).with_attributes(attrs);
        let first = select_component(&track).unwrap();
        let second = select_component(&track).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_mime_has_no_coding() {
        let decision = select_component(&decode_track("video/unknown")).unwrap();
        assert_eq!(decision.override_name, None);
        assert_eq!(decision.coding, None);
    }
}
