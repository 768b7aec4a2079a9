//! Video parameter marshalling.
//!
//! The portable setup resolves the track's coding type and, for the
//! families with a parameter record, overlays the sub-version the
//! extractor reported onto what the node already has. After the portable
//! part succeeds, the component's vendor policy (if any) runs its
//! best-effort adjustments; their rejections are reported, not raised.

use tracing::{debug, warn};

use softcodec_core::{
    mime, names, AttributeMap, ConfigError, Result, RvVersion, TrackDescriptor, WmvVersion,
};
use softcodec_node::record::{RvFormat, RvParams, VideoFallbackParams, WmvFormat, WmvParams};
use softcodec_node::{get_record, CodecNode, ParamRecord, PlatformInfo, PortIndex, RecordKind};

use crate::select::{video_coding_for_mime, VideoCoding, FALLBACK_PREFIX};
use crate::vendor::{vendor_policy_for, VendorReport};

/// Result of a full video configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfiguredVideo {
    /// Coding type the track resolved to.
    pub coding: VideoCoding,
    /// What the vendor policy did, empty when no policy matched.
    pub vendor: VendorReport,
}

/// Marshal Windows Media Video parameters.
///
/// An absent or unrecognized `wmv-version` leaves the node's sub-format
/// untouched.
pub fn set_wmv_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let version = attrs.i32(names::WMV_VERSION);
    if version.is_none() {
        warn!("wmv version not detected");
    }

    let mut wmv: WmvParams =
        get_record(node, RecordKind::Wmv, PortIndex::Input).map_err(ConfigError::from)?;
    match version.and_then(WmvVersion::from_i32) {
        Some(WmvVersion::Wmv7) => wmv.format = WmvFormat::Format7,
        Some(WmvVersion::Wmv8) => wmv.format = WmvFormat::Format8,
        Some(WmvVersion::Wmv9) => wmv.format = WmvFormat::Format9,
        None => {}
    }

    node.set_parameter(
        RecordKind::Wmv.into(),
        PortIndex::Input,
        &ParamRecord::Wmv(wmv),
    )
    .map_err(ConfigError::from)
}

/// Marshal RealVideo parameters. An absent `rv-version` defaults to G2; an
/// unrecognized one leaves the node's sub-format untouched.
pub fn set_rv_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let version = match attrs.i32(names::RV_VERSION) {
        Some(v) => v,
        None => {
            warn!("rv version not detected, assuming G2");
            RvVersion::G2.as_i32()
        }
    };

    let mut rv: RvParams =
        get_record(node, RecordKind::Rv, PortIndex::Input).map_err(ConfigError::from)?;
    match RvVersion::from_i32(version) {
        Some(RvVersion::G2) => rv.format = RvFormat::FormatG2,
        Some(RvVersion::Rv8) => rv.format = RvFormat::Format8,
        Some(RvVersion::Rv9) => rv.format = RvFormat::Format9,
        None => {}
    }

    node.set_parameter(
        RecordKind::Rv.into(),
        PortIndex::Input,
        &ParamRecord::Rv(rv),
    )
    .map_err(ConfigError::from)
}

/// Marshal generic fallback video parameters. `codec-id` is required;
/// width and height overlay the node's values only when present.
pub fn set_fallback_video_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let codec_id = attrs.require_i32(names::CODEC_ID)?;

    debug!(codec_id, "fallback video format");

    let mut fallback: VideoFallbackParams =
        get_record(node, RecordKind::VideoFallback, PortIndex::Input)
            .map_err(ConfigError::from)?;
    fallback.codec_id = codec_id;
    if let Some(width) = attrs.i32(names::WIDTH) {
        fallback.width = width as u32;
    }
    if let Some(height) = attrs.i32(names::HEIGHT) {
        fallback.height = height as u32;
    }

    node.set_parameter(
        RecordKind::VideoFallback.into(),
        PortIndex::Input,
        &ParamRecord::VideoFallback(fallback),
    )
    .map_err(ConfigError::from)
}

/// Configure a video track on `node`, then run the vendor policy matching
/// `component`.
///
/// Encode requests fail: every video family here is decode-only. Mimes
/// this layer does not know fail with `UnsupportedFormat`.
pub fn configure_video(
    node: &mut dyn CodecNode,
    track: &TrackDescriptor,
    component: &str,
    platform: &dyn PlatformInfo,
) -> Result<ConfiguredVideo> {
    if track.is_encoder {
        return Err(ConfigError::unsupported_operation(format!(
            "no encoder for {}",
            track.mime
        )));
    }

    let m = track.mime.as_str();
    let coding = video_coding_for_mime(m)
        .ok_or_else(|| ConfigError::unsupported_format(m.to_string()))?;

    match coding {
        VideoCoding::Wmv => {
            // only the fallback component consumes the WMV record; the
            // coding type alone steers everything else
            if component.starts_with(FALLBACK_PREFIX) {
                set_wmv_format(node, &track.attributes)?;
            }
        }
        VideoCoding::Rv => set_rv_format(node, &track.attributes)?,
        VideoCoding::AutoDetect => set_fallback_video_format(node, &track.attributes)?,
        // resolved by coding type alone; DivX sub-format is a vendor record
        VideoCoding::Vc1 | VideoCoding::Flv1 | VideoCoding::Divx | VideoCoding::Hevc => {}
    }

    let vendor = vendor_policy_for(component)
        .map(|policy| policy.apply(node, track, component, platform))
        .unwrap_or_default();

    Ok(ConfiguredVideo { coding, vendor })
}

/// Read back the resolved video format on `port` into an attribute map:
/// the inverse of the configure path.
pub fn query_video_port_format(
    node: &mut dyn CodecNode,
    port: PortIndex,
    coding: VideoCoding,
) -> Result<AttributeMap> {
    let mut attrs = AttributeMap::new();
    match coding {
        VideoCoding::Wmv => {
            let wmv: WmvParams =
                get_record(node, RecordKind::Wmv, port).map_err(ConfigError::from)?;
            let version = match wmv.format {
                WmvFormat::Format7 => WmvVersion::Wmv7,
                WmvFormat::Format8 => WmvVersion::Wmv8,
                WmvFormat::Format9 | WmvFormat::Unused => WmvVersion::Wmv9,
            };
            attrs.set_str(names::MIME, mime::VIDEO_WMV);
            attrs.set_i32(names::WMV_VERSION, version.as_i32());
        }
        VideoCoding::Rv => {
            let rv: RvParams = get_record(node, RecordKind::Rv, port).map_err(ConfigError::from)?;
            let version = match rv.format {
                RvFormat::FormatG2 => RvVersion::G2,
                RvFormat::Format8 => RvVersion::Rv8,
                RvFormat::Format9 | RvFormat::Unused => RvVersion::Rv9,
            };
            attrs.set_str(names::MIME, mime::VIDEO_RV);
            attrs.set_i32(names::RV_VERSION, version.as_i32());
        }
        VideoCoding::AutoDetect => {
            let fallback: VideoFallbackParams =
                get_record(node, RecordKind::VideoFallback, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::VIDEO_FALLBACK);
            attrs.set_i32(names::CODEC_ID, fallback.codec_id);
        }
        VideoCoding::Vc1 | VideoCoding::Flv1 | VideoCoding::Divx | VideoCoding::Hevc => {
            return Err(ConfigError::unsupported_format(format!(
                "no port format query for {coding:?}"
            )));
        }
    }
    Ok(attrs)
}
