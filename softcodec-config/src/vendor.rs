//! Vendor-specific post-configuration adjustments.
//!
//! Some hardware decoders need extra knobs turned after the portable video
//! setup: frame packing, DivX sub-format records, timestamp reordering,
//! sync-frame-only decoding for thumbnails, extradata forwarding. Each
//! adjustment is best-effort: a node rejection is recorded as a warning and
//! never blocks the remaining adjustments or fails the configuration.
//!
//! Policies are selected at runtime by component-name prefix, so one build
//! covers every vendor platform.

use serde::Serialize;
use tracing::{debug, warn};

use softcodec_core::{mime, names, StoreError, TrackDescriptor};
use softcodec_node::record::{
    DivxFormat, DivxParams, EnableParams, FramePackingMode, FramePackingParams,
};
use softcodec_node::{get_record, CodecNode, ParamRecord, PlatformInfo, PortIndex, RecordKind};

/// Vendor extension name for sync-frame-only (thumbnail) decoding.
pub const SYNC_FRAME_DECODING_MODE_EXTENSION: &str =
    "OMX.QCOM.index.param.video.SyncFrameDecodingMode";

/// Component roles that always need timestamp reordering.
const REORDER_ROLES: &[&str] = &[
    "OMX.qcom.video.decoder.vc1",
    "OMX.qcom.video.decoder.mpeg4",
];

/// HEVC role that needs reordering, but only for transport-stream content.
const REORDER_ROLE_HEVC: &str = "OMX.qcom.video.decoder.hevc";

/// Boards whose decoders misbehave in sync-frame-only mode.
const THUMBNAIL_MODE_EXCLUDED_BOARDS: &[&str] =
    &["msm8996", "msm8937", "msm8953", "msm8976"];

/// One vendor adjustment the policy attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VendorAdjustment {
    /// Input-port frame packing mode.
    FramePacking,
    /// DivX sub-format record.
    DivxFormat,
    /// Output-port timestamp reordering.
    TimestampReorder,
    /// Sync-frame-only decoding for thumbnail extraction.
    ThumbnailMode,
    /// Forwarding of user extradata.
    UserExtradata,
}

/// A vendor adjustment the node rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("vendor adjustment {adjustment:?} rejected: {error}")]
pub struct VendorWarning {
    /// Which adjustment failed.
    pub adjustment: VendorAdjustment,
    /// The node's status.
    pub error: StoreError,
}

/// Outcome of a vendor policy pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VendorReport {
    /// Policy that ran, if any matched the component.
    pub policy: Option<&'static str>,
    /// Adjustments the node accepted.
    pub applied: Vec<VendorAdjustment>,
    /// Adjustments the node rejected.
    pub warnings: Vec<VendorWarning>,
}

impl VendorReport {
    fn accept(&mut self, adjustment: VendorAdjustment) {
        debug!(?adjustment, "vendor adjustment applied");
        self.applied.push(adjustment);
    }

    fn reject(&mut self, adjustment: VendorAdjustment, error: StoreError) {
        warn!(?adjustment, %error, "vendor adjustment rejected");
        self.warnings.push(VendorWarning { adjustment, error });
    }
}

/// A vendor's post-configuration policy.
pub trait VendorPolicy {
    /// Stable policy name for reports and logs.
    fn name(&self) -> &'static str;

    /// Whether this policy owns the component.
    fn applies_to(&self, component: &str) -> bool;

    /// Run every adjustment against the node, best-effort.
    fn apply(
        &self,
        node: &mut dyn CodecNode,
        track: &TrackDescriptor,
        component: &str,
        platform: &dyn PlatformInfo,
    ) -> VendorReport;
}

/// Policy for Qualcomm video decoders (and the Ittiam components shipped
/// on the same platforms).
#[derive(Debug, Default)]
pub struct QcomPolicy;

impl VendorPolicy for QcomPolicy {
    fn name(&self) -> &'static str {
        "qcom"
    }

    fn applies_to(&self, component: &str) -> bool {
        component.starts_with("OMX.qcom.") || component.starts_with("OMX.ittiam.")
    }

    fn apply(
        &self,
        node: &mut dyn CodecNode,
        track: &TrackDescriptor,
        component: &str,
        platform: &dyn PlatformInfo,
    ) -> VendorReport {
        let mut report = VendorReport {
            policy: Some(self.name()),
            ..VendorReport::default()
        };

        self.apply_frame_packing(node, track, &mut report);
        if mime::is_divx(&track.mime) {
            self.apply_divx_format(node, track, &mut report);
        }
        if wants_timestamp_reorder(track, component) {
            self.apply_timestamp_reorder(node, &mut report);
        }
        if wants_thumbnail_mode(track, platform) {
            self.apply_thumbnail_mode(node, &mut report);
        }
        if track.attributes.i32(names::ENABLE_EXTRADATA_USER) == Some(1) {
            self.apply_user_extradata(node, &mut report);
        }

        report
    }
}

impl QcomPolicy {
    fn apply_frame_packing(
        &self,
        node: &mut dyn CodecNode,
        track: &TrackDescriptor,
        report: &mut VendorReport,
    ) {
        let mode = if track.attributes.i32(names::USE_ARBITRARY_MODE) == Some(1) {
            debug!("decoder will be in arbitrary mode");
            FramePackingMode::Arbitrary
        } else {
            debug!("decoder will be in frame-by-frame mode");
            FramePackingMode::OneCompleteFrame
        };
        match node.set_parameter(
            RecordKind::FramePacking.into(),
            PortIndex::Input,
            &ParamRecord::FramePacking(FramePackingParams { mode }),
        ) {
            Ok(()) => report.accept(VendorAdjustment::FramePacking),
            Err(e) => report.reject(VendorAdjustment::FramePacking, e),
        }
    }

    fn apply_divx_format(
        &self,
        node: &mut dyn CodecNode,
        track: &TrackDescriptor,
        report: &mut VendorReport,
    ) {
        let format = divx_format_for_track(track);
        let mut divx: DivxParams = match get_record(node, RecordKind::Divx, PortIndex::Output) {
            Ok(d) => d,
            Err(e) => {
                report.reject(VendorAdjustment::DivxFormat, e);
                return;
            }
        };
        divx.format = format;
        match node.set_parameter(
            RecordKind::Divx.into(),
            PortIndex::Output,
            &ParamRecord::Divx(divx),
        ) {
            Ok(()) => report.accept(VendorAdjustment::DivxFormat),
            Err(e) => report.reject(VendorAdjustment::DivxFormat, e),
        }
    }

    fn apply_timestamp_reorder(&self, node: &mut dyn CodecNode, report: &mut VendorReport) {
        debug!("enabling timestamp reordering");
        match node.set_parameter(
            RecordKind::TimestampReorder.into(),
            PortIndex::Output,
            &ParamRecord::Enable(EnableParams { enable: true }),
        ) {
            Ok(()) => report.accept(VendorAdjustment::TimestampReorder),
            Err(e) => report.reject(VendorAdjustment::TimestampReorder, e),
        }
    }

    fn apply_thumbnail_mode(&self, node: &mut dyn CodecNode, report: &mut VendorReport) {
        let index = match node.get_extension_index(SYNC_FRAME_DECODING_MODE_EXTENSION) {
            Ok(index) => index,
            Err(e) => {
                report.reject(VendorAdjustment::ThumbnailMode, e);
                return;
            }
        };
        match node.set_parameter(
            index.into(),
            PortIndex::Output,
            &ParamRecord::Enable(EnableParams { enable: true }),
        ) {
            Ok(()) => report.accept(VendorAdjustment::ThumbnailMode),
            Err(e) => report.reject(VendorAdjustment::ThumbnailMode, e),
        }
    }

    fn apply_user_extradata(&self, node: &mut dyn CodecNode, report: &mut VendorReport) {
        match node.set_parameter(
            RecordKind::UserExtradata.into(),
            PortIndex::Output,
            &ParamRecord::Enable(EnableParams { enable: true }),
        ) {
            Ok(()) => report.accept(VendorAdjustment::UserExtradata),
            Err(e) => report.reject(VendorAdjustment::UserExtradata, e),
        }
    }
}

/// The DivX sub-format a track resolves to. An explicit `divx-version`
/// attribute wins, with values outside the known range mapping to
/// `Unused`; only an absent attribute falls back to the mime, defaulting
/// to DivX 4 the way clients feeding the codec directly expect.
fn divx_format_for_track(track: &TrackDescriptor) -> DivxFormat {
    use softcodec_core::DivxVersion;

    if let Some(version) = track.attributes.i32(names::DIVX_VERSION) {
        return match DivxVersion::from_i32(version) {
            Some(DivxVersion::Divx311) => DivxFormat::Format311,
            Some(DivxVersion::Divx4) => DivxFormat::Format4,
            Some(DivxVersion::Divx5) => DivxFormat::Format5,
            Some(DivxVersion::Divx6) => DivxFormat::Format6,
            None => {
                warn!(version, "unrecognized divx version");
                DivxFormat::Unused
            }
        };
    }
    if mime::eq(&track.mime, mime::VIDEO_DIVX311) {
        warn!("divx version missing, inferring 3.11 from mime");
        DivxFormat::Format311
    } else {
        warn!("divx version missing, inferring 4 from mime");
        DivxFormat::Format4
    }
}

/// Whether the component/container combination needs output-side timestamp
/// reordering: the VC-1 and MPEG-4 roles always do, AVI content always
/// does, and transport-stream content or the HEVC role does whenever a
/// container is declared.
fn wants_timestamp_reorder(track: &TrackDescriptor, component: &str) -> bool {
    if REORDER_ROLES.iter().any(|role| component.starts_with(role)) {
        return true;
    }
    let Some(container) = track.attributes.str(names::FILE_FORMAT) else {
        return false;
    };
    if container.starts_with(mime::CONTAINER_AVI) {
        return true;
    }
    container.starts_with(mime::CONTAINER_MPEG2TS) || component.starts_with(REORDER_ROLE_HEVC)
}

/// Whether sync-frame-only decoding should be requested: the track asks
/// for thumbnail mode and the board is not on the exclusion list.
fn wants_thumbnail_mode(track: &TrackDescriptor, platform: &dyn PlatformInfo) -> bool {
    if !track
        .attributes
        .i32(names::THUMBNAIL_MODE)
        .is_some_and(|v| v > 0)
    {
        return false;
    }
    let board = platform.platform_id();
    !THUMBNAIL_MODE_EXCLUDED_BOARDS.contains(&board)
}

/// Resolve the policy owning `component`, if any.
pub fn vendor_policy_for(component: &str) -> Option<&'static dyn VendorPolicy> {
    static QCOM: QcomPolicy = QcomPolicy;
    if QCOM.applies_to(component) {
        return Some(&QCOM);
    }
    None
}
