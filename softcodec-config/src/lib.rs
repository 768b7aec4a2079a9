//! # softcodec-config
//!
//! The configuration negotiation layer between track descriptions and a
//! codec node:
//!
//! - [`select::select_component`] decides which component should handle a
//!   track and which coding type its mime resolves to
//! - [`audio::configure_audio`] and [`video::configure_video`] marshal the
//!   track's attributes into the node's parameter records, always reading
//!   the current record and overlaying only the fields this layer owns
//! - [`audio::query_audio_port_format`] and
//!   [`video::query_video_port_format`] read the resolved configuration
//!   back into attribute maps
//! - [`vendor`] holds the per-vendor best-effort adjustment policies that
//!   run after the portable video setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audio;
pub mod select;
pub mod vendor;
pub mod video;

pub use audio::{configure_audio, query_audio_port_format};
pub use select::{
    audio_coding_for_mime, is_decode_only_mime, select_component, video_coding_for_mime,
    AudioCoding, Coding, ComponentDecision, VideoCoding,
};
pub use vendor::{vendor_policy_for, VendorAdjustment, VendorPolicy, VendorReport, VendorWarning};
pub use video::{configure_video, query_video_port_format, ConfiguredVideo};
