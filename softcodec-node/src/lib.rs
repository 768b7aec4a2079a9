//! # softcodec-node
//!
//! The narrow interface the configuration layer drives a codec instance
//! through: typed parameter records addressed by kind and port, a blocking
//! get/set trait, a platform-info provider for vendor gating, and an
//! in-memory mock node for tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mock;
pub mod node;
pub mod platform;
pub mod record;

pub use node::{get_record, CodecNode, NodeResult};
pub use platform::{PlatformInfo, StaticPlatform};
pub use record::{ExtensionIndex, ParamIndex, ParamRecord, PortIndex, RecordKind};
