//! # softcodec-core
//!
//! Core types for the softcodec configuration negotiation layer:
//!
//! - Generic typed attribute maps describing a media track
//! - The static translation schema between internal metadata identifiers
//!   and wire-visible attribute names, with bijection validation
//! - The translator between the two representations, including the
//!   codec-specific-data segment handling
//! - Version/encoding enumerations and mime constants shared by the
//!   selector and marshallers
//! - The error taxonomy surfaced by every configuration routine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attr;
pub mod error;
pub mod format;
pub mod mime;
pub mod schema;
pub mod track;
pub mod translate;

pub use attr::{AttributeMap, Value, ValueKind};
pub use error::{ConfigError, Result, StoreError};
pub use format::{DivxVersion, PcmEncoding, RvVersion, WmaVersion, WmvVersion};
pub use schema::{names, schema, MetadataKey, TranslationSchema};
pub use track::TrackDescriptor;
pub use translate::{to_attributes, to_metadata, Metadata};
