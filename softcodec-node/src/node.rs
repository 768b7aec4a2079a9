//! The codec node interface consumed by the configuration layer.

use softcodec_core::StoreError;

use crate::record::{ExtensionIndex, ParamIndex, ParamRecord, PortIndex};

/// Result type for node calls; failures are opaque store statuses.
pub type NodeResult<T> = std::result::Result<T, StoreError>;

/// One configured codec instance, hardware or software.
///
/// Calls are blocking and call-scoped: the configuration layer reads a
/// record, overlays the fields it owns and writes it straight back, never
/// holding a record across calls. Concurrent configuration of two ports of
/// the same node is not supported.
pub trait CodecNode {
    /// Read the current parameter record at `index` for `port`.
    fn get_parameter(&mut self, index: ParamIndex, port: PortIndex) -> NodeResult<ParamRecord>;

    /// Write a parameter record at `index` for `port`.
    fn set_parameter(
        &mut self,
        index: ParamIndex,
        port: PortIndex,
        record: &ParamRecord,
    ) -> NodeResult<()>;

    /// Resolve a vendor extension name to a parameter index.
    fn get_extension_index(&mut self, name: &str) -> NodeResult<ExtensionIndex>;
}

/// Typed read of a well-known record kind.
///
/// Fails with [`StoreError::InvalidArgument`] when the node answers with a
/// record of a different shape.
pub fn get_record<T>(
    node: &mut dyn CodecNode,
    kind: crate::record::RecordKind,
    port: PortIndex,
) -> NodeResult<T>
where
    T: TryFrom<ParamRecord, Error = StoreError>,
{
    node.get_parameter(kind.into(), port).and_then(T::try_from)
}
