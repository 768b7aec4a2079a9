//! In-memory codec node for tests.
//!
//! The mock answers `get_parameter` with whatever was last set, falling
//! back to the zeroed default record for the kind, and keeps a log of
//! every accepted set so tests can assert the exact marshalling sequence.
//! Rejections are programmable per record kind, and the PCM path can be
//! restricted to an accepted bit-depth list to exercise the 16-bit
//! downgrade fallback.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use softcodec_core::StoreError;

use crate::node::{CodecNode, NodeResult};
use crate::record::{ExtensionIndex, ParamIndex, ParamRecord, PortIndex, RecordKind};

/// Programmable in-memory [`CodecNode`].
#[derive(Debug, Default)]
pub struct MockNode {
    records: HashMap<(ParamIndex, PortIndex), ParamRecord>,
    extensions: HashMap<String, ExtensionIndex>,
    next_extension: u32,
    reject_get: HashSet<RecordKind>,
    reject_set: HashSet<RecordKind>,
    pcm_accepted_bits: Option<Vec<u32>>,
    /// Every accepted set call, in order.
    pub set_log: Vec<(ParamIndex, PortIndex, ParamRecord)>,
}

impl MockNode {
    /// Create a mock with no preloaded records and no rejections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the record reported for `(kind, port)` before any set.
    pub fn preload(&mut self, kind: RecordKind, port: PortIndex, record: ParamRecord) {
        self.records.insert((ParamIndex::Kind(kind), port), record);
    }

    /// Reject every `get_parameter` for `kind` with `UnsupportedIndex`.
    pub fn reject_get(&mut self, kind: RecordKind) {
        self.reject_get.insert(kind);
    }

    /// Reject every `set_parameter` for `kind` with `UnsupportedSetting`.
    pub fn reject_set(&mut self, kind: RecordKind) {
        self.reject_set.insert(kind);
    }

    /// Restrict accepted PCM bit depths; sets with other depths fail with
    /// `UnsupportedSetting`.
    pub fn accept_pcm_bits(&mut self, bits: &[u32]) {
        self.pcm_accepted_bits = Some(bits.to_vec());
    }

    /// Register a vendor extension resolvable by name.
    pub fn register_extension(&mut self, name: impl Into<String>) -> ExtensionIndex {
        let index = ExtensionIndex(0x7f00_0000 + self.next_extension);
        self.next_extension += 1;
        self.extensions.insert(name.into(), index);
        index
    }

    /// The record last set (or preloaded) for `(kind, port)`, if any.
    pub fn record(&self, kind: RecordKind, port: PortIndex) -> Option<&ParamRecord> {
        self.records.get(&(ParamIndex::Kind(kind), port))
    }

    /// The record last set at an extension index, if any.
    pub fn extension_record(&self, index: ExtensionIndex, port: PortIndex) -> Option<&ParamRecord> {
        self.records.get(&(ParamIndex::Extension(index), port))
    }

    /// Number of accepted sets for a record kind across both ports.
    pub fn set_count(&self, kind: RecordKind) -> usize {
        self.set_log
            .iter()
            .filter(|(index, _, _)| *index == ParamIndex::Kind(kind))
            .count()
    }
}

impl CodecNode for MockNode {
    fn get_parameter(&mut self, index: ParamIndex, port: PortIndex) -> NodeResult<ParamRecord> {
        if let ParamIndex::Kind(kind) = index {
            if self.reject_get.contains(&kind) {
                return Err(StoreError::UnsupportedIndex);
            }
        }
        if let Some(record) = self.records.get(&(index, port)) {
            return Ok(record.clone());
        }
        match index {
            ParamIndex::Kind(kind) => Ok(ParamRecord::default_for(kind)),
            // extensions answer as plain disabled switches
            ParamIndex::Extension(_) => Ok(ParamRecord::Enable(Default::default())),
        }
    }

    fn set_parameter(
        &mut self,
        index: ParamIndex,
        port: PortIndex,
        record: &ParamRecord,
    ) -> NodeResult<()> {
        if let ParamIndex::Kind(kind) = index {
            if self.reject_set.contains(&kind) {
                return Err(StoreError::UnsupportedSetting);
            }
        }
        if let (Some(accepted), ParamRecord::Pcm(pcm)) = (&self.pcm_accepted_bits, record) {
            if !accepted.contains(&pcm.bits_per_sample) {
                debug!(bits = pcm.bits_per_sample, "mock node rejecting pcm depth");
                return Err(StoreError::UnsupportedSetting);
            }
        }
        self.records.insert((index, port), record.clone());
        self.set_log.push((index, port, record.clone()));
        Ok(())
    }

    fn get_extension_index(&mut self, name: &str) -> NodeResult<ExtensionIndex> {
        self.extensions
            .get(name)
            .copied()
            .ok_or(StoreError::UnsupportedIndex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PcmParams, WmaFormat, WmaParams};

    #[test]
    fn test_get_returns_default_then_last_set() {
        let mut node = MockNode::new();
        let rec = node
            .get_parameter(RecordKind::Wma.into(), PortIndex::Input)
            .unwrap();
        assert_eq!(rec, ParamRecord::default_for(RecordKind::Wma));

        let written = ParamRecord::Wma(WmaParams {
            channels: 2,
            format: WmaFormat::Format8,
            ..WmaParams::default()
        });
        node.set_parameter(RecordKind::Wma.into(), PortIndex::Input, &written)
            .unwrap();
        let back = node
            .get_parameter(RecordKind::Wma.into(), PortIndex::Input)
            .unwrap();
        assert_eq!(back, written);
        assert_eq!(node.set_count(RecordKind::Wma), 1);
    }

    #[test]
    fn test_reject_set() {
        let mut node = MockNode::new();
        node.reject_set(RecordKind::FramePacking);
        let err = node
            .set_parameter(
                RecordKind::FramePacking.into(),
                PortIndex::Input,
                &ParamRecord::default_for(RecordKind::FramePacking),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::UnsupportedSetting);
        assert!(node.set_log.is_empty());
    }

    #[test]
    fn test_pcm_bit_depth_gate() {
        let mut node = MockNode::new();
        node.accept_pcm_bits(&[16]);
        let mut pcm = PcmParams::default();
        pcm.bits_per_sample = 32;
        let err = node
            .set_parameter(
                RecordKind::Pcm.into(),
                PortIndex::Output,
                &ParamRecord::Pcm(pcm.clone()),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::UnsupportedSetting);

        pcm.bits_per_sample = 16;
        node.set_parameter(
            RecordKind::Pcm.into(),
            PortIndex::Output,
            &ParamRecord::Pcm(pcm),
        )
        .unwrap();
    }

    #[test]
    fn test_extension_lookup() {
        let mut node = MockNode::new();
        assert_eq!(
            node.get_extension_index("vendor.ext"),
            Err(StoreError::UnsupportedIndex)
        );
        let index = node.register_extension("vendor.ext");
        assert_eq!(node.get_extension_index("vendor.ext"), Ok(index));
    }
}
