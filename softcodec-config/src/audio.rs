//! Audio parameter marshalling.
//!
//! Every compressed-format routine follows the same contract: validate the
//! required attributes, establish the decoded-output port with
//! [`set_raw_audio_format`], then read the family's parameter record from
//! the input port, overlay the fields this layer owns and write it back.
//! Fields the routine does not set keep whatever the node last reported.
//! The first node failure aborts the routine; the only retry anywhere is
//! the raw-PCM 16-bit downgrade.

use tracing::{debug, warn};

use softcodec_core::{
    mime, names, AttributeMap, ConfigError, PcmEncoding, Result, TrackDescriptor, WmaVersion,
};
use softcodec_node::record::{
    channel_mapping, Ac3Params, ApeParams, AudioFallbackParams, DtsParams, FlacParams, Mp2Params,
    NumericData, PcmMode, PcmParams, PortDefinition, PortEncoding, RaFormat, RaParams,
    VorbisParams, WmaFormat, WmaParams,
};
use softcodec_node::{get_record, CodecNode, ParamRecord, PortIndex, RecordKind};

use crate::select::AudioCoding;

/// Configure the decoded-output port for linear PCM.
///
/// Requires `channel-count` and `sample-rate`; `pcm-encoding` defaults to
/// signed 16-bit. If the node rejects the PCM record and the requested
/// depth was not 16-bit, one retry forces signed 16-bit; if that also
/// fails the original failure is propagated.
pub fn set_raw_audio_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;
    let encoding = match attrs.i32(names::PCM_ENCODING) {
        Some(v) => PcmEncoding::from_i32(v)
            .ok_or_else(|| ConfigError::unsupported_format(format!("pcm encoding {v}")))?,
        None => {
            debug!("no pcm encoding requested, using 16 bit");
            PcmEncoding::Pcm16
        }
    };

    let mut def: PortDefinition = get_record(node, RecordKind::PortDefinition, PortIndex::Output)
        .map_err(ConfigError::from)?;
    def.encoding = PortEncoding::Pcm;
    node.set_parameter(
        RecordKind::PortDefinition.into(),
        PortIndex::Output,
        &ParamRecord::PortDefinition(def),
    )
    .map_err(ConfigError::from)?;

    let mut pcm: PcmParams =
        get_record(node, RecordKind::Pcm, PortIndex::Output).map_err(ConfigError::from)?;

    pcm.channels = channels as u32;
    match encoding {
        PcmEncoding::Pcm8 => {
            pcm.numeric = NumericData::Unsigned;
            pcm.bits_per_sample = 8;
        }
        PcmEncoding::Float => {
            pcm.numeric = NumericData::Float;
            pcm.bits_per_sample = 32;
        }
        PcmEncoding::Pcm16 => {
            pcm.numeric = NumericData::Signed;
            pcm.bits_per_sample = 16;
        }
    }
    pcm.interleaved = true;
    pcm.sampling_rate = sample_rate as u32;
    pcm.mode = PcmMode::Linear;

    // no standard speaker assignment past 8 channels: leave the port as
    // the node reported it
    let Some(mapping) = channel_mapping(channels as u32) else {
        return Ok(());
    };
    pcm.channel_mapping = mapping;

    let first = node.set_parameter(
        RecordKind::Pcm.into(),
        PortIndex::Output,
        &ParamRecord::Pcm(pcm.clone()),
    );
    let Err(err) = first else {
        return Ok(());
    };

    // the node may cap decoded output at 16-bit; retry once downgraded
    if encoding != PcmEncoding::Pcm16 {
        warn!(requested = encoding.bits(), "pcm depth rejected, retrying 16 bit");
        pcm.numeric = NumericData::Signed;
        pcm.bits_per_sample = 16;
        if node
            .set_parameter(
                RecordKind::Pcm.into(),
                PortIndex::Output,
                &ParamRecord::Pcm(pcm),
            )
            .is_ok()
        {
            return Ok(());
        }
    }
    Err(err.into())
}

/// Marshal Windows Media Audio parameters.
///
/// `block-align` falls back to the secondary `wma-block-align` key written
/// by some extractors; both absent is a hard failure. A
/// `wma-bits-per-sample` attribute overrides the PCM encoding fed to the
/// raw-output setup.
pub fn set_wma_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;
    let bit_rate = attrs.require_i32(names::BITRATE)?;
    let block_align = match attrs.i32(names::BLOCK_ALIGN) {
        Some(v) => v,
        None => attrs
            .i32(names::WMA_BLOCK_ALIGN)
            .ok_or(ConfigError::MissingAttribute(names::BLOCK_ALIGN))?,
    };
    let version = attrs.require_i32(names::WMA_VERSION)?;

    debug!(channels, sample_rate, bit_rate, block_align, "wma format");

    // the extractor may want a different decoded depth than the generic
    // pcm-encoding attribute says
    let raw_attrs = match attrs
        .i32(names::WMA_BITS_PER_SAMPLE)
        .and_then(PcmEncoding::from_bits)
    {
        Some(enc) => {
            let mut overridden = attrs.clone();
            overridden.set_i32(names::PCM_ENCODING, enc.as_i32());
            overridden
        }
        None => attrs.clone(),
    };
    set_raw_audio_format(node, &raw_attrs)?;

    let mut wma: WmaParams =
        get_record(node, RecordKind::Wma, PortIndex::Input).map_err(ConfigError::from)?;
    wma.channels = channels as u32;
    wma.sampling_rate = sample_rate as u32;
    wma.bit_rate = bit_rate as u32;
    wma.block_align = block_align as u32;
    match WmaVersion::from_i32(version) {
        Some(WmaVersion::Wma) => wma.format = WmaFormat::Format7,
        Some(WmaVersion::WmaPro) => wma.format = WmaFormat::Format8,
        Some(WmaVersion::WmaLossless) => wma.format = WmaFormat::Format9,
        // unrecognized version: keep whatever the node reported
        None => {}
    }

    node.set_parameter(
        RecordKind::Wma.into(),
        PortIndex::Input,
        &ParamRecord::Wma(wma),
    )
    .map_err(ConfigError::from)
}

/// Marshal Vorbis parameters.
pub fn set_vorbis_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;

    set_raw_audio_format(node, attrs)?;

    let mut vorbis: VorbisParams =
        get_record(node, RecordKind::Vorbis, PortIndex::Input).map_err(ConfigError::from)?;
    vorbis.channels = channels as u32;
    vorbis.sample_rate = sample_rate as u32;

    node.set_parameter(
        RecordKind::Vorbis.into(),
        PortIndex::Input,
        &ParamRecord::Vorbis(vorbis),
    )
    .map_err(ConfigError::from)
}

/// Marshal RealAudio parameters.
///
/// The block alignment is written through the `num_regions` field; see the
/// overloaded-field note on [`RaParams`].
pub fn set_ra_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;
    let block_align = attrs.require_i32(names::BLOCK_ALIGN)?;

    set_raw_audio_format(node, attrs)?;

    let mut ra: RaParams =
        get_record(node, RecordKind::Ra, PortIndex::Input).map_err(ConfigError::from)?;
    ra.format = RaFormat::Unused;
    ra.channels = channels as u32;
    ra.sampling_rate = sample_rate as u32;
    // intentional reuse: the legacy decoder reads its block size here
    ra.num_regions = block_align as u32;

    node.set_parameter(
        RecordKind::Ra.into(),
        PortIndex::Input,
        &ParamRecord::Ra(ra),
    )
    .map_err(ConfigError::from)
}

/// Marshal FLAC parameters.
///
/// The requested PCM encoding rides in the `compression_level` field; see
/// the overloaded-field note on [`FlacParams`].
pub fn set_flac_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;
    let encoding = attrs
        .i32(names::PCM_ENCODING)
        .and_then(PcmEncoding::from_i32)
        .unwrap_or_default();

    set_raw_audio_format(node, attrs)?;

    let mut flac: FlacParams =
        get_record(node, RecordKind::Flac, PortIndex::Input).map_err(ConfigError::from)?;
    flac.channels = channels as u32;
    flac.sample_rate = sample_rate as u32;
    // intentional reuse: decode path has no compression level, the field
    // carries the requested output encoding instead
    flac.compression_level = encoding.as_i32();

    node.set_parameter(
        RecordKind::Flac.into(),
        PortIndex::Input,
        &ParamRecord::Flac(flac),
    )
    .map_err(ConfigError::from)
}

/// Marshal MPEG layer II parameters.
pub fn set_mp2_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;

    set_raw_audio_format(node, attrs)?;

    let mut mp2: Mp2Params =
        get_record(node, RecordKind::Mp2, PortIndex::Input).map_err(ConfigError::from)?;
    mp2.channels = channels as u32;
    mp2.sample_rate = sample_rate as u32;

    node.set_parameter(
        RecordKind::Mp2.into(),
        PortIndex::Input,
        &ParamRecord::Mp2(mp2),
    )
    .map_err(ConfigError::from)
}

/// Marshal AC-3 parameters.
pub fn set_ac3_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;

    set_raw_audio_format(node, attrs)?;

    let mut ac3: Ac3Params =
        get_record(node, RecordKind::Ac3, PortIndex::Input).map_err(ConfigError::from)?;
    ac3.channels = channels as u32;
    ac3.sample_rate = sample_rate as u32;

    node.set_parameter(
        RecordKind::Ac3.into(),
        PortIndex::Input,
        &ParamRecord::Ac3(ac3),
    )
    .map_err(ConfigError::from)
}

/// Marshal Monkey's Audio parameters. The PCM encoding attribute is
/// required here: the decoder needs the exact output depth.
pub fn set_ape_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;
    let encoding = PcmEncoding::from_i32(attrs.require_i32(names::PCM_ENCODING)?)
        .ok_or_else(|| ConfigError::unsupported_format("ape pcm encoding"))?;

    set_raw_audio_format(node, attrs)?;

    let mut ape: ApeParams =
        get_record(node, RecordKind::Ape, PortIndex::Input).map_err(ConfigError::from)?;
    ape.channels = channels as u32;
    ape.sampling_rate = sample_rate as u32;
    ape.bits_per_sample = encoding.bits();

    node.set_parameter(
        RecordKind::Ape.into(),
        PortIndex::Input,
        &ParamRecord::Ape(ape),
    )
    .map_err(ConfigError::from)
}

/// Marshal DTS parameters.
pub fn set_dts_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_rate = attrs.require_i32(names::SAMPLE_RATE)?;

    set_raw_audio_format(node, attrs)?;

    let mut dts: DtsParams =
        get_record(node, RecordKind::Dts, PortIndex::Input).map_err(ConfigError::from)?;
    dts.channels = channels as u32;
    dts.sampling_rate = sample_rate as u32;

    node.set_parameter(
        RecordKind::Dts.into(),
        PortIndex::Input,
        &ParamRecord::Dts(dts),
    )
    .map_err(ConfigError::from)
}

/// Marshal generic fallback audio parameters.
///
/// `codec-id`, `channel-count` and `sample-format` are required; the
/// remaining fields default to 0, which the fallback decoder reads as
/// "probe the bitstream".
pub fn set_fallback_audio_format(node: &mut dyn CodecNode, attrs: &AttributeMap) -> Result<()> {
    let codec_id = attrs.require_i32(names::CODEC_ID)?;
    let channels = attrs.require_i32(names::CHANNEL_COUNT)?;
    let sample_format = attrs.require_i32(names::SAMPLE_FORMAT)?;
    let bit_rate = attrs.i32(names::BITRATE).unwrap_or(0);
    let sample_rate = attrs.i32(names::SAMPLE_RATE).unwrap_or(0);
    let block_align = attrs.i32(names::BLOCK_ALIGN).unwrap_or(0);
    let coded_sample_bits = attrs.i32(names::CODED_SAMPLE_BITS).unwrap_or(0);

    debug!(codec_id, channels, sample_rate, "fallback audio format");

    set_raw_audio_format(node, attrs)?;

    let mut fallback: AudioFallbackParams =
        get_record(node, RecordKind::AudioFallback, PortIndex::Input)
            .map_err(ConfigError::from)?;
    fallback.codec_id = codec_id;
    fallback.channels = channels as u32;
    fallback.bit_rate = bit_rate as u32;
    fallback.bits_per_sample = coded_sample_bits as u32;
    fallback.sample_rate = sample_rate as u32;
    fallback.block_align = block_align as u32;
    fallback.sample_format = sample_format;

    node.set_parameter(
        RecordKind::AudioFallback.into(),
        PortIndex::Input,
        &ParamRecord::AudioFallback(fallback),
    )
    .map_err(ConfigError::from)
}

/// Configure an audio track, dispatching to the family routine its mime
/// selects. Mimes owned entirely by other layers are a no-op.
pub fn configure_audio(node: &mut dyn CodecNode, track: &TrackDescriptor) -> Result<()> {
    let m = track.mime.as_str();
    let attrs = &track.attributes;

    if mime::eq(m, mime::AUDIO_RAW) {
        set_raw_audio_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_WMA) {
        set_wma_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_VORBIS) {
        set_vorbis_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_RA) {
        set_ra_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_FLAC) {
        set_flac_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_MP2) {
        set_mp2_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_AC3) {
        set_ac3_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_APE) {
        set_ape_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_DTS) {
        set_dts_format(node, attrs)
    } else if mime::eq(m, mime::AUDIO_FALLBACK) {
        set_fallback_audio_format(node, attrs)
    } else {
        // not this layer's format
        Ok(())
    }
}

/// Read back the resolved audio format on `port` into an attribute map:
/// the inverse of the configure path.
pub fn query_audio_port_format(
    node: &mut dyn CodecNode,
    port: PortIndex,
    coding: AudioCoding,
) -> Result<AttributeMap> {
    let mut attrs = AttributeMap::new();
    match coding {
        AudioCoding::Ra => {
            let ra: RaParams = get_record(node, RecordKind::Ra, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_RA);
            attrs.set_i32(names::CHANNEL_COUNT, ra.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, ra.sampling_rate as i32);
        }
        AudioCoding::Mp2 => {
            let mp2: Mp2Params =
                get_record(node, RecordKind::Mp2, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_MP2);
            attrs.set_i32(names::CHANNEL_COUNT, mp2.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, mp2.sample_rate as i32);
        }
        AudioCoding::Wma => {
            let wma: WmaParams =
                get_record(node, RecordKind::Wma, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_WMA);
            attrs.set_i32(names::CHANNEL_COUNT, wma.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, wma.sampling_rate as i32);
        }
        AudioCoding::Ape => {
            let ape: ApeParams =
                get_record(node, RecordKind::Ape, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_APE);
            attrs.set_i32(names::CHANNEL_COUNT, ape.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, ape.sampling_rate as i32);
            if let Some(enc) = PcmEncoding::from_bits(ape.bits_per_sample as i32) {
                attrs.set_i32(names::PCM_ENCODING, enc.as_i32());
            }
        }
        AudioCoding::Flac => {
            let flac: FlacParams =
                get_record(node, RecordKind::Flac, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_FLAC);
            attrs.set_i32(names::CHANNEL_COUNT, flac.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, flac.sample_rate as i32);
            // the compression level field carries the encoding, see
            // FlacParams
            if PcmEncoding::from_i32(flac.compression_level).is_some() {
                attrs.set_i32(names::PCM_ENCODING, flac.compression_level);
            }
        }
        AudioCoding::Dts => {
            let dts: DtsParams =
                get_record(node, RecordKind::Dts, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_DTS);
            attrs.set_i32(names::CHANNEL_COUNT, dts.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, dts.sampling_rate as i32);
        }
        AudioCoding::Ac3 => {
            let ac3: Ac3Params =
                get_record(node, RecordKind::Ac3, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_AC3);
            attrs.set_i32(names::CHANNEL_COUNT, ac3.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, ac3.sample_rate as i32);
        }
        AudioCoding::AutoDetect => {
            let fallback: AudioFallbackParams =
                get_record(node, RecordKind::AudioFallback, port).map_err(ConfigError::from)?;
            attrs.set_str(names::MIME, mime::AUDIO_FALLBACK);
            attrs.set_i32(names::CHANNEL_COUNT, fallback.channels as i32);
            attrs.set_i32(names::SAMPLE_RATE, fallback.sample_rate as i32);
        }
        AudioCoding::Pcm | AudioCoding::Vorbis => {
            return Err(ConfigError::unsupported_format(format!(
                "no port format query for {coding:?}"
            )));
        }
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use softcodec_node::mock::MockNode;

    fn pcm_attrs(channels: i32, rate: i32) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.set_i32(names::CHANNEL_COUNT, channels);
        attrs.set_i32(names::SAMPLE_RATE, rate);
        attrs
    }

    fn stored_pcm(node: &MockNode) -> PcmParams {
        match node.record(RecordKind::Pcm, PortIndex::Output) {
            Some(ParamRecord::Pcm(p)) => p.clone(),
            other => panic!("no pcm record stored: {other:?}"),
        }
    }

    #[test]
    fn test_raw_pcm_default_sixteen_bit() {
        let mut node = MockNode::new();
        set_raw_audio_format(&mut node, &pcm_attrs(2, 44_100)).unwrap();

        let pcm = stored_pcm(&node);
        assert_eq!(pcm.channels, 2);
        assert_eq!(pcm.sampling_rate, 44_100);
        assert_eq!(pcm.bits_per_sample, 16);
        assert_eq!(pcm.numeric, NumericData::Signed);
        assert!(pcm.interleaved);
        assert_eq!(pcm.channel_mapping.len(), 2);

        match node.record(RecordKind::PortDefinition, PortIndex::Output) {
            Some(ParamRecord::PortDefinition(def)) => {
                assert_eq!(def.encoding, PortEncoding::Pcm);
            }
            other => panic!("port definition not set: {other:?}"),
        }
    }

    #[test]
    fn test_raw_pcm_float_depth() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 96_000);
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Float.as_i32());
        set_raw_audio_format(&mut node, &attrs).unwrap();

        let pcm = stored_pcm(&node);
        assert_eq!(pcm.bits_per_sample, 32);
        assert_eq!(pcm.numeric, NumericData::Float);
    }

    #[test]
    fn test_raw_pcm_downgrades_to_sixteen_bit() {
        let mut node = MockNode::new();
        node.accept_pcm_bits(&[16]);
        let mut attrs = pcm_attrs(2, 48_000);
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Float.as_i32());

        set_raw_audio_format(&mut node, &attrs).unwrap();

        let pcm = stored_pcm(&node);
        assert_eq!(pcm.bits_per_sample, 16);
        assert_eq!(pcm.numeric, NumericData::Signed);
    }

    #[test]
    fn test_raw_pcm_sixteen_bit_rejection_is_final() {
        let mut node = MockNode::new();
        node.accept_pcm_bits(&[]);
        let err = set_raw_audio_format(&mut node, &pcm_attrs(2, 48_000)).unwrap_err();
        assert!(err.is_store());
    }

    #[test]
    fn test_raw_pcm_unknown_encoding_fails() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 48_000);
        attrs.set_i32(names::PCM_ENCODING, 77);
        let err = set_raw_audio_format(&mut node, &attrs).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_raw_pcm_many_channels_leaves_port_alone() {
        let mut node = MockNode::new();
        set_raw_audio_format(&mut node, &pcm_attrs(10, 48_000)).unwrap();
        assert!(node.record(RecordKind::Pcm, PortIndex::Output).is_none());
    }

    fn wma_attrs() -> AttributeMap {
        let mut attrs = pcm_attrs(2, 44_100);
        attrs.set_i32(names::BITRATE, 128_000);
        attrs.set_i32(names::BLOCK_ALIGN, 4096);
        attrs.set_i32(names::WMA_VERSION, WmaVersion::WmaPro as i32);
        attrs
    }

    #[test]
    fn test_wma_marshals_record() {
        let mut node = MockNode::new();
        set_wma_format(&mut node, &wma_attrs()).unwrap();

        match node.record(RecordKind::Wma, PortIndex::Input) {
            Some(ParamRecord::Wma(wma)) => {
                assert_eq!(wma.channels, 2);
                assert_eq!(wma.sampling_rate, 44_100);
                assert_eq!(wma.bit_rate, 128_000);
                assert_eq!(wma.block_align, 4096);
                assert_eq!(wma.format, WmaFormat::Format8);
            }
            other => panic!("wma record not set: {other:?}"),
        }
    }

    #[test]
    fn test_wma_legacy_block_align_fallback() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 44_100);
        attrs.set_i32(names::BITRATE, 128_000);
        attrs.set_i32(names::WMA_VERSION, WmaVersion::Wma as i32);
        attrs.set_i32(names::WMA_BLOCK_ALIGN, 2048);
        set_wma_format(&mut node, &attrs).unwrap();

        match node.record(RecordKind::Wma, PortIndex::Input) {
            Some(ParamRecord::Wma(wma)) => assert_eq!(wma.block_align, 2048),
            other => panic!("wma record not set: {other:?}"),
        }
    }

    #[test]
    fn test_wma_missing_block_align_fails() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 44_100);
        attrs.set_i32(names::BITRATE, 128_000);
        attrs.set_i32(names::WMA_VERSION, WmaVersion::Wma as i32);
        let err = set_wma_format(&mut node, &attrs).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingAttribute(names::BLOCK_ALIGN)
        ));
        // validation precedes any node traffic
        assert!(node.set_log.is_empty());
    }

    #[test]
    fn test_wma_bits_per_sample_overrides_pcm_depth() {
        let mut node = MockNode::new();
        let mut attrs = wma_attrs();
        attrs.set_i32(names::WMA_BITS_PER_SAMPLE, 8);
        set_wma_format(&mut node, &attrs).unwrap();
        assert_eq!(stored_pcm(&node).bits_per_sample, 8);
    }

    #[test]
    fn test_wma_unknown_version_keeps_node_format() {
        let mut node = MockNode::new();
        node.preload(
            RecordKind::Wma,
            PortIndex::Input,
            ParamRecord::Wma(WmaParams {
                format: WmaFormat::Format9,
                ..WmaParams::default()
            }),
        );
        let mut attrs = wma_attrs();
        attrs.set_i32(names::WMA_VERSION, 99);
        set_wma_format(&mut node, &attrs).unwrap();

        match node.record(RecordKind::Wma, PortIndex::Input) {
            Some(ParamRecord::Wma(wma)) => assert_eq!(wma.format, WmaFormat::Format9),
            other => panic!("wma record not set: {other:?}"),
        }
    }

    #[test]
    fn test_ra_block_align_rides_num_regions() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 44_100);
        attrs.set_i32(names::BLOCK_ALIGN, 960);
        set_ra_format(&mut node, &attrs).unwrap();

        match node.record(RecordKind::Ra, PortIndex::Input) {
            Some(ParamRecord::Ra(ra)) => {
                assert_eq!(ra.num_regions, 960);
                assert_eq!(ra.format, RaFormat::Unused);
            }
            other => panic!("ra record not set: {other:?}"),
        }
    }

    #[test]
    fn test_flac_encoding_rides_compression_level() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 96_000);
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Float.as_i32());
        set_flac_format(&mut node, &attrs).unwrap();

        match node.record(RecordKind::Flac, PortIndex::Input) {
            Some(ParamRecord::Flac(flac)) => {
                assert_eq!(flac.compression_level, PcmEncoding::Float.as_i32());
            }
            other => panic!("flac record not set: {other:?}"),
        }
    }

    #[test]
    fn test_ape_requires_encoding() {
        let mut node = MockNode::new();
        let err = set_ape_format(&mut node, &pcm_attrs(2, 44_100)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingAttribute(names::PCM_ENCODING)
        ));
    }

    #[test]
    fn test_store_failure_aborts() {
        let mut node = MockNode::new();
        node.reject_get(RecordKind::Vorbis);
        let err = set_vorbis_format(&mut node, &pcm_attrs(2, 48_000)).unwrap_err();
        assert!(err.is_store());
        assert_eq!(node.set_count(RecordKind::Vorbis), 0);
    }

    #[test]
    fn test_configure_audio_dispatch() {
        let mut node = MockNode::new();
        let mut track = TrackDescriptor::decoder(mime::AUDIO_AC3);
        track.attributes = pcm_attrs(6, 48_000);
        configure_audio(&mut node, &track).unwrap();
        assert_eq!(node.set_count(RecordKind::Ac3), 1);
    }

    #[test]
    fn test_configure_audio_foreign_mime_noop() {
        let mut node = MockNode::new();
        let track = TrackDescriptor::decoder("audio/opus");
        configure_audio(&mut node, &track).unwrap();
        assert!(node.set_log.is_empty());
    }

    #[test]
    fn test_query_inverts_configure() {
        let mut node = MockNode::new();
        let mut attrs = pcm_attrs(2, 96_000);
        attrs.set_i32(names::PCM_ENCODING, PcmEncoding::Float.as_i32());
        set_flac_format(&mut node, &attrs).unwrap();

        let back = query_audio_port_format(&mut node, PortIndex::Input, AudioCoding::Flac).unwrap();
        assert_eq!(back.str(names::MIME), Some(mime::AUDIO_FLAC));
        assert_eq!(back.i32(names::CHANNEL_COUNT), Some(2));
        assert_eq!(back.i32(names::SAMPLE_RATE), Some(96_000));
        assert_eq!(
            back.i32(names::PCM_ENCODING),
            Some(PcmEncoding::Float.as_i32())
        );
    }
}
