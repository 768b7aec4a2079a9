//! Version and sample-encoding enumerations carried in attribute values.
//!
//! The numeric discriminants are wire values: containers and extractors put
//! them into the attribute map as plain integers, so they must stay stable.

use serde::{Deserialize, Serialize};

/// Requested PCM sample encoding, as carried by the `pcm-encoding`
/// attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcmEncoding {
    /// Signed 16-bit samples.
    Pcm16 = 2,
    /// Unsigned 8-bit samples.
    Pcm8 = 3,
    /// 32-bit float samples.
    Float = 4,
}

impl PcmEncoding {
    /// Decode the wire value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            2 => Some(Self::Pcm16),
            3 => Some(Self::Pcm8),
            4 => Some(Self::Float),
            _ => None,
        }
    }

    /// The wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Bits per sample for this encoding.
    pub fn bits(self) -> u32 {
        match self {
            Self::Pcm8 => 8,
            Self::Pcm16 => 16,
            Self::Float => 32,
        }
    }

    /// Map a raw bit depth back to an encoding. Depths without a PCM
    /// encoding equivalent return `None`.
    pub fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            8 => Some(Self::Pcm8),
            16 => Some(Self::Pcm16),
            32 => Some(Self::Float),
            _ => None,
        }
    }
}

impl Default for PcmEncoding {
    fn default() -> Self {
        Self::Pcm16
    }
}

/// WMA codec version, `wma-version` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WmaVersion {
    /// WMA standard (v2).
    Wma = 1,
    /// WMA Professional.
    WmaPro = 2,
    /// WMA Lossless.
    WmaLossless = 3,
}

impl WmaVersion {
    /// Decode the wire value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Wma),
            2 => Some(Self::WmaPro),
            3 => Some(Self::WmaLossless),
            _ => None,
        }
    }
}

/// WMV codec version, `wmv-version` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WmvVersion {
    /// WMV 7.
    Wmv7 = 1,
    /// WMV 8. The only version the native decoder supports.
    Wmv8 = 2,
    /// WMV 9.
    Wmv9 = 3,
}

impl WmvVersion {
    /// The version handled natively; anything else routes to the fallback
    /// decoder.
    pub const NATIVE: WmvVersion = WmvVersion::Wmv8;

    /// Decode the wire value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Wmv7),
            2 => Some(Self::Wmv8),
            3 => Some(Self::Wmv9),
            _ => None,
        }
    }

    /// The wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// RealVideo codec version, `rv-version` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RvVersion {
    /// RealVideo G2.
    G2 = 1,
    /// RealVideo 8.
    Rv8 = 2,
    /// RealVideo 9.
    Rv9 = 3,
}

impl RvVersion {
    /// Decode the wire value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::G2),
            2 => Some(Self::Rv8),
            3 => Some(Self::Rv9),
            _ => None,
        }
    }

    /// The wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// DivX codec version, `divx-version` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivxVersion {
    /// DivX 3.11.
    Divx311 = 1,
    /// DivX 4.
    Divx4 = 2,
    /// DivX 5.
    Divx5 = 3,
    /// DivX 6.
    Divx6 = 4,
}

impl DivxVersion {
    /// Decode the wire value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Divx311),
            2 => Some(Self::Divx4),
            3 => Some(Self::Divx5),
            4 => Some(Self::Divx6),
            _ => None,
        }
    }
}
