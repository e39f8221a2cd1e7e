//! Suggested unit for a form type
//!
//! The router hashes a 4-byte tag into `1..=255` (unit 0 stays the working
//! unit). The mapping is advisory: versions disagree with each other and
//! nothing stores content by it.

use std::fmt;

use iffclip_formats::TypeTag;
use serde::{Deserialize, Serialize};

use crate::Unit;

/// Router hash revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterVersion {
    /// Byte mixing with a murmur3 32-bit finaliser
    V1,
    /// Byte mixing with a multiply by 209 and a high-half fold
    #[default]
    V2,
}

impl fmt::Display for RouterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Router bound to one hash revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitRouter {
    version: RouterVersion,
}

impl UnitRouter {
    /// Create a router for `version`
    pub const fn new(version: RouterVersion) -> Self {
        Self { version }
    }

    /// Hash revision in use
    pub const fn version(&self) -> RouterVersion {
        self.version
    }

    /// Suggested unit for `tag`
    pub fn route(&self, tag: TypeTag) -> Unit {
        route_tag(tag, self.version)
    }
}

/// Map `tag` to a unit in `1..=255`
pub fn route_tag(tag: TypeTag, version: RouterVersion) -> Unit {
    let mixed = mix_bytes(tag);
    let hash = match version {
        RouterVersion::V1 => fmix32(mixed),
        RouterVersion::V2 => mixed.wrapping_mul(209) ^ (mixed >> 16),
    };
    // hash % 255 < 255, so the sum fits in a u8
    Unit::new((hash % 255) as u8 + 1)
}

/// First tag byte lowest, last tag byte highest
const fn mix_bytes(tag: TypeTag) -> u32 {
    u32::from_le_bytes(tag.to_bytes())
}

const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
