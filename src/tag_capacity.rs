use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

/// User writable memory of the NTAG chips cards are written to
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    uniffi::Enum,
    derive_more::Display,
    strum::EnumIter,
    Serialize,
    Deserialize,
)]
pub enum TagCapacity {
    #[display("NTAG213")]
    Ntag213,

    #[display("NTAG215")]
    Ntag215,

    #[display("NTAG216")]
    Ntag216,
}

impl TagCapacity {
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Ntag213 => 144,
            Self::Ntag215 => 504,
            Self::Ntag216 => 888,
        }
    }

    /// Match a capacity read from the tag against the known chips
    pub fn identify(bytes: u32) -> Option<Self> {
        Self::iter().find(|capacity| capacity.bytes() == bytes)
    }

    /// Smallest known chip that holds `size` bytes
    pub fn smallest_fitting(size: usize) -> Option<Self> {
        Self::iter().find(|capacity| size <= capacity.bytes() as usize)
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn tag_capacity_bytes(capacity: TagCapacity) -> u32 {
        capacity.bytes()
    }

    #[uniffi::export]
    fn tag_capacity_to_string(capacity: TagCapacity) -> String {
        capacity.to_string()
    }

    #[uniffi::export]
    fn identify_tag_capacity(bytes: u32) -> Option<TagCapacity> {
        TagCapacity::identify(bytes)
    }

    #[uniffi::export]
    fn all_tag_capacities() -> Vec<TagCapacity> {
        TagCapacity::iter().collect()
    }
}
