//! Fixed-size buffer types.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A 32-byte buffer, used pervasively for hashes, commitments and addresses.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
)]
pub struct Buf32(pub [u8; 32]);

impl Buf32 {
    pub const LEN: usize = 32;

    /// The all-zeroes buffer.
    pub fn zero() -> Self {
        Self([0; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for Buf32 {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl From<Buf32> for [u8; 32] {
    fn from(value: Buf32) -> Self {
        value.0
    }
}

impl AsRef<[u8; 32]> for Buf32 {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Display for Buf32 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Abbreviated like `deadbeef..beefdead` since the full hex is unwieldy
        // in log output.
        let mut buf = [0u8; 8];
        hex::encode_to_slice(&self.0[..4], &mut buf).map_err(|_| core::fmt::Error)?;
        f.write_str(core::str::from_utf8(&buf).map_err(|_| core::fmt::Error)?)?;
        f.write_str("..")?;
        hex::encode_to_slice(&self.0[28..], &mut buf).map_err(|_| core::fmt::Error)?;
        f.write_str(core::str::from_utf8(&buf).map_err(|_| core::fmt::Error)?)
    }
}

impl core::fmt::Debug for Buf32 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = [0u8; 64];
        hex::encode_to_slice(self.0, &mut buf).map_err(|_| core::fmt::Error)?;
        f.write_str(core::str::from_utf8(&buf).map_err(|_| core::fmt::Error)?)
    }
}

impl Serialize for Buf32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Buf32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <&str>::deserialize(deserializer)?;
        let mut inner = [0u8; 32];
        hex::decode_to_slice(s, &mut inner).map_err(de::Error::custom)?;
        Ok(Self(inner))
    }
}
