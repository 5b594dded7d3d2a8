//! 4-byte function identifiers.

use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::hash::Hash;
use std::fmt;

/// Selector length in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// Function identifier: the first four bytes of the Keccak-256 hash of a
/// canonical signature such as `transfer(address,uint256)`.
///
/// Collisions between unrelated signatures are possible in principle and are
/// not defended against; within one registry each selector maps to at most
/// one module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Selector(pub [u8; SELECTOR_SIZE]);

impl Selector {
    /// Derives the selector of a canonical function signature.
    pub fn from_signature(signature: &str) -> Self {
        let hash = Hash::digest(signature.as_bytes());
        let mut out = [0u8; SELECTOR_SIZE];
        out.copy_from_slice(&hash.0[..SELECTOR_SIZE]);
        Selector(out)
    }

    /// Builds a selector from its big-endian integer form (`0xa9059cbb`).
    pub const fn from_u32(value: u32) -> Self {
        Selector(value.to_be_bytes())
    }

    /// Returns the big-endian integer form.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Extracts the selector from the leading bytes of calldata.
    ///
    /// Calldata shorter than four bytes is zero-padded on the right.
    pub fn from_calldata(calldata: &[u8]) -> Self {
        let mut out = [0u8; SELECTOR_SIZE];
        let n = calldata.len().min(SELECTOR_SIZE);
        out[..n].copy_from_slice(&calldata[..n]);
        Selector(out)
    }

    /// Parses `0x`-prefixed (or bare) 8-digit hex.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != SELECTOR_SIZE * 2 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }
}

/// Computes an ERC-165 style interface id: the XOR of all member selectors.
pub fn interface_id(selectors: &[Selector]) -> Selector {
    Selector::from_u32(selectors.iter().fold(0, |acc, s| acc ^ s.as_u32()))
}

impl From<u32> for Selector {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.as_u32())
    }
}

impl Encode for Selector {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.0);
    }
}

impl Decode for Selector {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Selector(<[u8; SELECTOR_SIZE]>::decode(input)?))
    }
}
