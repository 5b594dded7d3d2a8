//! 20-byte addresses identifying diamonds, modules and callers.

use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::hash::Hash;
use std::fmt;

/// Address length in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Fixed-size 20-byte address.
///
/// The all-zero address is the "no module" sentinel: a registry entry pointing
/// at it is treated as absent and `Remove` cuts must target it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// The zero/sentinel address.
    pub const ZERO: Address = Address([0u8; ADDRESS_SIZE]);

    /// Returns true for the sentinel address.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Derives an address from the last 20 bytes of a hash.
    pub fn from_hash(hash: &Hash) -> Self {
        let mut addr = [0u8; ADDRESS_SIZE];
        addr.copy_from_slice(&hash.0[32 - ADDRESS_SIZE..]);
        Address(addr)
    }

    /// Derives an address by hashing an arbitrary label.
    ///
    /// Handy for naming principals (owners, callers) in tooling and tests.
    pub fn from_label(label: &str) -> Self {
        Self::from_hash(&Hash::keccak().chain(b"ACCOUNT").chain(label.as_bytes()).finalize())
    }

    /// Parses a `0x`-prefixed (or bare) 40-digit hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != ADDRESS_SIZE * 2 {
            return None;
        }
        let mut addr = [0u8; ADDRESS_SIZE];
        for (i, byte) in addr.iter_mut().enumerate() {
            *byte = u8::from_str_radix(digits.get(i * 2..i * 2 + 2)?, 16).ok()?;
        }
        Some(Address(addr))
    }

    /// Returns the address as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Encode for Address {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.0);
    }
}

impl Decode for Address {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Address(<[u8; ADDRESS_SIZE]>::decode(input)?))
    }
}
