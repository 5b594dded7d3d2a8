//! 32-byte Keccak-256 hash type with an incremental builder.

use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Keccak-256 hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte hash used for selectors, storage keys and addresses.
///
/// This type is `Copy` since it is used as the key type of every state access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates a new Keccak-256 hash builder for incremental hashing.
    pub fn keccak() -> HashBuilder {
        HashBuilder::new()
    }

    /// Hashes a single byte slice.
    pub fn digest(data: &[u8]) -> Hash {
        Self::keccak().chain(data).finalize()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Encode for Hash {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.0);
    }
}

impl Decode for Hash {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Hash(<[u8; HASH_LEN]>::decode(input)?))
    }
}

/// Incremental Keccak-256 hash builder.
///
/// Implements [`EncodeSink`] so encodable types can be hashed directly
/// without intermediate byte buffers.
pub struct HashBuilder {
    hasher: Keccak256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Builder-style variant of [`update`](Self::update).
    pub fn chain(mut self, data: &[u8]) -> Self {
        self.hasher.update(data);
        self
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}
