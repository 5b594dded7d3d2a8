//! Durable state backends.
//!
//! A diamond owns exactly one [`StateStore`]. Calls never write to it
//! directly: they run on an [`OverlayState`](crate::storage::state::OverlayState)
//! and the collected [`StateWrites`] are applied in one batch once the call
//! succeeds.

use crate::storage::state::{StateRead, StateWrites};
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use dashmap::DashMap;

/// Durable key-value store backing a diamond.
///
/// Implementations must be thread-safe so a diamond can be shared behind the
/// host application's own synchronization.
pub trait StateStore: StateRead + Send + Sync {
    /// Applies a batch of writes. `None` values indicate deletions.
    fn apply_batch(&self, writes: StateWrites);
    /// Returns a digest committing to the full store contents.
    fn state_root(&self) -> Hash;
}

/// Allows iteration over all key-value pairs in the store.
pub trait IterableState {
    /// Returns an iterator over all key-value pairs, in no particular order.
    fn iter_all(&self) -> Box<dyn Iterator<Item = (Hash, Vec<u8>)> + '_>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<Hash, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateRead for MemoryStore {
    fn get(&self, key: Hash) -> Option<Vec<u8>> {
        self.entries.get(&key).map(|v| v.value().clone())
    }

    fn contains_key(&self, key: Hash) -> bool {
        self.entries.contains_key(&key)
    }
}

impl StateStore for MemoryStore {
    fn apply_batch(&self, writes: StateWrites) {
        for (key, value) in writes.0 {
            match value {
                Some(v) => {
                    self.entries.insert(key, v);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
    }

    /// Hashes every entry in key order; the empty store has the zero root.
    fn state_root(&self) -> Hash {
        if self.entries.is_empty() {
            return Hash::zero();
        }
        let mut entries: Vec<(Hash, Vec<u8>)> = self.iter_all().collect();
        entries.sort_unstable_by_key(|(k, _)| *k);

        let mut h = Hash::keccak();
        h.update(b"STATE_ROOT");
        for (key, value) in &entries {
            key.encode(&mut h);
            value.encode(&mut h);
        }
        h.finalize()
    }
}

impl IterableState for MemoryStore {
    fn iter_all(&self) -> Box<dyn Iterator<Item = (Hash, Vec<u8>)> + '_> {
        Box::new(
            self.entries
                .iter()
                .map(|entry| (*entry.key(), entry.value().clone())),
        )
    }
}
