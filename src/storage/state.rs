//! Shared-state access and overlay abstractions.
//!
//! Every module routed to by a diamond reads and writes the diamond's own
//! state through the [`State`] trait. [`OverlayState`] buffers writes on top of
//! a read-only base so that a call (or a cut batch) can be committed as a
//! whole or discarded without leaving partial effects behind.

use crate::types::encoding::{Decode, Encode};
use crate::types::hash::Hash;
use std::collections::BTreeMap;

/// Read side of the key-value state. Keys are always hashes.
pub trait StateRead {
    /// Retrieves a value by key, returning `None` if the key does not exist.
    fn get(&self, key: Hash) -> Option<Vec<u8>>;

    /// Returns true if the key holds a value.
    fn contains_key(&self, key: Hash) -> bool {
        self.get(key).is_some()
    }
}

/// Mutable key-value state handed to modules during execution.
pub trait State: StateRead {
    /// Stores a key-value pair, overwriting any existing value.
    fn push(&mut self, key: Hash, value: Vec<u8>);
    /// Removes a key from storage.
    fn delete(&mut self, key: Hash);
}

/// Typed reads on top of [`StateRead`].
///
/// Values that fail to decode read as absent; every stored value is written by
/// [`TypedStateMut::write`] with the same codec.
pub trait TypedState: StateRead {
    /// Reads and decodes the value at `key`.
    fn read<T: Decode>(&self, key: Hash) -> Option<T> {
        self.get(key).and_then(|bytes| T::from_bytes(&bytes).ok())
    }
}

impl<S: StateRead + ?Sized> TypedState for S {}

/// Typed writes on top of [`State`].
pub trait TypedStateMut: State {
    /// Encodes and stores `value` at `key`.
    fn write<T: Encode + ?Sized>(&mut self, key: Hash, value: &T) {
        self.push(key, value.to_vec());
    }
}

impl<S: State + ?Sized> TypedStateMut for S {}

/// Pending writes collected from an overlay: `Some(value)` for insertions,
/// `None` for deletions.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StateWrites(pub Vec<(Hash, Option<Vec<u8>>)>);

impl StateWrites {
    /// Number of buffered writes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replays the writes onto a parent state.
    pub fn apply_to<S: State + ?Sized>(self, target: &mut S) {
        for (key, value) in self.0 {
            match value {
                Some(v) => target.push(key, v),
                None => target.delete(key),
            }
        }
    }
}

/// Write-buffering overlay on top of a base state.
///
/// Reads fall through to the base for keys not yet written. Overlays nest: a
/// nested call runs on an overlay whose base is the caller's overlay, and its
/// writes are replayed onto the caller only when it succeeds.
pub struct OverlayState<'a, B: StateRead + ?Sized> {
    /// Underlying state for read-through on cache misses.
    base: &'a B,
    /// Pending writes: `Some(value)` for insertions, `None` for deletions.
    writes: BTreeMap<Hash, Option<Vec<u8>>>,
}

impl<'a, B: StateRead + ?Sized> OverlayState<'a, B> {
    /// Creates a new overlay backed by the given base state.
    pub fn new(base: &'a B) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Consumes the overlay and returns the pending writes in key order.
    pub fn into_writes(self) -> StateWrites {
        StateWrites(self.writes.into_iter().collect())
    }
}

impl<'a, B: StateRead + ?Sized> StateRead for OverlayState<'a, B> {
    fn get(&self, key: Hash) -> Option<Vec<u8>> {
        if let Some(v) = self.writes.get(&key) {
            return v.clone();
        }
        self.base.get(key)
    }
}

impl<'a, B: StateRead + ?Sized> State for OverlayState<'a, B> {
    fn push(&mut self, key: Hash, value: Vec<u8>) {
        self.writes.insert(key, Some(value));
    }

    fn delete(&mut self, key: Hash) {
        self.writes.insert(key, None);
    }
}
