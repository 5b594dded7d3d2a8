//! Collision-avoiding storage addressing.
//!
//! Each component that keeps data in the diamond's shared state owns a
//! [`Namespace`] derived from a fixed label. Keys are hashed from the namespace
//! root, a length-prefixed field name and the encoded entry key, so two
//! independently written modules only alias each other if they pick the same
//! label.

use crate::types::encoding::Encode;
use crate::types::hash::{Hash, HashBuilder};

/// Fixed region of the shared state owned by one component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Namespace {
    label: &'static str,
    root: Hash,
}

impl Namespace {
    /// Computes the namespace root as `keccak256(label)`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            root: Hash::digest(label.as_bytes()),
        }
    }

    /// Label the namespace was derived from.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Root hash of the namespace.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Key of a single-value field.
    pub fn slot(&self, field: &str) -> Hash {
        self.field(field).finalize()
    }

    /// Key of one entry of a mapping field.
    pub fn entry<K: Encode + ?Sized>(&self, field: &str, key: &K) -> Hash {
        let mut h = self.field(field);
        key.encode(&mut h);
        h.finalize()
    }

    fn field(&self, field: &str) -> HashBuilder {
        let mut h = Hash::keccak();
        h.update(b"NAMESPACE");
        h.update(self.root.as_slice());
        field.len().encode(&mut h);
        h.update(field.as_bytes());
        h
    }
}
