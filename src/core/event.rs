//! Events emitted by successful calls.
//!
//! Events are buffered alongside a call's state writes and only reach the
//! diamond's log when the call commits.

use crate::core::cut::FacetCut;
use crate::types::address::Address;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiamondEvent {
    /// A cut batch was applied.
    DiamondCut {
        cuts: Vec<FacetCut>,
        init: Option<Address>,
        calldata: Vec<u8>,
    },
    /// Ownership moved from `previous` to `new`.
    OwnershipTransferred { previous: Address, new: Address },
    /// A bare value transfer was accepted.
    Received { from: Address, value: u128 },
}

impl fmt::Display for DiamondEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiamondEvent::DiamondCut { cuts, init, .. } => {
                write!(f, "DiamondCut(ops={}", cuts.len())?;
                if let Some(init) = init {
                    write!(f, ", init={init}")?;
                }
                write!(f, ")")
            }
            DiamondEvent::OwnershipTransferred { previous, new } => {
                write!(f, "OwnershipTransferred({previous} -> {new})")
            }
            DiamondEvent::Received { from, value } => write!(f, "Received({from}, {value})"),
        }
    }
}
