//! Read-only introspection over the routing table.
//!
//! Every function here is a plain read of the registry and can be called on
//! any state view, including an uncommitted overlay.

use crate::core::registry::Registry;
use crate::storage::namespace::Namespace;
use crate::storage::state::{State, StateRead, TypedState, TypedStateMut};
use crate::types::address::Address;
use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::selector::Selector;
use std::sync::LazyLock;

static INTERFACE_STORAGE: LazyLock<Namespace> =
    LazyLock::new(|| Namespace::new("diamond.standard.interfaces"));

/// A module together with the selectors currently routed to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facet {
    pub module: Address,
    pub selectors: Vec<Selector>,
}

impl Encode for Facet {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.module.encode(out);
        self.selectors.encode(out);
    }
}

impl Decode for Facet {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            module: Address::decode(input)?,
            selectors: Vec::<Selector>::decode(input)?,
        })
    }
}

/// All modules and their selectors.
pub fn facets<S: StateRead + ?Sized>(state: &S) -> Vec<Facet> {
    let registry = Registry::new(state);
    registry
        .list_modules()
        .into_iter()
        .map(|module| Facet {
            module,
            selectors: registry.list_identifiers(module),
        })
        .collect()
}

/// Selectors routed to `module`; empty for unknown modules.
pub fn facet_function_selectors<S: StateRead + ?Sized>(state: &S, module: Address) -> Vec<Selector> {
    Registry::new(state).list_identifiers(module)
}

pub fn facet_addresses<S: StateRead + ?Sized>(state: &S) -> Vec<Address> {
    Registry::new(state).list_modules()
}

/// Module serving `selector`, or the zero address if none does.
pub fn facet_address<S: StateRead + ?Sized>(state: &S, selector: Selector) -> Address {
    Registry::new(state).resolve(selector).unwrap_or(Address::ZERO)
}

/// Returns true if the diamond declared support for `interface_id`.
pub fn supports_interface<S: StateRead + ?Sized>(state: &S, interface_id: Selector) -> bool {
    state
        .read(INTERFACE_STORAGE.entry("supported", &interface_id))
        .unwrap_or(false)
}

/// Declares (or withdraws) support for an interface id.
pub fn set_supported_interface<S: State + ?Sized>(
    state: &mut S,
    interface_id: Selector,
    supported: bool,
) {
    let key = INTERFACE_STORAGE.entry("supported", &interface_id);
    if supported {
        state.write(key, &true);
    } else {
        state.delete(key);
    }
}
