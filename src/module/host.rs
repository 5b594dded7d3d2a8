//! Address → code table.

use crate::module::Module;
use crate::types::address::Address;
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Holds deployed module code and hands out deterministic addresses.
///
/// Deployed code is immutable: an address, once assigned, always resolves
/// to the same module.
#[derive(Default)]
pub struct ModuleHost {
    code: HashMap<Address, Arc<dyn Module>>,
    deployed: Vec<Address>,
    nonce: u64,
}

impl ModuleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys `module` and returns its address.
    pub fn deploy<M: Module + 'static>(&mut self, module: M) -> Address {
        let address = self.derive_address(b"MODULE");
        self.code.insert(address, Arc::new(module));
        self.deployed.push(address);
        address
    }

    /// Allocates a fresh address as `keccak256(domain ‖ nonce)[12..]`.
    pub fn derive_address(&mut self, domain: &[u8]) -> Address {
        let mut h = Hash::keccak();
        h.update(domain);
        self.nonce.encode(&mut h);
        self.nonce += 1;
        Address::from_hash(&h.finalize())
    }

    /// Code deployed at `address`, if any.
    pub fn code_at(&self, address: Address) -> Option<Arc<dyn Module>> {
        self.code.get(&address).cloned()
    }

    /// Returns true if `address` holds executable code.
    pub fn has_code(&self, address: Address) -> bool {
        self.code.contains_key(&address)
    }

    /// Looks up a deployed module by its [`Module::name`]. When several
    /// modules share a name, the earliest deployment wins.
    pub fn find(&self, name: &str) -> Option<Address> {
        self.deployed
            .iter()
            .copied()
            .find(|address| self.code.get(address).is_some_and(|m| m.name() == name))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl fmt::Debug for ModuleHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHost")
            .field("modules", &self.code.len())
            .field("nonce", &self.nonce)
            .finish()
    }
}
