//! Selector → module routing table kept in the diamond's shared state.
//!
//! Layout under the `diamond.standard.diamond.storage` namespace:
//!
//! | field             | key      | value                         |
//! |-------------------|----------|-------------------------------|
//! | `selector`        | selector | [`SelectorEntry`]             |
//! | `module_selectors`| module   | `Vec<Selector>` in bind order |
//! | `module_position` | module   | index into `modules`          |
//! | `modules`         | -        | `Vec<Address>`                |
//! | `selector_count`  | -        | `u64`                         |
//! | `protected`       | selector | `bool`                        |
//!
//! Every mutation goes through [`RegistryMut`], which keeps the forward
//! index (`selector`) and the reverse indices (`module_selectors`, `modules`)
//! consistent. Removal uses swap-remove, so list order is bind order only
//! until the first removal.

use crate::storage::namespace::Namespace;
use crate::storage::state::{State, StateRead, TypedState, TypedStateMut};
use crate::types::address::Address;
use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::selector::Selector;
use std::sync::LazyLock;

static DIAMOND_STORAGE: LazyLock<Namespace> =
    LazyLock::new(|| Namespace::new("diamond.standard.diamond.storage"));

/// Namespace holding the routing table.
pub fn namespace() -> &'static Namespace {
    &DIAMOND_STORAGE
}

/// Forward-index record: where a selector is routed and its position in the
/// module's selector list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectorEntry {
    pub module: Address,
    pub position: u32,
}

impl Encode for SelectorEntry {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.module.encode(out);
        self.position.encode(out);
    }
}

impl Decode for SelectorEntry {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            module: Address::decode(input)?,
            position: u32::decode(input)?,
        })
    }
}

/// Read-only access to the routing table.
pub struct Registry<'s, S: StateRead + ?Sized> {
    state: &'s S,
}

impl<'s, S: StateRead + ?Sized> Registry<'s, S> {
    pub fn new(state: &'s S) -> Self {
        Self { state }
    }

    /// Full forward-index record of a selector, if bound.
    pub fn entry(&self, selector: Selector) -> Option<SelectorEntry> {
        self.state
            .read::<SelectorEntry>(DIAMOND_STORAGE.entry("selector", &selector))
            .filter(|e| !e.module.is_zero())
    }

    /// Module a selector routes to; `None` for unknown selectors.
    pub fn resolve(&self, selector: Selector) -> Option<Address> {
        self.entry(selector).map(|e| e.module)
    }

    /// Distinct modules with at least one bound selector.
    pub fn list_modules(&self) -> Vec<Address> {
        self.state
            .read(DIAMOND_STORAGE.slot("modules"))
            .unwrap_or_default()
    }

    /// Selectors bound to `module`; empty if the module is unknown.
    pub fn list_identifiers(&self, module: Address) -> Vec<Selector> {
        self.state
            .read(DIAMOND_STORAGE.entry("module_selectors", &module))
            .unwrap_or_default()
    }

    /// Total number of bound selectors.
    pub fn identifier_count(&self) -> u64 {
        self.state
            .read(DIAMOND_STORAGE.slot("selector_count"))
            .unwrap_or(0)
    }

    /// Returns true if the selector can no longer be replaced or removed.
    pub fn is_protected(&self, selector: Selector) -> bool {
        self.state
            .read(DIAMOND_STORAGE.entry("protected", &selector))
            .unwrap_or(false)
    }
}

/// Mutating access to the routing table.
///
/// `bind` and `unbind` perform no policy checks; the cut processor validates
/// every operation before calling them.
pub struct RegistryMut<'s, S: State + ?Sized> {
    state: &'s mut S,
}

impl<'s, S: State + ?Sized> RegistryMut<'s, S> {
    pub fn new(state: &'s mut S) -> Self {
        Self { state }
    }

    /// Read-only view over the same state.
    pub fn view(&self) -> Registry<'_, S> {
        Registry::new(&*self.state)
    }

    /// Routes `selector` to `module`, replacing any existing binding.
    ///
    /// Binding to the zero address is the same as [`unbind`](Self::unbind).
    pub fn bind(&mut self, selector: Selector, module: Address) {
        if module.is_zero() {
            self.unbind(selector);
            return;
        }
        match self.view().resolve(selector) {
            Some(current) if current == module => return,
            Some(_) => self.unbind(selector),
            None => {}
        }

        let mut selectors = self.view().list_identifiers(module);
        if selectors.is_empty() {
            self.add_module(module);
        }
        let position = selectors.len() as u32;
        selectors.push(selector);
        self.set_module_selectors(module, &selectors);
        self.state.write(
            DIAMOND_STORAGE.entry("selector", &selector),
            &SelectorEntry { module, position },
        );
        self.adjust_count(1);
    }

    /// Removes the binding of `selector`; a no-op if it is not bound.
    pub fn unbind(&mut self, selector: Selector) {
        let Some(entry) = self.view().entry(selector) else {
            return;
        };
        let mut selectors = self.view().list_identifiers(entry.module);
        let position = entry.position as usize;
        if position < selectors.len() {
            selectors.swap_remove(position);
            if let Some(&moved) = selectors.get(position) {
                self.state.write(
                    DIAMOND_STORAGE.entry("selector", &moved),
                    &SelectorEntry {
                        module: entry.module,
                        position: entry.position,
                    },
                );
            }
        }
        self.state
            .delete(DIAMOND_STORAGE.entry("selector", &selector));

        if selectors.is_empty() {
            self.state
                .delete(DIAMOND_STORAGE.entry("module_selectors", &entry.module));
            self.remove_module(entry.module);
        } else {
            self.set_module_selectors(entry.module, &selectors);
        }
        self.adjust_count(-1);
    }

    /// Marks a selector as protected. Protection cannot be lifted.
    pub fn protect(&mut self, selector: Selector) {
        self.state
            .write(DIAMOND_STORAGE.entry("protected", &selector), &true);
    }

    fn set_module_selectors(&mut self, module: Address, selectors: &[Selector]) {
        self.state
            .write(DIAMOND_STORAGE.entry("module_selectors", &module), selectors);
    }

    fn add_module(&mut self, module: Address) {
        let mut modules = self.view().list_modules();
        let position = modules.len() as u32;
        modules.push(module);
        self.state.write(DIAMOND_STORAGE.slot("modules"), &modules);
        self.state
            .write(DIAMOND_STORAGE.entry("module_position", &module), &position);
    }

    fn remove_module(&mut self, module: Address) {
        let position_key = DIAMOND_STORAGE.entry("module_position", &module);
        let Some(position) = self.state.read::<u32>(position_key) else {
            return;
        };
        let mut modules = self.view().list_modules();
        let position = position as usize;
        if position < modules.len() {
            modules.swap_remove(position);
            if let Some(&moved) = modules.get(position) {
                self.state.write(
                    DIAMOND_STORAGE.entry("module_position", &moved),
                    &(position as u32),
                );
            }
        }
        self.state.delete(position_key);
        self.state.write(DIAMOND_STORAGE.slot("modules"), &modules);
    }

    fn adjust_count(&mut self, delta: i64) {
        let count = self.view().identifier_count();
        let next = if delta < 0 {
            count.saturating_sub(delta.unsigned_abs())
        } else {
            count.saturating_add(delta as u64)
        };
        self.state.write(DIAMOND_STORAGE.slot("selector_count"), &next);
    }
}
