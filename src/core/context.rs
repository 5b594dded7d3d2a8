//! Execution context handed to modules.
//!
//! A [`CallContext`] is how context-preserving invocation works outside a
//! VM: the module's code receives the diamond's state, the diamond's address
//! as `this`, and the original caller's identity. Nested invocations run on a
//! child overlay whose writes and events are merged into the parent only when
//! the nested call succeeds.

use crate::core::dispatch;
use crate::core::errors::CallError;
use crate::core::event::DiamondEvent;
use crate::module::host::ModuleHost;
use crate::storage::state::{OverlayState, State};
use crate::types::address::Address;
use bytes::Bytes;

pub struct CallContext<'a> {
    host: &'a ModuleHost,
    this: Address,
    max_call_depth: usize,
    state: &'a mut dyn State,
    events: &'a mut Vec<DiamondEvent>,
    sender: Address,
    value: u128,
    depth: usize,
}

impl<'a> CallContext<'a> {
    /// Creates a top-level context (depth 0).
    pub fn new(
        host: &'a ModuleHost,
        this: Address,
        max_call_depth: usize,
        state: &'a mut dyn State,
        events: &'a mut Vec<DiamondEvent>,
        sender: Address,
        value: u128,
    ) -> Self {
        Self {
            host,
            this,
            max_call_depth,
            state,
            events,
            sender,
            value,
            depth: 0,
        }
    }

    /// Original caller; modules use it for their own access control.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Value attached to the call.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Address of the diamond whose state is being executed against.
    pub fn this(&self) -> Address {
        self.this
    }

    /// Current nesting depth (0 for the top-level call).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Code table used to resolve module addresses.
    pub fn host(&self) -> &ModuleHost {
        self.host
    }

    /// The diamond's shared state.
    pub fn state(&mut self) -> &mut dyn State {
        &mut *self.state
    }

    /// Read-only view of the diamond's shared state.
    pub fn state_ref(&self) -> &dyn State {
        &*self.state
    }

    /// Buffers an event; it is dropped if the enclosing call fails.
    pub fn emit(&mut self, event: DiamondEvent) {
        self.events.push(event);
    }

    /// Runs `f` on a child overlay at the same depth and identity.
    ///
    /// State writes and events made by `f` survive only if it returns `Ok`.
    pub fn atomic<T, E>(
        &mut self,
        f: impl FnOnce(&mut CallContext<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        self.scoped(self.sender, self.value, self.depth, f)
    }

    /// Context-preserving invocation of `module` with `calldata`.
    ///
    /// The module runs against this diamond's state with the current sender
    /// and value.
    pub fn delegate(&mut self, module: Address, calldata: &[u8]) -> Result<Bytes, CallError> {
        let code = self
            .host
            .code_at(module)
            .ok_or(CallError::NoCode { module })?;
        let depth = self.next_depth()?;
        self.scoped(self.sender, self.value, depth, |ctx| code.invoke(ctx, calldata))
    }

    /// Re-enters the diamond's dispatcher with the diamond as the sender.
    pub fn call_self(&mut self, calldata: &[u8]) -> Result<Bytes, CallError> {
        let depth = self.next_depth()?;
        self.scoped(self.this, 0, depth, |ctx| dispatch::dispatch(ctx, calldata))
    }

    fn next_depth(&self) -> Result<usize, CallError> {
        let depth = self.depth + 1;
        if depth > self.max_call_depth {
            return Err(CallError::CallDepthExceeded {
                depth,
                limit: self.max_call_depth,
            });
        }
        Ok(depth)
    }

    fn scoped<T, E>(
        &mut self,
        sender: Address,
        value: u128,
        depth: usize,
        f: impl FnOnce(&mut CallContext<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut events = Vec::new();
        let (result, writes) = {
            let mut overlay = OverlayState::new(&*self.state);
            let mut child = CallContext {
                host: self.host,
                this: self.this,
                max_call_depth: self.max_call_depth,
                state: &mut overlay,
                events: &mut events,
                sender,
                value,
                depth,
            };
            let result = f(&mut child);
            (result, overlay.into_writes())
        };

        if result.is_ok() {
            writes.apply_to(&mut *self.state);
            self.events.append(&mut events);
        }
        result
    }
}
