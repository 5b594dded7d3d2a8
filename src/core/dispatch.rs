//! Run-time routing of calls to modules.

use crate::core::context::CallContext;
use crate::core::errors::CallError;
use crate::core::event::DiamondEvent;
use crate::core::registry::Registry;
use crate::storage::namespace::Namespace;
use crate::storage::state::{State, StateRead, TypedState, TypedStateMut};
use crate::types::selector::Selector;
use crate::{debug, warn};
use bytes::Bytes;
use std::sync::LazyLock;

static BALANCE_STORAGE: LazyLock<Namespace> =
    LazyLock::new(|| Namespace::new("diamond.standard.balance"));

/// Value held by the diamond from plain transfers and payable calls.
pub fn balance<S: StateRead + ?Sized>(state: &S) -> u128 {
    state
        .read(BALANCE_STORAGE.slot("balance"))
        .unwrap_or(0)
}

/// Adds `value` to the diamond's balance cell.
pub fn credit<S: State + ?Sized>(state: &mut S, value: u128) {
    if value == 0 {
        return;
    }
    let next = balance(state).saturating_add(value);
    state.write(BALANCE_STORAGE.slot("balance"), &next);
}

/// Routes `calldata` to the module bound to its leading selector.
///
/// Empty calldata is a bare value transfer and always succeeds. Return data
/// and failures of the module are passed through unchanged.
pub fn dispatch(ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
    if calldata.is_empty() {
        return receive(ctx);
    }

    let selector = Selector::from_calldata(calldata);
    let Some(module) = Registry::new(ctx.state_ref()).resolve(selector) else {
        warn!(
            "function not found: diamond={} selector={selector} sender={}",
            ctx.this(),
            ctx.sender()
        );
        return Err(CallError::FunctionNotFound(selector));
    };

    debug!(
        "dispatch: selector={selector} module={module} sender={} depth={}",
        ctx.sender(),
        ctx.depth()
    );
    ctx.delegate(module, calldata)
}

fn receive(ctx: &mut CallContext<'_>) -> Result<Bytes, CallError> {
    let (from, value) = (ctx.sender(), ctx.value());
    ctx.emit(DiamondEvent::Received { from, value });
    Ok(Bytes::new())
}
