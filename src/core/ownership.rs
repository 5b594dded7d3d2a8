//! Single-owner access guard for maintenance operations.

use crate::core::context::CallContext;
use crate::core::errors::AccessError;
use crate::core::event::DiamondEvent;
use crate::info;
use crate::storage::namespace::Namespace;
use crate::storage::state::{State, StateRead, TypedState, TypedStateMut};
use crate::types::address::Address;
use std::sync::LazyLock;

static OWNERSHIP_STORAGE: LazyLock<Namespace> =
    LazyLock::new(|| Namespace::new("diamond.standard.ownership"));

/// Current owner; the zero address when unset or renounced.
pub fn owner<S: StateRead + ?Sized>(state: &S) -> Address {
    state
        .read(OWNERSHIP_STORAGE.slot("owner"))
        .unwrap_or(Address::ZERO)
}

/// Overwrites the owner cell without any authorization check.
pub fn set_owner<S: State + ?Sized>(state: &mut S, new_owner: Address) {
    state.write(OWNERSHIP_STORAGE.slot("owner"), &new_owner);
}

/// Fails unless `sender` is the current owner.
pub fn enforce_is_owner<S: StateRead + ?Sized>(
    state: &S,
    sender: Address,
) -> Result<(), AccessError> {
    let owner = owner(state);
    if sender != owner {
        return Err(AccessError::NotOwner { sender, owner });
    }
    Ok(())
}

/// Owner-gated, single-step transfer. Transferring to the zero address
/// renounces ownership.
pub fn transfer_ownership(ctx: &mut CallContext<'_>, new_owner: Address) -> Result<(), AccessError> {
    let sender = ctx.sender();
    enforce_is_owner(ctx.state_ref(), sender)?;

    set_owner(ctx.state(), new_owner);
    ctx.emit(DiamondEvent::OwnershipTransferred {
        previous: sender,
        new: new_owner,
    });
    info!(
        "ownership transferred: diamond={} {} -> {}",
        ctx.this(),
        sender,
        new_owner
    );
    Ok(())
}
