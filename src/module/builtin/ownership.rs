use crate::core::context::CallContext;
use crate::core::errors::CallError;
use crate::core::ownership;
use crate::module::Module;
use crate::module::calldata::{decode_args, encode_return};
use crate::types::address::Address;
use crate::types::selector::Selector;
use bytes::Bytes;

pub const OWNER: Selector = Selector::from_u32(0x8da5_cb5b);
pub const TRANSFER_OWNERSHIP: Selector = Selector::from_u32(0xf2fd_e38b);

/// Exposes the owner cell as `owner()` / `transferOwnership(address)`.
pub struct OwnershipModule;

impl Module for OwnershipModule {
    fn name(&self) -> &str {
        "ownership"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![OWNER, TRANSFER_OWNERSHIP]
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        match Selector::from_calldata(calldata) {
            OWNER => {
                decode_args::<()>(calldata)?;
                Ok(encode_return(&ownership::owner(ctx.state_ref())))
            }
            TRANSFER_OWNERSHIP => {
                let new_owner: Address = decode_args(calldata)?;
                ownership::transfer_ownership(ctx, new_owner)?;
                Ok(Bytes::new())
            }
            other => Err(CallError::FunctionNotFound(other)),
        }
    }
}
