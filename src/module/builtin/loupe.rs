use crate::core::context::CallContext;
use crate::core::errors::CallError;
use crate::core::loupe;
use crate::module::Module;
use crate::module::calldata::{decode_args, encode_return};
use crate::types::address::Address;
use crate::types::selector::Selector;
use bytes::Bytes;

pub const FACETS: Selector = Selector::from_u32(0x7a0e_d627);
pub const FACET_FUNCTION_SELECTORS: Selector = Selector::from_u32(0xadfc_a15e);
pub const FACET_ADDRESSES: Selector = Selector::from_u32(0x52ef_6b2c);
pub const FACET_ADDRESS: Selector = Selector::from_u32(0xcdff_acc6);
pub const SUPPORTS_INTERFACE: Selector = Selector::from_u32(0x01ff_c9a7);

/// Routable wrapper around [`crate::core::loupe`].
pub struct LoupeModule;

impl Module for LoupeModule {
    fn name(&self) -> &str {
        "loupe"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![
            FACETS,
            FACET_FUNCTION_SELECTORS,
            FACET_ADDRESSES,
            FACET_ADDRESS,
            SUPPORTS_INTERFACE,
        ]
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        let state = ctx.state_ref();
        match Selector::from_calldata(calldata) {
            FACETS => {
                decode_args::<()>(calldata)?;
                Ok(encode_return(&loupe::facets(state)))
            }
            FACET_FUNCTION_SELECTORS => {
                let module: Address = decode_args(calldata)?;
                Ok(encode_return(&loupe::facet_function_selectors(state, module)))
            }
            FACET_ADDRESSES => {
                decode_args::<()>(calldata)?;
                Ok(encode_return(&loupe::facet_addresses(state)))
            }
            FACET_ADDRESS => {
                let selector: Selector = decode_args(calldata)?;
                Ok(encode_return(&loupe::facet_address(state, selector)))
            }
            SUPPORTS_INTERFACE => {
                let interface_id: Selector = decode_args(calldata)?;
                Ok(encode_return(&loupe::supports_interface(state, interface_id)))
            }
            other => Err(CallError::FunctionNotFound(other)),
        }
    }
}
