use crate::core::context::CallContext;
use crate::core::cut::diamond_cut_selector;
use crate::core::errors::CallError;
use crate::core::loupe::set_supported_interface;
use crate::module::Module;
use crate::module::builtin::loupe::{
    FACET_ADDRESS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS, FACETS, SUPPORTS_INTERFACE,
};
use crate::module::builtin::ownership::{OWNER, TRANSFER_OWNERSHIP};
use crate::module::calldata::decode_args;
use crate::types::selector::{Selector, interface_id};
use bytes::Bytes;

/// `init(bytes4[])`
pub const INIT: Selector = Selector::from_u32(0x82c2_8108);

/// Init target that marks a list of interface ids as supported.
pub struct InitModule;

impl Module for InitModule {
    fn name(&self) -> &str {
        "init"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![INIT]
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        let selector = Selector::from_calldata(calldata);
        if selector != INIT {
            return Err(CallError::FunctionNotFound(selector));
        }
        let ids: Vec<Selector> = decode_args(calldata)?;
        for id in ids {
            set_supported_interface(ctx.state(), id, true);
        }
        Ok(Bytes::new())
    }
}

/// ERC-165, IDiamondCut, IDiamondLoupe and ERC-173 interface ids.
pub fn standard_interfaces() -> Vec<Selector> {
    vec![
        SUPPORTS_INTERFACE,
        diamond_cut_selector(),
        interface_id(&[FACETS, FACET_FUNCTION_SELECTORS, FACET_ADDRESSES, FACET_ADDRESS]),
        interface_id(&[OWNER, TRANSFER_OWNERSHIP]),
    ]
}
