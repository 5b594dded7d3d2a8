use crate::core::context::CallContext;
use crate::core::cut::{FacetCut, apply_cut, diamond_cut_selector};
use crate::core::errors::CallError;
use crate::core::ownership::enforce_is_owner;
use crate::module::Module;
use crate::module::calldata::decode_args;
use crate::types::address::Address;
use crate::types::selector::Selector;
use bytes::Bytes;

/// Owner-gated entry point to the batch cut processor.
///
/// Arguments: `(Vec<FacetCut>, Address, Vec<u8>)`, where a zero init address
/// means no init call.
pub struct CutModule;

impl Module for CutModule {
    fn name(&self) -> &str {
        "cut"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![diamond_cut_selector()]
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        let selector = Selector::from_calldata(calldata);
        if selector != diamond_cut_selector() {
            return Err(CallError::FunctionNotFound(selector));
        }
        enforce_is_owner(ctx.state_ref(), ctx.sender())?;

        let (cuts, init, init_calldata): (Vec<FacetCut>, Address, Vec<u8>) =
            decode_args(calldata)?;
        apply_cut(ctx, &cuts, Some(init), &init_calldata)?;
        Ok(Bytes::new())
    }
}
