//! Batch cut processor.
//!
//! A cut is an ordered list of [`FacetCut`] operations applied to the
//! registry as one transaction, optionally followed by a single
//! initialization call into a caller-supplied module. Operations are
//! validated in order against the working state, so a batch that adds the
//! same selector twice fails on the second add.

use crate::core::context::CallContext;
use crate::core::errors::CutError;
use crate::core::event::DiamondEvent;
use crate::core::registry::{Registry, RegistryMut};
use crate::info;
use crate::types::address::Address;
use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use crate::types::selector::Selector;
use std::fmt;

/// Canonical signature of the cut entry point.
pub const DIAMOND_CUT_SIGNATURE: &str = "diamondCut((address,uint8,bytes4[])[],address,bytes)";

/// Selector of the cut entry point (`0x1f931c1c`).
pub fn diamond_cut_selector() -> Selector {
    Selector::from_signature(DIAMOND_CUT_SIGNATURE)
}

/// What a [`FacetCut`] does with its selectors.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CutAction {
    Add = 0,
    Replace = 1,
    Remove = 2,
}

impl fmt::Display for CutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutAction::Add => write!(f, "add"),
            CutAction::Replace => write!(f, "replace"),
            CutAction::Remove => write!(f, "remove"),
        }
    }
}

impl Encode for CutAction {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (*self as u8).encode(out);
    }
}

impl Decode for CutAction {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        match u8::decode(input)? {
            0 => Ok(CutAction::Add),
            1 => Ok(CutAction::Replace),
            2 => Ok(CutAction::Remove),
            _ => Err(DecodeError::InvalidValue),
        }
    }
}

/// One operation of a cut batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetCut {
    /// Target module; must be the zero address for `Remove`.
    pub module: Address,
    pub action: CutAction,
    pub selectors: Vec<Selector>,
}

impl FacetCut {
    pub fn add(module: Address, selectors: Vec<Selector>) -> Self {
        Self {
            module,
            action: CutAction::Add,
            selectors,
        }
    }

    pub fn replace(module: Address, selectors: Vec<Selector>) -> Self {
        Self {
            module,
            action: CutAction::Replace,
            selectors,
        }
    }

    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            module: Address::ZERO,
            action: CutAction::Remove,
            selectors,
        }
    }
}

impl Encode for FacetCut {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.module.encode(out);
        self.action.encode(out);
        self.selectors.encode(out);
    }
}

impl Decode for FacetCut {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            module: Address::decode(input)?,
            action: CutAction::decode(input)?,
            selectors: Vec::<Selector>::decode(input)?,
        })
    }
}

/// Applies `cuts` and runs the optional init call, all or nothing.
///
/// Authorization is the caller's job. A `Some(Address::ZERO)` init module is
/// treated as no init module. On success one [`DiamondEvent::DiamondCut`] is
/// emitted.
pub fn apply_cut(
    ctx: &mut CallContext<'_>,
    cuts: &[FacetCut],
    init: Option<Address>,
    init_calldata: &[u8],
) -> Result<(), CutError> {
    let init = init.filter(|m| !m.is_zero());
    ctx.atomic(|ctx| {
        for cut in cuts {
            if cut.selectors.is_empty() {
                return Err(CutError::NoSelectors { module: cut.module });
            }
            match cut.action {
                CutAction::Add => add_selectors(ctx, cut)?,
                CutAction::Replace => replace_selectors(ctx, cut)?,
                CutAction::Remove => remove_selectors(ctx, cut)?,
            }
        }
        initialize(ctx, init, init_calldata)?;

        ctx.emit(DiamondEvent::DiamondCut {
            cuts: cuts.to_vec(),
            init,
            calldata: init_calldata.to_vec(),
        });
        Ok(())
    })?;

    info!(
        "diamond cut applied: diamond={} operations={} init={}",
        ctx.this(),
        cuts.len(),
        init.map(|m| m.to_string()).unwrap_or_else(|| "none".into())
    );
    Ok(())
}

fn enforce_has_code(ctx: &CallContext<'_>, module: Address) -> Result<(), CutError> {
    if !ctx.host().has_code(module) {
        return Err(CutError::NoCode { module });
    }
    Ok(())
}

fn add_selectors(ctx: &mut CallContext<'_>, cut: &FacetCut) -> Result<(), CutError> {
    if cut.module.is_zero() {
        return Err(CutError::ZeroModule {
            action: CutAction::Add,
        });
    }
    enforce_has_code(ctx, cut.module)?;

    for &selector in &cut.selectors {
        if let Some(module) = Registry::new(ctx.state_ref()).resolve(selector) {
            return Err(CutError::SelectorExists { selector, module });
        }
        RegistryMut::new(ctx.state()).bind(selector, cut.module);
    }
    Ok(())
}

fn replace_selectors(ctx: &mut CallContext<'_>, cut: &FacetCut) -> Result<(), CutError> {
    if cut.module.is_zero() {
        return Err(CutError::ZeroModule {
            action: CutAction::Replace,
        });
    }
    enforce_has_code(ctx, cut.module)?;

    for &selector in &cut.selectors {
        let registry = Registry::new(ctx.state_ref());
        let current = registry
            .resolve(selector)
            .ok_or(CutError::SelectorMissing { selector })?;
        if registry.is_protected(selector) {
            return Err(CutError::ProtectedSelector { selector });
        }
        if current == cut.module {
            return Err(CutError::SameModule {
                selector,
                module: current,
            });
        }
        RegistryMut::new(ctx.state()).bind(selector, cut.module);
    }
    Ok(())
}

fn remove_selectors(ctx: &mut CallContext<'_>, cut: &FacetCut) -> Result<(), CutError> {
    if !cut.module.is_zero() {
        return Err(CutError::RemoveModuleNotZero { module: cut.module });
    }

    for &selector in &cut.selectors {
        let registry = Registry::new(ctx.state_ref());
        if registry.resolve(selector).is_none() {
            return Err(CutError::SelectorMissing { selector });
        }
        if registry.is_protected(selector) {
            return Err(CutError::ProtectedSelector { selector });
        }
        RegistryMut::new(ctx.state()).unbind(selector);
    }
    Ok(())
}

fn initialize(
    ctx: &mut CallContext<'_>,
    init: Option<Address>,
    calldata: &[u8],
) -> Result<(), CutError> {
    let Some(module) = init else {
        if !calldata.is_empty() {
            return Err(CutError::InitCalldataWithoutModule);
        }
        return Ok(());
    };
    enforce_has_code(ctx, module)?;

    ctx.delegate(module, calldata)
        .map(|_| ())
        .map_err(|source| CutError::InitFailed {
            module,
            source: Box::new(source),
        })
}
