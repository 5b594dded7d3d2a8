use crate::config::ConfigError;
use crate::core::cut::CutAction;
use crate::types::address::Address;
use crate::types::selector::Selector;
use bytes::Bytes;
use thiserror::Error;

/// Errors surfaced by a call routed through a diamond.
///
/// Module failures are propagated to the external caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// No module is bound to the called selector.
    #[error("function not found: {0}")]
    FunctionNotFound(Selector),
    /// The resolved module address has no deployed code.
    #[error("no code deployed at {module}")]
    NoCode { module: Address },
    /// Arguments after the selector could not be decoded.
    #[error("invalid calldata for {selector}: {reason}")]
    InvalidCalldata { selector: Selector, reason: String },
    /// Nested invocations exceeded the configured depth budget.
    #[error("call depth {depth} exceeds limit {limit}")]
    CallDepthExceeded { depth: usize, limit: usize },
    /// A module reverted with raw failure data.
    #[error("execution reverted ({} bytes of data)", .0.len())]
    Revert(Bytes),
    /// A cut batch was rejected.
    #[error(transparent)]
    Cut(#[from] CutError),
    /// The caller is not allowed to perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Validation and initialization failures of a cut batch.
///
/// Any of these aborts the whole batch; no registry change survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutError {
    /// A cut operation listed no selectors.
    #[error("no selectors provided for module {module}")]
    NoSelectors { module: Address },
    /// Add or Replace targeted the zero address.
    #[error("{action} target cannot be the zero address")]
    ZeroModule { action: CutAction },
    /// The target module (or init module) has no deployed code.
    #[error("module {module} has no code")]
    NoCode { module: Address },
    /// Add of a selector that is already bound.
    #[error("selector {selector} already bound to {module}")]
    SelectorExists { selector: Selector, module: Address },
    /// Replace or Remove of a selector that is not bound.
    #[error("selector {selector} is not bound")]
    SelectorMissing { selector: Selector },
    /// Replace of a selector with the module it is already bound to.
    #[error("selector {selector} is already bound to {module}")]
    SameModule { selector: Selector, module: Address },
    /// Replace or Remove of a protected selector.
    #[error("selector {selector} is protected")]
    ProtectedSelector { selector: Selector },
    /// Remove must target the zero address.
    #[error("remove target must be the zero address, got {module}")]
    RemoveModuleNotZero { module: Address },
    /// Init calldata was supplied without an init module.
    #[error("init calldata provided without an init module")]
    InitCalldataWithoutModule,
    /// The post-cut initialization call failed.
    #[error("init call into {module} failed: {source}")]
    InitFailed {
        module: Address,
        source: Box<CallError>,
    },
}

/// Authorization failures of owner-gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The sender is not the current owner.
    #[error("{sender} is not the owner ({owner})")]
    NotOwner { sender: Address, owner: Address },
}

/// Failures while constructing a diamond.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The initial cut or ownership setup failed.
    #[error("initial setup failed: {0}")]
    Setup(#[from] CallError),
}
