//! Executable module code and the table it is deployed into.
//!
//! A module is stateless code: everything it persists goes through the
//! [`CallContext`] into the state of the diamond that invoked it, under a
//! [`Namespace`](crate::storage::namespace::Namespace) the module owns.

pub mod builtin;
pub mod calldata;
pub mod host;

use crate::core::context::CallContext;
use crate::core::errors::CallError;
use crate::types::selector::Selector;
use bytes::Bytes;

/// Code deployed at a module address.
pub trait Module: Send + Sync {
    /// Human-readable name used in logs and manifests.
    fn name(&self) -> &str;

    /// Selectors this module implements. Cut tooling relies on this list
    /// being accurate.
    fn selectors(&self) -> Vec<Selector>;

    /// Handles `calldata` (selector included) against the caller's state.
    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError>;
}
