//! Facet-routed dispatch: one diamond address, many modules.
//!
//! Calls reach a [`Diamond`](core::diamond::Diamond), which looks up the
//! module bound to the call's 4-byte selector and runs it against the
//! diamond's own state. The selector table is changed through owner-gated,
//! atomic cut batches and can be inspected through the loupe functions.

pub mod config;
pub mod core;
pub mod module;
pub mod storage;
pub mod types;
pub mod utils;
