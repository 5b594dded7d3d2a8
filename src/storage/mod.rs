//! Persistent state subsystem.
//!
//! - [`state`]: [`State`](state::State) traits and the committing/discarding
//!   [`OverlayState`](state::OverlayState)
//! - [`store`]: durable [`StateStore`](store::StateStore) trait and the
//!   in-memory [`MemoryStore`](store::MemoryStore)
//! - [`namespace`]: collision-avoiding key derivation shared by all modules

pub mod namespace;
pub mod state;
pub mod store;
