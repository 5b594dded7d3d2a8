//! Dispatch core: routing table, cut processor, dispatcher and loupe.
//!
//! - `registry`: selector → module table kept in the diamond's state
//! - `cut`: validated, all-or-nothing registry updates
//! - `dispatch` / `context`: routing of calls and context-preserving invocation
//! - `loupe` / `ownership`: introspection and the owner guard
//! - `diamond`: the entry point tying the above to a store and a code table

pub mod context;
pub mod cut;
pub mod diamond;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod loupe;
pub mod ownership;
pub mod registry;
