//! Events and automatic trigger conditions.
//!
//! ## Key Components
//!
//! - [`DuelEvent`]: one observable consequence of an action
//! - [`EventLog`]: ordered buffer the resolver writes events into
//! - [`TrapTrigger`]: which traps resolve on placement
//! - [`DiscardPolicy`]: which cards leave the field after resolving

mod condition;
mod event;

pub use condition::{DiscardPolicy, TrapTrigger};
pub use event::{DuelEvent, EventLog};
