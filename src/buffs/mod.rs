//! Per-player modifiers: one-shot, turn-scoped and persistent buffs.
//!
//! ## Key Types
//!
//! - `ModifierBag`: the modifiers a player currently carries
//! - `ModifierPatch`: partial overwrite of a bag
//! - `ModifierKey`: names a single modifier
//! - `BuffStore`: get / apply / consume / tick against `DuelState`

pub mod modifier;
pub mod store;

pub use modifier::{AttackModifiers, DamageOverTime, ModifierBag, ModifierKey, ModifierPatch};
pub use store::BuffStore;
