//! Effect system: turning card text into state changes.
//!
//! - `EffectText` / `Clause`: normalized, clause-split card text
//! - `EffectPlan::compile`: ordered pattern table producing primitives
//! - `EffectPrimitive`: one atomic state change
//! - `EffectResolver`: applies a plan for an actor against its opponent
//!
//! Compilation happens once, when a card is registered in the catalog.
//! Resolution never fails; anything it cannot do is a no-op.

mod effect;
mod patterns;
mod resolver;
mod targeting;
mod text;

pub use effect::{EffectPlan, EffectPrimitive, FieldMutation, PersistentBuff, Primitives, SkipKind};
pub use resolver::{EffectResolver, Resolution, ResolverContext};
pub use targeting::{CardFilter, Selection, Side};
pub use text::{Clause, EffectText};
