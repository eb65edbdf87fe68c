//! # card-duel
//!
//! A turn-based two-player card duel engine.
//!
//! ## Design Principles
//!
//! 1. **Text-Driven Effects**: Cards carry free-text effect descriptions.
//!    An ordered pattern table compiles each text once into a list of
//!    primitives (damage, heal, draw, buffs, field mutations).
//!
//! 2. **Explicit Ownership**: Each duel exclusively owns its `DuelState`.
//!    There are no globals; randomness is injected through `RandomSource`.
//!
//! 3. **Never Fail Mid-Effect**: Validation happens before anything moves.
//!    Once an action is accepted, resolution degrades to no-ops instead of
//!    erroring (full hands, empty decks, unknown cards).
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: zones are `im::Vector`s, so each action
//!   runs against an O(1) clone and is committed only on success.
//!
//! - **Events Instead of Side Effects**: everything a host would render is
//!   reported as a `DuelEvent`.
//!
//! ## Modules
//!
//! - `core`: players, state, actions, RNG, configuration, errors
//! - `cards`: card ids, definitions, instances, catalog
//! - `zones`: zone moves and capacities
//! - `buffs`: per-player modifier bags
//! - `effects`: effect text compilation and resolution
//! - `rules`: HP, turn controller, rules engine
//! - `triggers`: events, trap and auto-discard conditions
//! - `duel`: orchestrator, async session, summary

pub mod buffs;
pub mod cards;
pub mod core;
pub mod duel;
pub mod effects;
pub mod rules;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ActionOrigin, ActionRecord, DuelAction, DuelConfig, DuelError, DuelSetup, DuelState, GameRng,
    PlayerKey, PlayerSetup, Players, RandomSource, RemoteMove, ScriptedRng, TransportError,
    ValidationError,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, CardType};

pub use crate::zones::{Zone, ZoneManager, ZoneRef};

pub use crate::buffs::{BuffStore, ModifierBag};

pub use crate::effects::{EffectPlan, EffectPrimitive, EffectResolver};

pub use crate::rules::{DuelRules, RulesEngine, TurnController};

pub use crate::triggers::DuelEvent;

pub use crate::duel::{ActionOutcome, Duel, DuelSession, DuelSummary, RemoteCounterpart};
