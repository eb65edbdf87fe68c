//! Duel rules: HP mutation, the turn state machine and the rules engine.
//!
//! `DuelRules` is the only code that interprets player actions. It calls
//! into the zone manager, the effect resolver and the turn controller, and
//! decides the winner once each action has settled.

pub mod engine;
pub mod hp;
pub mod turn;

pub use engine::{DuelRules, RulesEngine};
pub use hp::{change_hp, clamp_hp, HpChange};
pub use turn::{TurnController, TurnPhase};
