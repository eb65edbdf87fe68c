//! Zone system: the four per-player zones plus the shared loot pile.
//!
//! Zones are fixed for this game (deck, hand, field, discard pile, loot
//! pile). Hand and field are capacity-bounded by `DuelConfig`.

pub mod manager;

pub(crate) use manager::lenient_zone;
pub use manager::{CardSelector, DrawFailure, Zone, ZoneManager, ZoneRef};
