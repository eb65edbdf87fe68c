//! Core engine types: players, state, actions, RNG, configuration, errors.
//!
//! Everything here is plain data plus the `RandomSource` seam. Behaviour
//! lives in `zones`, `buffs`, `effects` and `rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionOrigin, ActionRecord, DuelAction, RemoteMove};
pub use config::DuelConfig;
pub use error::{
    CatalogError, ConfigError, DuelError, LookupError, Result, TransportError, ValidationError,
    ZoneError,
};
pub use player::{PlayerKey, Players};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
pub use state::{DuelSetup, DuelState, DuelStats, PlayerSetup, PlayerState};
