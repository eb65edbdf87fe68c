//! Error taxonomy surfaced by the engine.
//!
//! - [`ValidationError`]: the caller asked for something illegal; the duel
//!   state is unchanged.
//! - [`LookupError`]: an unknown card identifier. The resolver treats such
//!   cards as no-ops instead of failing.
//! - [`TransportError`]: the remote counterpart could not be reached or
//!   answered badly. State is left at its last valid configuration.
//! - [`CatalogError`] / [`ConfigError`]: loading failures.
//!
//! [`DuelError`] unifies them for the public entry points.

use std::time::Duration;

use thiserror::Error;

use super::player::PlayerKey;
use crate::cards::CardId;
use crate::zones::{CardSelector, ZoneRef};

pub type Result<T, E = DuelError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("{zone} is full ({capacity} cards)")]
    CapacityExceeded { zone: ZoneRef, capacity: usize },

    #[error("no card in {zone} matches {selector}")]
    NotFound { zone: ZoneRef, selector: CardSelector },

    #[error("invalid zone reference {0}")]
    InvalidZone(ZoneRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error("it is {expected}'s turn, not {provided}'s")]
    OutOfTurn {
        expected: PlayerKey,
        provided: PlayerKey,
    },

    #[error("the duel is over ({winner} won)")]
    DuelOver { winner: PlayerKey },

    #[error("{player} cannot act interactively")]
    NotInteractive { player: PlayerKey },

    #[error("{player}'s hand is locked for {turns} more turn(s)")]
    HandLocked { player: PlayerKey, turns: u32 },

    #[error("field slot {index} does not hold a face-down trap")]
    NotATrap { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card {0}")]
pub struct LookupError(pub CardId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("remote counterpart timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote counterpart answered {code}: {message}")]
    Status { code: u16, message: String },

    #[error("remote counterpart unavailable: {0}")]
    Unavailable(String),

    #[error("malformed remote payload: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("failed to parse card catalog: {0}")]
    Parse(String),

    #[error("card {0} registered twice")]
    Duplicate(CardId),
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to parse duel config: {0}")]
    Parse(String),

    #[error("invalid duel config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ZoneError> for DuelError {
    fn from(value: ZoneError) -> Self {
        Self::Validation(ValidationError::Zone(value))
    }
}

impl DuelError {
    /// True for errors where retrying the same action may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, DuelError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Zone;

    #[test]
    fn test_zone_error_message() {
        let err = ZoneError::CapacityExceeded {
            zone: ZoneRef::player(PlayerKey::Player1, Zone::Hand),
            capacity: 4,
        };
        assert_eq!(err.to_string(), "player1 hand is full (4 cards)");
    }

    #[test]
    fn test_zone_error_converts_to_validation() {
        let err: DuelError = ZoneError::InvalidZone(ZoneRef {
            owner: None,
            zone: Zone::Hand,
        })
        .into();
        assert!(matches!(err, DuelError::Validation(ValidationError::Zone(_))));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transport_is_retryable() {
        let err: DuelError = TransportError::Timeout(Duration::from_millis(10)).into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_lookup_error_message() {
        assert_eq!(LookupError(CardId::new(7)).to_string(), "unknown card 007");
    }
}
