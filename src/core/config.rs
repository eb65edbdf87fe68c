//! Duel configuration.
//!
//! Hosts configure the engine at startup with a `DuelConfig`: HP bounds,
//! zone capacities, opening hand size, which seat is the interactive human,
//! and the remote counterpart timeout. Every field has a default matching
//! the standard rules, so a partial TOML file is enough.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::PlayerKey;

/// Rules and host settings for one duel.
///
/// ## Example
///
/// ```
/// use card_duel::core::{DuelConfig, PlayerKey};
///
/// let config = DuelConfig::from_toml_str("opening_hand = 2").unwrap();
/// assert_eq!(config.opening_hand, 2);
/// assert_eq!(config.hand_capacity, 4);
/// assert_eq!(config.human_player, PlayerKey::Player1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// HP each player starts with.
    pub starting_hp: i64,

    /// Upper HP bound; healing clamps here.
    pub max_hp: i64,

    /// Maximum cards in a hand.
    pub hand_capacity: usize,

    /// Maximum cards on a field.
    pub field_capacity: usize,

    /// Cards dealt to each player when the duel starts.
    pub opening_hand: usize,

    /// Seat allowed to play and discard cards interactively.
    pub human_player: PlayerKey,

    /// Reject interactive play/discard from the wrong seat instead of
    /// silently ignoring it.
    pub reject_non_interactive: bool,

    /// Timeout for one round-trip to the remote counterpart, in milliseconds.
    pub remote_timeout_ms: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            starting_hp: 200,
            max_hp: 200,
            hand_capacity: 4,
            field_capacity: 3,
            opening_hand: 3,
            human_player: PlayerKey::Player1,
            reject_non_interactive: false,
            remote_timeout_ms: 5_000,
        }
    }
}

impl DuelConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: DuelConfig =
            toml::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hp <= 0 {
            return Err(ConfigError::Invalid("max_hp must be positive".into()));
        }
        if !(0..=self.max_hp).contains(&self.starting_hp) {
            return Err(ConfigError::Invalid(format!(
                "starting_hp {} outside 0..={}",
                self.starting_hp, self.max_hp
            )));
        }
        if self.hand_capacity == 0 || self.field_capacity == 0 {
            return Err(ConfigError::Invalid("zone capacities must be non-zero".into()));
        }
        if self.opening_hand > self.hand_capacity {
            return Err(ConfigError::Invalid(format!(
                "opening_hand {} exceeds hand_capacity {}",
                self.opening_hand, self.hand_capacity
            )));
        }
        Ok(())
    }

    /// Remote round-trip timeout.
    #[must_use]
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    /// The seat driven by the remote counterpart.
    #[must_use]
    pub fn bot_player(&self) -> PlayerKey {
        self.human_player.opponent()
    }

    #[must_use]
    pub fn with_starting_hp(mut self, hp: i64) -> Self {
        self.starting_hp = hp;
        self
    }

    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    #[must_use]
    pub fn with_human_player(mut self, player: PlayerKey) -> Self {
        self.human_player = player;
        self
    }

    /// Turn silent no-ops for non-interactive seats into validation errors.
    #[must_use]
    pub fn rejecting_non_interactive(mut self) -> Self {
        self.reject_non_interactive = true;
        self
    }

    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout_ms = timeout.as_millis() as u64;
        self
    }
}
