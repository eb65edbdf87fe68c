//! Player identification and per-player data storage.
//!
//! ## PlayerKey
//!
//! A duel always has exactly two seats, `player1` and `player2`.
//! Serialized as the lowercase seat name so external payloads can use
//! `"player1"` / `"player2"` directly.
//!
//! ## Players
//!
//! Per-player data storage with one field per seat.
//! Supports iteration and indexing by `PlayerKey`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two duel seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKey {
    Player1,
    Player2,
}

impl PlayerKey {
    /// Both seats, in seating order.
    pub const ALL: [PlayerKey; 2] = [PlayerKey::Player1, PlayerKey::Player2];

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerKey::Player1 => PlayerKey::Player2,
            PlayerKey::Player2 => PlayerKey::Player1,
        }
    }

    /// Seat index (0 for player1, 1 for player2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerKey::Player1 => 0,
            PlayerKey::Player2 => 1,
        }
    }

    /// Seat name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerKey::Player1 => "player1",
            PlayerKey::Player2 => "player2",
        }
    }
}

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use card_duel::core::{PlayerKey, Players};
///
/// let mut hp: Players<i64> = Players::with_value(200);
/// hp[PlayerKey::Player2] -= 15;
///
/// assert_eq!(hp[PlayerKey::Player1], 200);
/// assert_eq!(hp[PlayerKey::Player2], 185);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Players<T> {
    #[serde(default)]
    pub player1: T,
    #[serde(default)]
    pub player2: T,
}

impl<T> Players<T> {
    /// Create with values from a factory function.
    pub fn new(factory: impl Fn(PlayerKey) -> T) -> Self {
        Self {
            player1: factory(PlayerKey::Player1),
            player2: factory(PlayerKey::Player2),
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player1: value.clone(),
            player2: value,
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerKey) -> &T {
        match player {
            PlayerKey::Player1 => &self.player1,
            PlayerKey::Player2 => &self.player2,
        }
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerKey) -> &mut T {
        match player {
            PlayerKey::Player1 => &mut self.player1,
            PlayerKey::Player2 => &mut self.player2,
        }
    }

    /// Iterate over (PlayerKey, &T) pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerKey, &T)> {
        [(PlayerKey::Player1, &self.player1), (PlayerKey::Player2, &self.player2)].into_iter()
    }

    /// Apply a function to both entries.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Players<U> {
        Players {
            player1: f(&self.player1),
            player2: f(&self.player2),
        }
    }
}

impl<T> Index<PlayerKey> for Players<T> {
    type Output = T;

    fn index(&self, player: PlayerKey) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerKey> for Players<T> {
    fn index_mut(&mut self, player: PlayerKey) -> &mut Self::Output {
        self.get_mut(player)
    }
}
