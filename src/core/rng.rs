//! Injectable randomness for target selection, shuffling and coin flips.
//!
//! ## Key Features
//!
//! - **Pluggable**: the engine only talks to the [`RandomSource`] trait
//! - **Deterministic**: [`GameRng`] replays the same sequence for a seed
//! - **Serializable**: O(1) state capture and restore
//! - **Scriptable**: [`ScriptedRng`] returns fixed picks for tests
//!
//! ```
//! use card_duel::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.pick_index(10), b.pick_index(10));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;

/// Source of every random decision the engine makes.
///
/// Random discard, steal and destroy targets, deck shuffles and the
/// starting-player coin flip all go through this trait.
pub trait RandomSource: Send {
    /// Pick an index in `0..len`. Returns `None` when `len == 0`.
    fn pick_index(&mut self, len: usize) -> Option<usize>;

    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool;

    /// Shuffle a sequence of card instances in place.
    fn shuffle_cards(&mut self, cards: &mut [CardInstance]);
}

/// Deterministic ChaCha8-backed random source.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.inner.gen_range(0..len))
    }

    fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    fn shuffle_cards(&mut self, cards: &mut [CardInstance]) {
        use rand::seq::SliceRandom;
        cards.shuffle(&mut self.inner);
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how
/// many numbers were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

/// Random source that replays a fixed script.
///
/// Each `pick_index` pops the next scripted value (taken modulo `len`);
/// once the script is exhausted it always picks index 0. Coin flips and
/// shuffles are no-ops returning `true` / leaving order untouched.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    picks: VecDeque<usize>,
}

impl ScriptedRng {
    #[must_use]
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRng {
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.picks.pop_front().unwrap_or(0) % len)
    }

    fn coin_flip(&mut self) -> bool {
        true
    }

    fn shuffle_cards(&mut self, _cards: &mut [CardInstance]) {}
}
