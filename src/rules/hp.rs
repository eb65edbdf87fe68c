//! HP mutation. `change_hp` and `clamp_hp` are the only code that writes
//! `PlayerState::hp`.

use crate::core::config::DuelConfig;
use crate::core::player::PlayerKey;
use crate::core::state::DuelState;

/// Outcome of an HP change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HpChange {
    pub before: i64,
    pub after: i64,
    /// A positive delta was suppressed by a heal block.
    pub blocked: bool,
}

impl HpChange {
    /// Signed change actually applied.
    #[must_use]
    pub fn applied(&self) -> i64 {
        self.after - self.before
    }
}

/// Add `delta` to a player's HP, clamped into `[0, max_hp]`.
///
/// Positive deltas are dropped entirely while the player is heal-blocked.
/// Reaching 0 does not end the duel; the orchestrator decides that once
/// the whole action has settled.
pub fn change_hp(state: &mut DuelState, config: &DuelConfig, player: PlayerKey, delta: i64) -> HpChange {
    let seat = &mut state.players[player];
    let before = seat.hp;
    if delta > 0 && seat.buffs.is_heal_blocked() {
        return HpChange {
            before,
            after: before,
            blocked: true,
        };
    }
    seat.hp = before.saturating_add(delta).clamp(0, config.max_hp);
    HpChange {
        before,
        after: seat.hp,
        blocked: false,
    }
}

/// Pull a player's HP back into `[0, max_hp]` without going through heal
/// blocks. Used when admitting a snapshot.
pub fn clamp_hp(state: &mut DuelState, config: &DuelConfig, player: PlayerKey) -> HpChange {
    let seat = &mut state.players[player];
    let before = seat.hp;
    seat.hp = before.clamp(0, config.max_hp);
    HpChange {
        before,
        after: seat.hp,
        blocked: false,
    }
}
