//! Buff store - reads and writes the modifier bags inside `DuelState`.

use super::modifier::{AttackModifiers, ModifierBag, ModifierKey, ModifierPatch};
use crate::core::player::PlayerKey;
use crate::core::state::DuelState;

/// Stateless accessor over each player's `ModifierBag`.
pub struct BuffStore;

impl BuffStore {
    #[must_use]
    pub fn get(state: &DuelState, player: PlayerKey) -> &ModifierBag {
        &state.players[player].buffs
    }

    /// Apply a patch, returning the keys it touched.
    pub fn apply(state: &mut DuelState, player: PlayerKey, patch: ModifierPatch) -> Vec<ModifierKey> {
        let keys = patch.keys();
        patch.apply_to(&mut state.players[player].buffs);
        tracing::debug!(%player, ?keys, "applied modifiers");
        keys
    }

    /// Reset a one-shot modifier to neutral. Returns whether it was set.
    ///
    /// Only one-shot keys can be consumed; other keys are left alone and
    /// report `false`.
    pub fn consume_one_shot(state: &mut DuelState, player: PlayerKey, key: ModifierKey) -> bool {
        let bag = &mut state.players[player].buffs;
        match key {
            ModifierKey::SkipNextTurn => std::mem::take(&mut bag.skip_next_turn),
            ModifierKey::SkipNextDraw => std::mem::take(&mut bag.skip_next_draw),
            ModifierKey::NextAttackBonus => std::mem::take(&mut bag.next_attack_bonus) != 0,
            ModifierKey::NextAttackMult => std::mem::replace(&mut bag.next_attack_mult, 1.0) != 1.0,
            ModifierKey::AttackRestrictTags => bag.attack_restrict_tags.take().is_some(),
            _ => false,
        }
    }

    /// Read and clear all one-shot attack modifiers.
    ///
    /// Clearing happens whether or not the caller ends up applying them.
    pub fn take_attack_modifiers(state: &mut DuelState, player: PlayerKey) -> AttackModifiers {
        let bag = &state.players[player].buffs;
        let modifiers = AttackModifiers {
            bonus: bag.next_attack_bonus,
            mult: bag.next_attack_mult,
            restrict_tags: bag.attack_restrict_tags.clone(),
        };
        for key in [
            ModifierKey::NextAttackBonus,
            ModifierKey::NextAttackMult,
            ModifierKey::AttackRestrictTags,
        ] {
            Self::consume_one_shot(state, player, key);
        }
        modifiers
    }

    /// Start-of-turn tick: decrement `block_heal_turns`.
    pub fn tick(state: &mut DuelState, player: PlayerKey) {
        let bag = &mut state.players[player].buffs;
        bag.block_heal_turns = bag.block_heal_turns.saturating_sub(1);
    }

    /// End-of-turn tick: decrement `hand_lock_turns`.
    ///
    /// A lock counts the owner's turns it has been in force, so it must
    /// outlive the start of the turn it blocks.
    pub fn tick_end(state: &mut DuelState, player: PlayerKey) {
        let bag = &mut state.players[player].buffs;
        bag.hand_lock_turns = bag.hand_lock_turns.saturating_sub(1);
    }
}
