//! The per-player modifier bag and patches applied to it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::CardDefinition;

/// Damage recorded by a damage-over-time effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageOverTime {
    pub amount: i64,
    pub turns_remaining: u32,
}

/// Active modifiers of one player.
///
/// One-shot entries (`skip_next_*`, `next_attack_*`, `attack_restrict_tags`)
/// are reset to neutral when consumed. `block_heal_turns` decrements at
/// the start of the owner's turn, `hand_lock_turns` at its end. The rest
/// persist for the whole duel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifierBag {
    pub extra_draw_per_turn: u32,
    pub block_heal_turns: u32,
    pub skip_next_turn: bool,
    pub skip_next_draw: bool,
    pub next_attack_bonus: i64,
    pub next_attack_mult: f64,
    pub attack_restrict_tags: Option<BTreeSet<String>>,
    pub gun_flat_bonus: i64,
    pub dot: Option<DamageOverTime>,
    pub hand_lock_turns: u32,
}

impl Default for ModifierBag {
    fn default() -> Self {
        Self {
            extra_draw_per_turn: 0,
            block_heal_turns: 0,
            skip_next_turn: false,
            skip_next_draw: false,
            next_attack_bonus: 0,
            next_attack_mult: 1.0,
            attack_restrict_tags: None,
            gun_flat_bonus: 0,
            dot: None,
            hand_lock_turns: 0,
        }
    }
}

impl ModifierBag {
    #[must_use]
    pub fn is_heal_blocked(&self) -> bool {
        self.block_heal_turns > 0
    }

    #[must_use]
    pub fn is_hand_locked(&self) -> bool {
        self.hand_lock_turns > 0
    }

    /// Whether any one-shot attack modifier differs from neutral.
    #[must_use]
    pub fn has_attack_modifiers(&self) -> bool {
        self.next_attack_bonus != 0
            || self.next_attack_mult != 1.0
            || self.attack_restrict_tags.is_some()
    }
}

/// Name of a single modifier, used for consumption and in events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierKey {
    ExtraDrawPerTurn,
    BlockHealTurns,
    SkipNextTurn,
    SkipNextDraw,
    NextAttackBonus,
    NextAttackMult,
    AttackRestrictTags,
    GunFlatBonus,
    Dot,
    HandLockTurns,
}

impl ModifierKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ModifierKey::ExtraDrawPerTurn => "extraDrawPerTurn",
            ModifierKey::BlockHealTurns => "blockHealTurns",
            ModifierKey::SkipNextTurn => "skipNextTurn",
            ModifierKey::SkipNextDraw => "skipNextDraw",
            ModifierKey::NextAttackBonus => "nextAttackBonus",
            ModifierKey::NextAttackMult => "nextAttackMult",
            ModifierKey::AttackRestrictTags => "attackRestrictTags",
            ModifierKey::GunFlatBonus => "gunFlatBonus",
            ModifierKey::Dot => "dot",
            ModifierKey::HandLockTurns => "handLockTurns",
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update of a `ModifierBag`. Set fields overwrite.
///
/// ```
/// use card_duel::buffs::{ModifierBag, ModifierPatch};
///
/// let mut bag = ModifierBag::default();
/// ModifierPatch::new().block_heal_turns(2).skip_next_draw(true).apply_to(&mut bag);
/// assert_eq!(bag.block_heal_turns, 2);
/// assert!(bag.skip_next_draw);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierPatch {
    pub extra_draw_per_turn: Option<u32>,
    pub block_heal_turns: Option<u32>,
    pub skip_next_turn: Option<bool>,
    pub skip_next_draw: Option<bool>,
    pub next_attack_bonus: Option<i64>,
    pub next_attack_mult: Option<f64>,
    pub attack_restrict_tags: Option<Option<BTreeSet<String>>>,
    pub gun_flat_bonus: Option<i64>,
    pub dot: Option<Option<DamageOverTime>>,
    pub hand_lock_turns: Option<u32>,
}

impl ModifierPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn extra_draw_per_turn(mut self, value: u32) -> Self {
        self.extra_draw_per_turn = Some(value);
        self
    }

    #[must_use]
    pub fn block_heal_turns(mut self, value: u32) -> Self {
        self.block_heal_turns = Some(value);
        self
    }

    #[must_use]
    pub fn skip_next_turn(mut self, value: bool) -> Self {
        self.skip_next_turn = Some(value);
        self
    }

    #[must_use]
    pub fn skip_next_draw(mut self, value: bool) -> Self {
        self.skip_next_draw = Some(value);
        self
    }

    #[must_use]
    pub fn next_attack_bonus(mut self, value: i64) -> Self {
        self.next_attack_bonus = Some(value);
        self
    }

    #[must_use]
    pub fn next_attack_mult(mut self, value: f64) -> Self {
        self.next_attack_mult = Some(value);
        self
    }

    #[must_use]
    pub fn attack_restrict_tags(mut self, value: Option<BTreeSet<String>>) -> Self {
        self.attack_restrict_tags = Some(value);
        self
    }

    #[must_use]
    pub fn gun_flat_bonus(mut self, value: i64) -> Self {
        self.gun_flat_bonus = Some(value);
        self
    }

    #[must_use]
    pub fn dot(mut self, value: Option<DamageOverTime>) -> Self {
        self.dot = Some(value);
        self
    }

    #[must_use]
    pub fn hand_lock_turns(mut self, value: u32) -> Self {
        self.hand_lock_turns = Some(value);
        self
    }

    /// Keys this patch touches, in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<ModifierKey> {
        let touched = [
            (self.extra_draw_per_turn.is_some(), ModifierKey::ExtraDrawPerTurn),
            (self.block_heal_turns.is_some(), ModifierKey::BlockHealTurns),
            (self.skip_next_turn.is_some(), ModifierKey::SkipNextTurn),
            (self.skip_next_draw.is_some(), ModifierKey::SkipNextDraw),
            (self.next_attack_bonus.is_some(), ModifierKey::NextAttackBonus),
            (self.next_attack_mult.is_some(), ModifierKey::NextAttackMult),
            (self.attack_restrict_tags.is_some(), ModifierKey::AttackRestrictTags),
            (self.gun_flat_bonus.is_some(), ModifierKey::GunFlatBonus),
            (self.dot.is_some(), ModifierKey::Dot),
            (self.hand_lock_turns.is_some(), ModifierKey::HandLockTurns),
        ];
        touched.into_iter().filter(|(set, _)| *set).map(|(_, key)| key).collect()
    }

    /// Write every set field into `bag`.
    pub fn apply_to(self, bag: &mut ModifierBag) {
        if let Some(v) = self.extra_draw_per_turn {
            bag.extra_draw_per_turn = v;
        }
        if let Some(v) = self.block_heal_turns {
            bag.block_heal_turns = v;
        }
        if let Some(v) = self.skip_next_turn {
            bag.skip_next_turn = v;
        }
        if let Some(v) = self.skip_next_draw {
            bag.skip_next_draw = v;
        }
        if let Some(v) = self.next_attack_bonus {
            bag.next_attack_bonus = v;
        }
        if let Some(v) = self.next_attack_mult {
            bag.next_attack_mult = v;
        }
        if let Some(v) = self.attack_restrict_tags {
            bag.attack_restrict_tags = v;
        }
        if let Some(v) = self.gun_flat_bonus {
            bag.gun_flat_bonus = v;
        }
        if let Some(v) = self.dot {
            bag.dot = v;
        }
        if let Some(v) = self.hand_lock_turns {
            bag.hand_lock_turns = v;
        }
    }
}

/// One-shot attack modifiers read out of a bag by a damage computation.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackModifiers {
    pub bonus: i64,
    pub mult: f64,
    pub restrict_tags: Option<BTreeSet<String>>,
}

impl Default for AttackModifiers {
    fn default() -> Self {
        Self {
            bonus: 0,
            mult: 1.0,
            restrict_tags: None,
        }
    }
}

impl AttackModifiers {
    /// Whether the modifiers may apply to `card`. An unrestricted buff
    /// applies to everything; a restricted one needs a shared tag or type.
    #[must_use]
    pub fn admits(&self, card: Option<&CardDefinition>) -> bool {
        match (&self.restrict_tags, card) {
            (None, _) => true,
            (Some(tags), Some(card)) => tags.iter().any(|t| card.is_kind(t)),
            (Some(_), None) => false,
        }
    }

    /// `floor((base + bonus) * mult)` when admitted, else `base`.
    #[must_use]
    pub fn apply(&self, base: i64, card: Option<&CardDefinition>) -> i64 {
        if !self.admits(card) {
            return base;
        }
        (base.saturating_add(self.bonus) as f64 * self.mult).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardType};

    #[test]
    fn test_default_is_neutral() {
        let bag = ModifierBag::default();
        assert_eq!(bag.next_attack_mult, 1.0);
        assert!(!bag.has_attack_modifiers());
        assert!(!bag.is_heal_blocked());
    }

    #[test]
    fn test_bag_serde_names() {
        let bag: ModifierBag =
            serde_json::from_str(r#"{"blockHealTurns": 2, "dot": {"amount": 5, "turnsRemaining": 3}}"#)
                .unwrap();
        assert_eq!(bag.block_heal_turns, 2);
        assert_eq!(bag.dot, Some(DamageOverTime { amount: 5, turns_remaining: 3 }));
        assert_eq!(bag.next_attack_mult, 1.0);

        let json = serde_json::to_value(&ModifierBag::default()).unwrap();
        assert_eq!(json["nextAttackMult"], 1.0);
        assert!(json["attackRestrictTags"].is_null());
    }

    #[test]
    fn test_patch_keys() {
        let patch = ModifierPatch::new().skip_next_turn(true).hand_lock_turns(1);
        assert_eq!(patch.keys(), vec![ModifierKey::SkipNextTurn, ModifierKey::HandLockTurns]);
    }

    #[test]
    fn test_attack_modifiers_restriction() {
        let gun = CardDefinition::new(CardId::new(1), "Pistol", CardType::Attack).with_tag("gun");
        let knife = CardDefinition::new(CardId::new(3), "Knife", CardType::Attack);
        let mods = AttackModifiers {
            bonus: 10,
            mult: 1.5,
            restrict_tags: Some(BTreeSet::from(["gun".to_string()])),
        };

        assert_eq!(mods.apply(10, Some(&gun)), 30);
        assert_eq!(mods.apply(10, Some(&knife)), 10);
        assert_eq!(mods.apply(10, None), 10);
    }

    #[test]
    fn test_attack_modifiers_floor() {
        let mods = AttackModifiers {
            bonus: 0,
            mult: 1.5,
            restrict_tags: None,
        };
        assert_eq!(mods.apply(7, None), 10);
    }
}
