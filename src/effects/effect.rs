//! Effect primitives and compiled effect plans.
//!
//! A card's effect text compiles into an ordered list of primitives. Each
//! primitive is a single state mutation the resolver knows how to apply
//! against `(actor, opponent)`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::targeting::{CardFilter, Selection, Side};

/// Which skip flag a primitive sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipKind {
    Turn,
    Draw,
}

/// Mutation of the opponent's field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldMutation {
    /// Destroy an enemy field card.
    Destroy(Selection),
    /// Destroy the first infected enemy field card.
    DestroyInfected,
    /// Send a random face-down enemy trap to the discard pile.
    DisarmTrap,
    /// Flip a random face-down enemy trap face-up.
    RevealTrap,
}

/// Modifier that lasts the rest of the duel and stacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistentBuff {
    ExtraDrawPerTurn(u32),
    GunFlatBonus(i64),
}

/// A single resolvable game operation.
///
/// ## Damage
///
/// Every damage primitive routes through the one-shot attack modifiers of
/// the actor, so a pending buff is spent by whichever comes first.
///
/// ## Zones
///
/// Draw, discard, steal and field primitives move cards and never create
/// or destroy them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectPrimitive {
    // === Damage and HP ===

    /// Damage the opponent.
    Damage { amount: i64 },

    /// Damage both players, opponent first.
    AreaDamage { amount: i64 },

    /// Damage the opponent now and record the remaining ticks on them.
    DamageOverTime { amount: i64, turns: u32 },

    /// Heal the actor.
    Heal { amount: i64 },

    /// Damage the opponent and heal the actor by the damage dealt.
    Drain { amount: i64 },

    // === Card Movement ===

    /// Draw from the actor's deck.
    Draw { count: u32, filter: CardFilter },

    /// Draw from the shared loot pile.
    LootDraw { count: u32 },

    /// Random discard from a hand.
    Discard { side: Side, count: u32, filter: CardFilter },

    /// Move random cards from the opponent's hand to the actor's.
    Steal { count: u32, filter: CardFilter },

    /// Move the first infected card of the actor's deck onto their field.
    SpawnCompanion,

    /// Act on the opponent's field.
    Field(FieldMutation),

    // === Modifiers ===

    /// Set a skip flag.
    SkipFlag { side: Side, kind: SkipKind },

    /// Block the opponent's healing for a number of turns.
    HealBlock { turns: u32 },

    /// Lock the opponent's hand for a number of turns.
    HandLock { turns: u32 },

    /// Grant the actor a one-shot attack modifier.
    BuffGrant {
        bonus: i64,
        mult: f64,
        restrict_tags: Option<BTreeSet<String>>,
    },

    /// Raise a persistent modifier on the actor.
    PersistentBuff(PersistentBuff),
}

impl EffectPrimitive {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EffectPrimitive::Damage { .. } => "damage",
            EffectPrimitive::AreaDamage { .. } => "area-damage",
            EffectPrimitive::DamageOverTime { .. } => "damage-over-time",
            EffectPrimitive::Heal { .. } => "heal",
            EffectPrimitive::Drain { .. } => "drain",
            EffectPrimitive::Draw { .. } => "draw",
            EffectPrimitive::LootDraw { .. } => "loot-draw",
            EffectPrimitive::Discard { .. } => "discard",
            EffectPrimitive::Steal { .. } => "steal",
            EffectPrimitive::SpawnCompanion => "spawn-companion",
            EffectPrimitive::Field(_) => "field",
            EffectPrimitive::SkipFlag { .. } => "skip-flag",
            EffectPrimitive::HealBlock { .. } => "heal-block",
            EffectPrimitive::HandLock { .. } => "hand-lock",
            EffectPrimitive::BuffGrant { .. } => "buff-grant",
            EffectPrimitive::PersistentBuff(_) => "persistent-buff",
        }
    }
}

/// Primitive list; most cards compile to one or two primitives.
pub type Primitives = SmallVec<[EffectPrimitive; 4]>;

/// Everything the resolver needs to know about a card, compiled once from
/// its definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectPlan {
    /// Resolved when the card is played (or a trap is sprung).
    pub primitives: Primitives,

    /// Resolved at the start of each of the owner's turns while the card is
    /// on the field.
    pub upkeep: Primitives,

    /// Trap that resolves as soon as it is placed.
    pub auto_trigger: bool,

    /// Move the card from the field to the discard pile after resolving.
    pub discard_after_use: bool,
}

impl EffectPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.upkeep.is_empty()
    }

    #[must_use]
    pub fn has_upkeep(&self) -> bool {
        !self.upkeep.is_empty()
    }
}
