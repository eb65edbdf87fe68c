//! Duel events.
//!
//! Every observable consequence of an action becomes a `DuelEvent`. Hosts
//! use the list to drive presentation (animations, log lines, sounds);
//! the engine itself never reads it back.

use serde::{Deserialize, Serialize};

use crate::buffs::ModifierKey;
use crate::cards::CardId;
use crate::core::player::PlayerKey;
use crate::zones::{DrawFailure, Zone};

/// Something that happened during an action.
///
/// Serialized with a `kind` tag in kebab-case and camelCase fields, e.g.
/// `{"kind":"heal-blocked","player":"player1","amount":10}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum DuelEvent {
    // === Cards ===
    CardPlayed {
        player: PlayerKey,
        card_id: CardId,
    },
    Draw {
        player: PlayerKey,
        card_id: CardId,
        from: Zone,
    },
    DrawFailed {
        player: PlayerKey,
        reason: DrawFailure,
    },
    Discard {
        player: PlayerKey,
        card_id: CardId,
        forced: bool,
    },
    Steal {
        from: PlayerKey,
        to: PlayerKey,
        card_id: CardId,
    },
    CardDestroyed {
        owner: PlayerKey,
        card_id: CardId,
    },
    CardDiscardedAfterUse {
        player: PlayerKey,
        card_id: CardId,
    },
    CompanionSpawned {
        player: PlayerKey,
        card_id: CardId,
    },
    UnknownCard {
        card_id: CardId,
    },

    // === Traps ===
    /// A trap went face-down. The id stays hidden.
    TrapSet {
        player: PlayerKey,
    },
    TrapTriggered {
        player: PlayerKey,
        card_id: CardId,
    },
    TrapRevealed {
        owner: PlayerKey,
        card_id: CardId,
    },
    TrapDisarmed {
        owner: PlayerKey,
        card_id: CardId,
    },

    // === HP ===
    Damage {
        source: PlayerKey,
        target: PlayerKey,
        amount: i64,
        card_id: CardId,
    },
    Heal {
        player: PlayerKey,
        amount: i64,
    },
    HealBlocked {
        player: PlayerKey,
        amount: i64,
    },

    // === Modifiers and turns ===
    BuffApplied {
        player: PlayerKey,
        buff: ModifierKey,
    },
    TurnStarted {
        player: PlayerKey,
        turn: u32,
    },
    TurnSkipped {
        player: PlayerKey,
    },
    DrawSkipped {
        player: PlayerKey,
    },
    GameOver {
        winner: PlayerKey,
    },
}

/// Ordered event buffer for one action.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<DuelEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DuelEvent) {
        tracing::debug!(?event, "duel event");
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DuelEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<DuelEvent> {
        self.events
    }
}
