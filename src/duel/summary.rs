//! End-of-duel report.

use serde::{Deserialize, Serialize};

use crate::core::player::{PlayerKey, Players};
use crate::core::state::{DuelState, DuelStats};

/// One seat's line in the summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: String,
    pub hp: i64,
    /// Cards still held across deck, hand, field and discard pile.
    pub cards_held: usize,
    pub stats: DuelStats,
}

/// Reportable outcome of a duel, finished or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelSummary {
    pub winner: Option<PlayerKey>,
    pub turns: u32,
    pub actions: usize,
    pub players: Players<PlayerSummary>,
}

impl DuelSummary {
    #[must_use]
    pub fn from_state(state: &DuelState) -> Self {
        Self {
            winner: state.winner,
            turns: state.turn,
            actions: state.history.len(),
            players: Players::new(|key| {
                let seat = &state.players[key];
                PlayerSummary {
                    id: seat.id.clone(),
                    hp: seat.hp,
                    cards_held: seat.card_count(),
                    stats: state.stats[key].clone(),
                }
            }),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardInstance;
    use crate::core::config::DuelConfig;

    #[test]
    fn test_summary_reflects_state() {
        let mut state = DuelState::new("alice", "bot", &DuelConfig::default());
        state.players.player2.hp = 0;
        state.players.player1.deck = (1..=5).map(CardInstance::new).collect();
        state.stats.player1.damage_dealt = 200;
        state.winner = Some(PlayerKey::Player1);
        state.turn = 7;

        let summary = DuelSummary::from_state(&state);
        assert!(summary.is_finished());
        assert_eq!(summary.turns, 7);
        assert_eq!(summary.players.player1.id, "alice");
        assert_eq!(summary.players.player1.cards_held, 5);
        assert_eq!(summary.players.player1.stats.damage_dealt, 200);
        assert_eq!(summary.players.player2.hp, 0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["players"]["player1"]["cardsHeld"], 5);
        assert_eq!(json["winner"], "player1");

        let back: DuelSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_summary_missing_seat_defaults() {
        let summary: DuelSummary = serde_json::from_str(
            r#"{"winner": null, "turns": 3, "actions": 4,
                "players": {"player1": {"id": "alice", "hp": 150, "cardsHeld": 9, "stats": {}}}}"#,
        )
        .unwrap();
        assert_eq!(summary.players.player1.hp, 150);
        assert_eq!(summary.players.player2, PlayerSummary::default());
        assert!(!summary.is_finished());
    }
}
