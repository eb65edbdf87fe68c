//! Duel state: the root of everything a duel owns.
//!
//! ## PlayerState
//!
//! One seat's HP, four zones and modifier bag.
//!
//! ## DuelState
//!
//! Both seats, the shared loot pile, whose turn it is, the winner, the
//! turn phase, action history and running statistics. Serializes to the
//! camelCase JSON snapshot hosts exchange.
//!
//! Zones are `im::Vector`s, so cloning a state is O(1). The orchestrator
//! relies on that to apply each action to a copy and commit on success.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::DuelConfig;
use super::player::{PlayerKey, Players};
use super::rng::RandomSource;
use crate::buffs::ModifierBag;
use crate::cards::{CardId, CardInstance};
use crate::rules::TurnPhase;
use crate::zones::{lenient_zone, ZoneManager};

fn default_hp() -> i64 {
    DuelConfig::default().starting_hp
}

fn first_turn() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// State of one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_hp")]
    pub hp: i64,

    #[serde(default, deserialize_with = "lenient_zone")]
    pub hand: Vector<CardInstance>,

    #[serde(default, deserialize_with = "lenient_zone")]
    pub field: Vector<CardInstance>,

    #[serde(default, deserialize_with = "lenient_zone")]
    pub deck: Vector<CardInstance>,

    #[serde(default, deserialize_with = "lenient_zone")]
    pub discard_pile: Vector<CardInstance>,

    #[serde(default)]
    pub buffs: ModifierBag,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("", default_hp())
    }
}

impl PlayerState {
    #[must_use]
    pub fn new(id: impl Into<String>, hp: i64) -> Self {
        Self {
            id: id.into(),
            hp,
            hand: Vector::new(),
            field: Vector::new(),
            deck: Vector::new(),
            discard_pile: Vector::new(),
            buffs: ModifierBag::default(),
        }
    }

    /// Total cards across the four zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.field.len() + self.deck.len() + self.discard_pile.len()
    }
}

/// Running per-player statistics, reported in the duel summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuelStats {
    pub cards_played: u32,
    pub cards_drawn: u32,
    pub damage_dealt: i64,
    pub healing_done: i64,
    pub traps_triggered: u32,
}

/// Root duel state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelState {
    pub players: Players<PlayerState>,

    #[serde(default, deserialize_with = "lenient_zone")]
    pub loot_pile: Vector<CardInstance>,

    pub current_player: PlayerKey,

    #[serde(default)]
    pub winner: Option<PlayerKey>,

    /// Turn number (starts at 1, counts both players' turns).
    #[serde(default = "first_turn")]
    pub turn: u32,

    #[serde(default)]
    pub phase: TurnPhase,

    #[serde(default)]
    pub history: Vector<ActionRecord>,

    #[serde(default)]
    pub stats: Players<DuelStats>,
}

impl DuelState {
    /// Empty duel: both seats at starting HP, no cards, player1 to act.
    #[must_use]
    pub fn new(player1: impl Into<String>, player2: impl Into<String>, config: &DuelConfig) -> Self {
        Self {
            players: Players {
                player1: PlayerState::new(player1, config.starting_hp),
                player2: PlayerState::new(player2, config.starting_hp),
            },
            loot_pile: Vector::new(),
            current_player: PlayerKey::Player1,
            winner: None,
            turn: 1,
            phase: TurnPhase::default(),
            history: Vector::new(),
            stats: Players::default(),
        }
    }

    /// Build the opening state from a setup payload: assign decks,
    /// optionally shuffle, pick the first player and deal opening hands.
    pub fn from_setup(setup: &DuelSetup, config: &DuelConfig, rng: &mut dyn RandomSource) -> Self {
        let mut state = Self::new(
            setup.players.player1.id.clone(),
            setup.players.player2.id.clone(),
            config,
        );
        state.loot_pile = setup.loot_pile.iter().cloned().map(CardInstance::new).collect();

        for (key, seat) in setup.players.iter() {
            state.players[key].deck = seat.deck.iter().cloned().map(CardInstance::new).collect();
            if setup.shuffle {
                ZoneManager::shuffle_deck(&mut state, key, rng);
            }
        }

        state.current_player = setup.first_player.unwrap_or_else(|| {
            if rng.coin_flip() {
                PlayerKey::Player1
            } else {
                PlayerKey::Player2
            }
        });

        let opening = config.opening_hand.min(config.hand_capacity);
        for key in PlayerKey::ALL {
            for _ in 0..opening {
                if ZoneManager::draw(&mut state, config, key).is_err() {
                    break;
                }
            }
        }

        tracing::info!(
            first = %state.current_player,
            player1 = %state.players.player1.id,
            player2 = %state.players.player2.id,
            "duel started"
        );
        state
    }

    #[must_use]
    pub fn player(&self, key: PlayerKey) -> &PlayerState {
        &self.players[key]
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Copy of the state as `viewer` may see it.
    ///
    /// The opponent's hand and deck are replaced by hidden placeholders, and
    /// so are their face-down field cards. The underlying state is not
    /// touched.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerKey) -> DuelState {
        let mut view = self.clone();
        let opponent = &mut view.players[viewer.opponent()];
        let conceal = |cards: &Vector<CardInstance>| -> Vector<CardInstance> {
            cards.iter().map(|_| CardInstance::face_down(CardId::hidden())).collect()
        };
        opponent.hand = conceal(&opponent.hand);
        opponent.deck = conceal(&opponent.deck);
        opponent.field = opponent
            .field
            .iter()
            .map(|c| {
                if c.face_down {
                    CardInstance::face_down(CardId::hidden())
                } else {
                    c.clone()
                }
            })
            .collect();
        view
    }
}

/// One seat in a setup payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSetup {
    pub id: String,
    #[serde(default)]
    pub deck: Vec<CardId>,
}

impl PlayerSetup {
    #[must_use]
    pub fn new(id: impl Into<String>, deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            id: id.into(),
            deck: deck.into_iter().collect(),
        }
    }
}

/// Duel initialization payload.
///
/// ```
/// use card_duel::cards::CardId;
/// use card_duel::core::{DuelConfig, DuelSetup, DuelState, PlayerKey, PlayerSetup, ScriptedRng};
///
/// let setup = DuelSetup::new(
///     PlayerSetup::new("alice", (1..=10).map(CardId::new)),
///     PlayerSetup::new("bob", (1..=10).map(CardId::new)),
/// )
/// .with_first_player(PlayerKey::Player2);
///
/// let state = DuelState::from_setup(&setup, &DuelConfig::default(), &mut ScriptedRng::default());
/// assert_eq!(state.current_player, PlayerKey::Player2);
/// assert_eq!(state.players.player1.hand.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelSetup {
    pub players: Players<PlayerSetup>,

    #[serde(default)]
    pub loot_pile: Vec<CardId>,

    /// Seat that acts first; a coin flip decides when absent.
    #[serde(default)]
    pub first_player: Option<PlayerKey>,

    #[serde(default = "default_true")]
    pub shuffle: bool,
}

impl DuelSetup {
    #[must_use]
    pub fn new(player1: PlayerSetup, player2: PlayerSetup) -> Self {
        Self {
            players: Players { player1, player2 },
            loot_pile: Vec::new(),
            first_player: None,
            shuffle: true,
        }
    }

    #[must_use]
    pub fn with_loot_pile(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.loot_pile = cards.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_first_player(mut self, player: PlayerKey) -> Self {
        self.first_player = Some(player);
        self
    }

    /// Keep decks in the given order.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{GameRng, ScriptedRng};

    fn setup() -> DuelSetup {
        DuelSetup::new(
            PlayerSetup::new("alice", (1..=20).map(CardId::new)),
            PlayerSetup::new("bob", (21..=40).map(CardId::new)),
        )
    }

    #[test]
    fn test_from_setup_deals_opening_hands() {
        let config = DuelConfig::default();
        let state = DuelState::from_setup(&setup().without_shuffle(), &config, &mut ScriptedRng::default());

        assert_eq!(state.players.player1.hp, 200);
        assert_eq!(state.players.player1.hand.len(), 3);
        assert_eq!(state.players.player2.deck.len(), 17);
        assert_eq!(state.players.player1.hand[0].card_id, CardId::new(1));
        assert_eq!(state.turn, 1);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_coin_flip_picks_first_player() {
        let config = DuelConfig::default();
        // ScriptedRng's coin always lands true.
        let state = DuelState::from_setup(&setup(), &config, &mut ScriptedRng::default());
        assert_eq!(state.current_player, PlayerKey::Player1);

        let state = DuelState::from_setup(
            &setup().with_first_player(PlayerKey::Player2),
            &config,
            &mut GameRng::new(1),
        );
        assert_eq!(state.current_player, PlayerKey::Player2);
    }

    #[test]
    fn test_shuffle_keeps_pool() {
        let config = DuelConfig::default();
        let state = DuelState::from_setup(&setup(), &config, &mut GameRng::new(5));
        let mut expected: Vec<_> = (1..=20).map(CardId::new).collect();
        expected.sort();
        assert_eq!(ZoneManager::pool(&state, PlayerKey::Player1), expected);
    }

    #[test]
    fn test_setup_payload() {
        let setup: DuelSetup = serde_json::from_str(
            r#"{"players": {"player1": {"id": "u1", "deck": [1, "2", "003"]},
                            "player2": {"id": "bot"}},
                "lootPile": [21], "firstPlayer": "player2"}"#,
        )
        .unwrap();
        assert_eq!(setup.players.player1.deck, vec![CardId::new(1), CardId::new(2), CardId::new(3)]);
        assert!(setup.players.player2.deck.is_empty());
        assert!(setup.shuffle);
        assert_eq!(setup.first_player, Some(PlayerKey::Player2));
    }

    #[test]
    fn test_snapshot_null_zones() {
        let state: DuelState = serde_json::from_str(
            r#"{"players": {"player1": {"id": "a", "hp": 150, "hand": null, "deck": [{"cardId": 7}]},
                            "player2": {"id": "b"}},
                "currentPlayer": "player1", "winner": null, "lootPile": null}"#,
        )
        .unwrap();

        assert_eq!(state.players.player1.hp, 150);
        assert!(state.players.player1.hand.is_empty());
        assert_eq!(state.players.player1.deck[0].card_id, CardId::new(7));
        assert_eq!(state.players.player2.hp, 200);
        assert!(state.loot_pile.is_empty());
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_snapshot_field_names() {
        let state = DuelState::new("a", "b", &DuelConfig::default());
        let json = serde_json::to_value(&state).unwrap();
        assert!(json["players"]["player1"]["discardPile"].is_array());
        assert!(json["lootPile"].is_array());
        assert_eq!(json["currentPlayer"], "player1");
        assert!(json["winner"].is_null());
    }

    #[test]
    fn test_view_hides_opponent_hand_only() {
        let config = DuelConfig::default();
        let mut state = DuelState::from_setup(&setup().without_shuffle(), &config, &mut ScriptedRng::default());
        state.players.player2.field.push_back(CardInstance::face_down(12u32));
        state.players.player2.field.push_back(CardInstance::new(10u32));

        let view = state.view_for(PlayerKey::Player1);
        assert!(view.players.player2.hand.iter().all(|c| c.card_id.is_hidden() && c.face_down));
        assert!(view.players.player2.field[0].card_id.is_hidden());
        assert_eq!(view.players.player2.field[1].card_id, CardId::new(10));
        assert_eq!(view.players.player1.hand, state.players.player1.hand);
        assert!(state.players.player2.hand.iter().all(|c| !c.face_down));
    }
}
