//! Zone manager for card locations and movement.
//!
//! Zones live inside `DuelState` (four per player plus the shared loot
//! pile); the `ZoneManager` is the only code that moves cards between them.
//! It enforces:
//! - Capacity limits (hand and field), checked before anything is removed
//! - Valid zone references (player zones need an owner, the loot pile must
//!   not have one)
//! - Conservation: a move removes exactly one instance and inserts it once
//!
//! Ordered zones keep their top at index 0, so the deck draws from the front.

use std::fmt;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance};
use crate::core::config::DuelConfig;
use crate::core::error::ZoneError;
use crate::core::player::PlayerKey;
use crate::core::rng::RandomSource;
use crate::core::state::DuelState;

/// Kind of zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Deck,
    Hand,
    Field,
    Discard,
    /// Shared loot pile, owned by nobody.
    Loot,
}

impl Zone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Field => "field",
            Zone::Discard => "discard pile",
            Zone::Loot => "loot pile",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete zone: kind plus owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRef {
    pub owner: Option<PlayerKey>,
    pub zone: Zone,
}

impl ZoneRef {
    #[must_use]
    pub const fn player(owner: PlayerKey, zone: Zone) -> Self {
        Self {
            owner: Some(owner),
            zone,
        }
    }

    #[must_use]
    pub const fn loot() -> Self {
        Self {
            owner: None,
            zone: Zone::Loot,
        }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(
            (self.owner, self.zone),
            (None, Zone::Loot) | (Some(_), Zone::Deck | Zone::Hand | Zone::Field | Zone::Discard)
        )
    }
}

impl fmt::Display for ZoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{} {}", owner, self.zone),
            None => write!(f, "{}", self.zone),
        }
    }
}

/// Which card of a zone to move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardSelector {
    /// Position in the zone (0 = top).
    Index(usize),
    /// The top card.
    Top,
    /// The first instance of a card id.
    Id(CardId),
}

impl fmt::Display for CardSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSelector::Index(i) => write!(f, "index {i}"),
            CardSelector::Top => f.write_str("the top card"),
            CardSelector::Id(id) => write!(f, "card {id}"),
        }
    }
}

/// Why a draw did not happen. Draw failures are never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawFailure {
    HandFull,
    DeckEmpty,
    LootEmpty,
}

/// Moves cards between zones.
pub struct ZoneManager;

impl ZoneManager {
    /// Capacity of a zone kind, `None` when unbounded.
    #[must_use]
    pub fn capacity(config: &DuelConfig, zone: Zone) -> Option<usize> {
        match zone {
            Zone::Hand => Some(config.hand_capacity),
            Zone::Field => Some(config.field_capacity),
            Zone::Deck | Zone::Discard | Zone::Loot => None,
        }
    }

    /// Read a zone.
    pub fn cards(state: &DuelState, zone: ZoneRef) -> Result<&Vector<CardInstance>, ZoneError> {
        match (zone.owner, zone.zone) {
            (None, Zone::Loot) => Ok(&state.loot_pile),
            (Some(owner), kind) => {
                let player = &state.players[owner];
                match kind {
                    Zone::Deck => Ok(&player.deck),
                    Zone::Hand => Ok(&player.hand),
                    Zone::Field => Ok(&player.field),
                    Zone::Discard => Ok(&player.discard_pile),
                    Zone::Loot => Err(ZoneError::InvalidZone(zone)),
                }
            }
            (None, _) => Err(ZoneError::InvalidZone(zone)),
        }
    }

    fn cards_mut(
        state: &mut DuelState,
        zone: ZoneRef,
    ) -> Result<&mut Vector<CardInstance>, ZoneError> {
        match (zone.owner, zone.zone) {
            (None, Zone::Loot) => Ok(&mut state.loot_pile),
            (Some(owner), kind) => {
                let player = &mut state.players[owner];
                match kind {
                    Zone::Deck => Ok(&mut player.deck),
                    Zone::Hand => Ok(&mut player.hand),
                    Zone::Field => Ok(&mut player.field),
                    Zone::Discard => Ok(&mut player.discard_pile),
                    Zone::Loot => Err(ZoneError::InvalidZone(zone)),
                }
            }
            (None, _) => Err(ZoneError::InvalidZone(zone)),
        }
    }

    fn locate(cards: &Vector<CardInstance>, selector: &CardSelector) -> Option<usize> {
        match selector {
            CardSelector::Index(i) => (*i < cards.len()).then_some(*i),
            CardSelector::Top => (!cards.is_empty()).then_some(0),
            CardSelector::Id(id) => cards.iter().position(|c| &c.card_id == id),
        }
    }

    /// Whether a zone is at capacity.
    pub fn is_full(state: &DuelState, config: &DuelConfig, zone: ZoneRef) -> Result<bool, ZoneError> {
        let len = Self::cards(state, zone)?.len();
        Ok(Self::capacity(config, zone.zone).is_some_and(|cap| len >= cap))
    }

    /// Move one card from `from` to the bottom of `to`.
    ///
    /// On error nothing has moved. A card leaving for any zone other than
    /// the field is turned face-up.
    pub fn move_card(
        state: &mut DuelState,
        config: &DuelConfig,
        from: ZoneRef,
        to: ZoneRef,
        selector: &CardSelector,
    ) -> Result<CardInstance, ZoneError> {
        if !to.is_valid() {
            return Err(ZoneError::InvalidZone(to));
        }
        let index = Self::locate(Self::cards(state, from)?, selector).ok_or_else(|| {
            ZoneError::NotFound {
                zone: from,
                selector: selector.clone(),
            }
        })?;

        if from != to && Self::is_full(state, config, to)? {
            let capacity = Self::capacity(config, to.zone).unwrap_or_default();
            return Err(ZoneError::CapacityExceeded { zone: to, capacity });
        }

        let mut card = Self::cards_mut(state, from)?.remove(index);
        if to.zone != Zone::Field {
            card.face_down = false;
        }
        Self::cards_mut(state, to)?.push_back(card.clone());
        tracing::trace!(card = %card.card_id, %from, %to, "moved card");
        Ok(card)
    }

    /// Draw the top card of a player's deck into their hand.
    pub fn draw(
        state: &mut DuelState,
        config: &DuelConfig,
        player: PlayerKey,
    ) -> Result<CardInstance, DrawFailure> {
        Self::draw_matching(state, config, player, |_| true)
    }

    /// Draw the first deck card matching `predicate`, wherever it sits in
    /// the deck. Falls back to the top card when nothing matches.
    pub fn draw_matching(
        state: &mut DuelState,
        config: &DuelConfig,
        player: PlayerKey,
        predicate: impl Fn(&CardInstance) -> bool,
    ) -> Result<CardInstance, DrawFailure> {
        let hand = ZoneRef::player(player, Zone::Hand);
        let deck = &state.players[player].deck;
        if state.players[player].hand.len() >= config.hand_capacity {
            return Err(DrawFailure::HandFull);
        }
        if deck.is_empty() {
            return Err(DrawFailure::DeckEmpty);
        }
        let index = deck.iter().position(predicate).unwrap_or(0);
        Self::move_card(
            state,
            config,
            ZoneRef::player(player, Zone::Deck),
            hand,
            &CardSelector::Index(index),
        )
        .map_err(|_| DrawFailure::HandFull)
    }

    /// Take the top card of the shared loot pile into a player's hand.
    pub fn take_from_loot(
        state: &mut DuelState,
        config: &DuelConfig,
        player: PlayerKey,
    ) -> Result<CardInstance, DrawFailure> {
        if state.players[player].hand.len() >= config.hand_capacity {
            return Err(DrawFailure::HandFull);
        }
        if state.loot_pile.is_empty() {
            return Err(DrawFailure::LootEmpty);
        }
        Self::move_card(
            state,
            config,
            ZoneRef::loot(),
            ZoneRef::player(player, Zone::Hand),
            &CardSelector::Top,
        )
        .map_err(|_| DrawFailure::HandFull)
    }

    /// Shuffle a player's deck.
    pub fn shuffle_deck(state: &mut DuelState, player: PlayerKey, rng: &mut dyn RandomSource) {
        let mut cards: Vec<CardInstance> = state.players[player].deck.iter().cloned().collect();
        rng.shuffle_cards(&mut cards);
        state.players[player].deck = cards.into_iter().collect();
    }

    /// Indices of the cards in a zone matching a predicate.
    pub fn positions(
        state: &DuelState,
        zone: ZoneRef,
        predicate: impl Fn(&CardInstance) -> bool,
    ) -> Result<Vec<usize>, ZoneError> {
        Ok(Self::cards(state, zone)?
            .iter()
            .enumerate()
            .filter(|(_, c)| predicate(c))
            .map(|(i, _)| i)
            .collect())
    }

    /// Sorted multiset of every card a player holds across their four zones.
    #[must_use]
    pub fn pool(state: &DuelState, player: PlayerKey) -> Vec<CardId> {
        let p = &state.players[player];
        let mut ids: Vec<CardId> = p
            .deck
            .iter()
            .chain(p.hand.iter())
            .chain(p.field.iter())
            .chain(p.discard_pile.iter())
            .map(|c| c.card_id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Sorted multiset of every card in the duel, loot pile included.
    #[must_use]
    pub fn global_pool(state: &DuelState) -> Vec<CardId> {
        let mut ids: Vec<CardId> = PlayerKey::ALL
            .into_iter()
            .flat_map(|p| Self::pool(state, p))
            .chain(state.loot_pile.iter().map(|c| c.card_id.clone()))
            .collect();
        ids.sort();
        ids
    }
}

/// Deserialize a zone that may be missing or `null` in an external payload.
pub(crate) fn lenient_zone<'de, D>(deserializer: D) -> Result<Vector<CardInstance>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let cards: Option<Vec<CardInstance>> = Option::deserialize(deserializer)?;
    Ok(cards.map(Vector::from).unwrap_or_default())
}
