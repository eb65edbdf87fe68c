//! Effect targeting.
//!
//! - `Side`: which player a primitive acts on, relative to the actor
//! - `CardFilter`: which cards of a zone qualify
//! - `Selection`: how one card is picked among candidates

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardDefinition, CardInstance};
use crate::core::player::PlayerKey;
use crate::core::rng::RandomSource;

/// Player a primitive acts on, relative to whoever played the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Actor,
    Opponent,
}

impl Side {
    #[must_use]
    pub const fn resolve(self, actor: PlayerKey) -> PlayerKey {
        match self {
            Side::Actor => actor,
            Side::Opponent => actor.opponent(),
        }
    }
}

/// Card predicate used by draw, discard and steal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardFilter {
    #[default]
    Any,
    /// Cards whose type or one of whose tags equals the word.
    Kind(String),
}

impl CardFilter {
    #[must_use]
    pub fn kind(word: impl Into<String>) -> Self {
        CardFilter::Kind(word.into())
    }

    /// Match against a definition. Unknown cards only match `Any`.
    #[must_use]
    pub fn matches(&self, card: Option<&CardDefinition>) -> bool {
        match self {
            CardFilter::Any => true,
            CardFilter::Kind(word) => card.is_some_and(|c| c.is_kind(word)),
        }
    }

    /// Match an instance by looking its definition up.
    #[must_use]
    pub fn matches_instance(&self, catalog: &CardCatalog, card: &CardInstance) -> bool {
        self.matches(catalog.get(&card.card_id))
    }
}

impl fmt::Display for CardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFilter::Any => f.write_str("any card"),
            CardFilter::Kind(word) => write!(f, "{word} card"),
        }
    }
}

/// How a single target is chosen among candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    First,
    Random,
}

impl Selection {
    /// Pick one of `candidates`.
    pub fn pick<T: Copy>(self, candidates: &[T], rng: &mut dyn RandomSource) -> Option<T> {
        match self {
            Selection::First => candidates.first().copied(),
            Selection::Random => rng.pick_index(candidates.len()).map(|i| candidates[i]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardType};
    use crate::core::rng::ScriptedRng;

    #[test]
    fn test_side_resolve() {
        assert_eq!(Side::Actor.resolve(PlayerKey::Player2), PlayerKey::Player2);
        assert_eq!(Side::Opponent.resolve(PlayerKey::Player2), PlayerKey::Player1);
    }

    #[test]
    fn test_filter_matches_type_or_tag() {
        let pistol = CardDefinition::new(CardId::new(1), "Pistol", CardType::Attack).with_tag("gun");
        assert!(CardFilter::Any.matches(None));
        assert!(CardFilter::kind("attack").matches(Some(&pistol)));
        assert!(CardFilter::kind("gun").matches(Some(&pistol)));
        assert!(!CardFilter::kind("trap").matches(Some(&pistol)));
        assert!(!CardFilter::kind("trap").matches(None));
    }

    #[test]
    fn test_selection_pick() {
        let mut rng = ScriptedRng::new([2]);
        assert_eq!(Selection::First.pick(&[4, 5, 6], &mut rng), Some(4));
        assert_eq!(Selection::Random.pick(&[4, 5, 6], &mut rng), Some(6));
        assert_eq!(Selection::Random.pick::<usize>(&[], &mut rng), None);
    }
}
