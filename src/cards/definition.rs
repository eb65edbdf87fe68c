//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its type,
//! classification tags, numeric stats and the free-text effect the resolver
//! interprets. Instance data (which zone, face-down) lives in
//! `CardInstance`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width card identifiers are zero-padded to.
pub const CARD_ID_WIDTH: usize = 3;

/// Identifier of a card definition, always normalized to a zero-padded
/// string ("7", 7 and "007" are the same card).
///
/// Deserializes from either a JSON number or a string.
///
/// ```
/// use card_duel::cards::CardId;
///
/// assert_eq!(CardId::new(7), CardId::parse("07"));
/// assert_eq!(CardId::parse(" 12 ").as_str(), "012");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(String);

impl CardId {
    /// Create from a numeric identifier.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(format!("{:0width$}", id, width = CARD_ID_WIDTH))
    }

    /// Normalize an identifier arriving as text.
    ///
    /// Purely numeric input is re-padded; anything else is kept trimmed.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let digits = trimmed.trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            Self(format!("{:0>width$}", digits, width = CARD_ID_WIDTH))
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Placeholder shown in place of a card the viewer may not see.
    #[must_use]
    pub fn hidden() -> Self {
        Self(String::from("???"))
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0 == "???"
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl From<&str> for CardId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CardIdVisitor;

        impl<'de> Visitor<'de> for CardIdVisitor {
            type Value = CardId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a card id as a number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CardId, E> {
                u32::try_from(v)
                    .map(CardId::new)
                    .map_err(|_| E::custom(format!("card id {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CardId, E> {
                u32::try_from(v)
                    .map(CardId::new)
                    .map_err(|_| E::custom(format!("card id {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CardId, E> {
                Ok(CardId::parse(v))
            }
        }

        deserializer.deserialize_any(CardIdVisitor)
    }
}

/// Card type. Drives classification: traps go face-down, infected cards
/// get their own resolution branch, defense cards keep "discard this card".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Attack,
    Defense,
    Trap,
    Tactical,
    Loot,
    Infected,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Attack,
        CardType::Defense,
        CardType::Trap,
        CardType::Tactical,
        CardType::Loot,
        CardType::Infected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Attack => "attack",
            CardType::Defense => "defense",
            CardType::Trap => "trap",
            CardType::Tactical => "tactical",
            CardType::Loot => "loot",
            CardType::Infected => "infected",
        }
    }

    /// Parse a lowercase type word as it appears in effect text.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == word)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use card_duel::cards::{CardDefinition, CardId, CardType};
///
/// let rifle = CardDefinition::new(CardId::new(1), "Rifle", CardType::Attack)
///     .with_tag("gun")
///     .with_text("Deal 10 dmg.")
///     .with_stat("weight", 3);
///
/// assert!(rifle.has_tag("gun"));
/// assert_eq!(rifle.stat("weight"), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub id: CardId,

    pub name: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    /// Stored lowercase whichever way they arrive.
    #[serde(default, deserialize_with = "lowercase_tags")]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub effect_text: String,

    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

fn lowercase_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Vec::<String>::deserialize(deserializer)?;
    Ok(tags.into_iter().map(|t| t.to_lowercase()).collect())
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            tags: BTreeSet::new(),
            effect_text: String::new(),
            stats: BTreeMap::new(),
        }
    }

    /// Add a tag (builder pattern). Tags are stored lowercase.
    #[must_use]
    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tags.insert(tag.as_ref().to_lowercase());
        self
    }

    /// Set the effect text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.effect_text = text.into();
        self
    }

    /// Add a numeric stat (builder pattern).
    #[must_use]
    pub fn with_stat(mut self, key: impl Into<String>, value: i64) -> Self {
        self.stats.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn stat(&self, key: &str) -> Option<i64> {
        self.stats.get(key).copied()
    }

    /// Whether the card answers to a classification word, either through
    /// its type or one of its tags.
    #[must_use]
    pub fn is_kind(&self, word: &str) -> bool {
        self.card_type.as_str() == word || self.has_tag(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_normalization() {
        assert_eq!(CardId::new(1).as_str(), "001");
        assert_eq!(CardId::parse("1"), CardId::new(1));
        assert_eq!(CardId::parse("001"), CardId::new(1));
        assert_eq!(CardId::parse("0001"), CardId::new(1));
        assert_eq!(CardId::parse("1234").as_str(), "1234");
        assert_eq!(CardId::parse("0").as_str(), "000");
        assert_eq!(CardId::parse("promo-a").as_str(), "promo-a");
    }

    #[test]
    fn test_card_id_deserializes_numbers_and_strings() {
        let ids: Vec<CardId> = serde_json::from_str(r#"[7, "7", "007", "12"]"#).unwrap();
        assert_eq!(ids[0], CardId::new(7));
        assert_eq!(ids[1], CardId::new(7));
        assert_eq!(ids[2], CardId::new(7));
        assert_eq!(ids[3].as_str(), "012");
        assert_eq!(serde_json::to_string(&ids[0]).unwrap(), "\"007\"");
    }

    #[test]
    fn test_card_id_rejects_negative() {
        assert!(serde_json::from_str::<CardId>("-3").is_err());
    }

    #[test]
    fn test_card_type_words() {
        assert_eq!(CardType::from_word("trap"), Some(CardType::Trap));
        assert_eq!(CardType::from_word("gun"), None);
        assert_eq!(CardType::Infected.to_string(), "infected");
    }

    #[test]
    fn test_definition_from_json() {
        let card: CardDefinition = serde_json::from_str(
            r#"{"id": 5, "name": "Medkit", "type": "tactical",
                "tags": ["consumable"], "effectText": "Restore 20 HP."}"#,
        )
        .unwrap();

        assert_eq!(card.id, CardId::new(5));
        assert_eq!(card.card_type, CardType::Tactical);
        assert!(card.has_tag("consumable"));
        assert!(card.is_kind("tactical"));
        assert!(card.stats.is_empty());
    }
}
