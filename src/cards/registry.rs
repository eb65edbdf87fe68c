//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition a duel can reference and
//! the effect plan compiled from each definition's text. Effect text is
//! static, so plans are compiled once at registration.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{CardDefinition, CardId, CardType};
use crate::core::error::{CatalogError, LookupError};
use crate::effects::EffectPlan;

const STANDARD_CARDS: &str = include_str!("../../data/standard_cards.json");

#[derive(Deserialize)]
struct CatalogFile {
    cards: Vec<CardDefinition>,
}

/// Immutable card lookup.
///
/// ## Example
///
/// ```
/// use card_duel::cards::{CardCatalog, CardDefinition, CardId, CardType};
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .register(CardDefinition::new(CardId::new(1), "Pistol", CardType::Attack).with_text("Deal 10 dmg."))
///     .unwrap();
///
/// let pistol = catalog.get(&CardId::parse("1")).unwrap();
/// assert_eq!(pistol.name, "Pistol");
/// assert!(!catalog.plan(&pistol.id).unwrap().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    plans: FxHashMap<CardId, EffectPlan>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled standard card set.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json_str(STANDARD_CARDS)
    }

    /// Load from a JSON document `{"cards": [...]}` or a bare array.
    pub fn from_json_str(src: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        let cards: Vec<CardDefinition> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            serde_json::from_value::<CatalogFile>(value)?.cards
        };

        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Register a card definition and compile its effect plan.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::Duplicate(card.id));
        }
        let plan = EffectPlan::compile(&card);
        tracing::debug!(card = %card.id, primitives = plan.primitives.len(), "registered card");
        self.plans.insert(card.id.clone(), plan);
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// A definition together with its compiled plan.
    pub fn entry(&self, id: &CardId) -> Result<(&CardDefinition, &EffectPlan), LookupError> {
        match (self.cards.get(id), self.plans.get(id)) {
            (Some(card), Some(plan)) => Ok((card, plan)),
            _ => Err(LookupError(id.clone())),
        }
    }

    /// Get a card definition, reporting unknown ids as a `LookupError`.
    pub fn lookup(&self, id: &CardId) -> Result<&CardDefinition, LookupError> {
        self.cards.get(id).ok_or_else(|| LookupError(id.clone()))
    }

    /// Get the compiled effect plan for a card.
    #[must_use]
    pub fn plan(&self, id: &CardId) -> Option<&EffectPlan> {
        self.plans.get(id)
    }

    /// Type of a card, if known.
    #[must_use]
    pub fn card_type(&self, id: &CardId) -> Option<CardType> {
        self.cards.get(id).map(|c| c.card_type)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectPrimitive;

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog
            .register(CardDefinition::new(CardId::new(1), "Test Card", CardType::Attack))
            .unwrap();

        assert_eq!(catalog.get(&CardId::new(1)).unwrap().name, "Test Card");
        assert!(catalog.get(&CardId::new(99)).is_none());
        assert_eq!(catalog.lookup(&CardId::new(99)), Err(LookupError(CardId::new(99))));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = CardCatalog::new();
        catalog
            .register(CardDefinition::new(CardId::new(1), "A", CardType::Attack))
            .unwrap();
        let err = catalog
            .register(CardDefinition::new(CardId::parse("001"), "B", CardType::Loot))
            .unwrap_err();
        assert_eq!(err, CatalogError::Duplicate(CardId::new(1)));
    }

    #[test]
    fn test_from_json_bare_array() {
        let catalog = CardCatalog::from_json_str(
            r#"[{"id": 1, "name": "Knife", "type": "attack", "effectText": "Deal 12 dmg."},
                {"id": "2", "name": "Medkit", "type": "tactical"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.card_type(&CardId::new(2)), Some(CardType::Tactical));
    }

    #[test]
    fn test_from_json_oversized_amounts() {
        let catalog = CardCatalog::from_json_str(
            r#"[{"id": 90, "name": "Railgun", "type": "attack",
                 "effectText": "Deal 4000000000x4000000000 dmg."}]"#,
        )
        .unwrap();
        let plan = catalog.plan(&CardId::new(90)).unwrap();
        assert_eq!(plan.primitives.as_slice(), &[EffectPrimitive::Damage { amount: i64::MAX }]);
    }

    #[test]
    fn test_from_json_tags_lowercased() {
        let catalog = CardCatalog::from_json_str(
            r#"[{"id": 1, "name": "Pistol", "type": "attack", "tags": ["Gun", "Consumable"],
                 "effectText": "Deal 10 dmg."}]"#,
        )
        .unwrap();
        let pistol = catalog.get(&CardId::new(1)).unwrap();
        assert!(pistol.has_tag("gun"));
        assert!(pistol.has_tag("consumable"));
        assert!(catalog.plan(&CardId::new(1)).unwrap().discard_after_use);
    }

    #[test]
    fn test_entry_unknown_id() {
        let catalog = CardCatalog::standard().unwrap();
        assert!(catalog.entry(&CardId::new(1)).is_ok());
        assert_eq!(catalog.entry(&CardId::new(999)).err(), Some(LookupError(CardId::new(999))));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            CardCatalog::from_json_str("{\"cards\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_standard_catalog_loads() {
        let catalog = CardCatalog::standard().unwrap();
        assert!(catalog.len() >= 20);
        for card_type in CardType::ALL {
            assert!(
                catalog.find_by_type(card_type).next().is_some(),
                "standard set has no {card_type} card"
            );
        }
        for card in catalog.iter() {
            assert!(catalog.plan(&card.id).is_some());
        }
    }
}
