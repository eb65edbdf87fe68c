//! Trigger conditions read from card metadata.
//!
//! Two questions are answered once per card, at catalog registration:
//! does a trap spring the moment it is placed, and does a card leave the
//! field right after its effect resolves.

use crate::cards::{CardDefinition, CardType};

/// Phrases that make a trap spring on placement.
const AUTO_TRIGGER_PHRASES: &[&str] = &["by play", "automatically", "on enemy card"];

/// Tags that send a card to the discard pile after use.
const DISCARD_TAGS: &[&str] = &["discard_after_use", "consumable", "one_use"];

/// Text that sends a card to the discard pile after use.
const DISCARD_PHRASES: &[&str] = &[
    "discard after use",
    "discarded after use",
    "discard on use",
    "single use",
    "single-use",
];

/// Trap trigger classification.
pub struct TrapTrigger;

impl TrapTrigger {
    /// Whether a trap resolves as soon as it is placed. Always false for
    /// non-trap cards.
    #[must_use]
    pub fn is_automatic(card: &CardDefinition) -> bool {
        if card.card_type != CardType::Trap {
            return false;
        }
        let text = card.effect_text.to_lowercase();
        AUTO_TRIGGER_PHRASES.iter().any(|p| text.contains(p))
    }
}

/// Auto-discard classification.
pub struct DiscardPolicy;

impl DiscardPolicy {
    /// Whether a card moves from the field to the discard pile right after
    /// its effect resolves.
    ///
    /// Defense cards ignore "discard this card": they stay on the field.
    #[must_use]
    pub fn discards_after_use(card: &CardDefinition) -> bool {
        if DISCARD_TAGS.iter().any(|t| card.has_tag(t)) {
            return true;
        }
        let text = card.effect_text.to_lowercase();
        if DISCARD_PHRASES.iter().any(|p| text.contains(p)) {
            return true;
        }
        card.card_type != CardType::Defense && text.contains("discard this card")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn card(card_type: CardType, text: &str) -> CardDefinition {
        CardDefinition::new(CardId::new(1), "Test", card_type).with_text(text)
    }

    #[test]
    fn test_auto_trigger_phrases() {
        assert!(TrapTrigger::is_automatic(&card(
            CardType::Trap,
            "Triggered automatically on enemy card: deal 10 dmg."
        )));
        assert!(TrapTrigger::is_automatic(&card(CardType::Trap, "Springs by play.")));
        assert!(!TrapTrigger::is_automatic(&card(CardType::Trap, "Deal 20 dmg.")));
        assert!(!TrapTrigger::is_automatic(&card(CardType::Attack, "Fires automatically.")));
    }

    #[test]
    fn test_discard_by_tag() {
        let medkit = card(CardType::Tactical, "Restore 20 HP.").with_tag("consumable");
        assert!(DiscardPolicy::discards_after_use(&medkit));
        assert!(!DiscardPolicy::discards_after_use(&card(CardType::Tactical, "Restore 20 HP.")));
    }

    #[test]
    fn test_discard_by_text() {
        assert!(DiscardPolicy::discards_after_use(&card(
            CardType::Attack,
            "Deal 12 dmg. Discard after use."
        )));
        assert!(DiscardPolicy::discards_after_use(&card(
            CardType::Attack,
            "Deal 5 dmg. Discard this card."
        )));
    }

    #[test]
    fn test_defense_keeps_discard_this_card() {
        let shield = card(CardType::Defense, "Heal 10 HP. Discard this card.");
        assert!(!DiscardPolicy::discards_after_use(&shield));
        assert!(DiscardPolicy::discards_after_use(&shield.with_tag("one_use")));
    }
}
