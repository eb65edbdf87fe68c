//! Card instances - a card sitting in a zone.
//!
//! A `CardInstance` is just the definition id plus its face-down flag.
//! Instances are moved between zones, never copied.

use serde::{Deserialize, Serialize};

use super::definition::CardId;

/// A card in a zone.
///
/// `face_down` is the card's own concealment flag (set for traps waiting
/// on the field). Presentation-level hiding of an opponent's hand never
/// touches it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    pub card_id: CardId,

    #[serde(default)]
    pub face_down: bool,
}

impl CardInstance {
    /// Create a face-up instance.
    #[must_use]
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
            face_down: false,
        }
    }

    /// Create a face-down instance.
    #[must_use]
    pub fn face_down(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
            face_down: true,
        }
    }
}
