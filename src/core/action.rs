//! Player actions and action history.
//!
//! ## DuelAction
//!
//! The five things the current player can do. Serialized with a `type`
//! tag, e.g. `{"type":"playCard","index":0}`.
//!
//! ## ActionRecord
//!
//! History entry: who acted, on which turn, from where.

use serde::{Deserialize, Serialize};

use super::player::PlayerKey;

/// An action taken by the current player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DuelAction {
    /// Play the hand card at `index` onto the field.
    PlayCard { index: usize },
    /// Discard the hand card at `index`.
    DiscardCard { index: usize },
    /// Draw one card from the deck.
    DrawCard,
    /// End the turn.
    EndTurn,
    /// Spring the face-down trap at field slot `index`.
    ActivateTrap { index: usize },
}

impl DuelAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            DuelAction::PlayCard { .. } => "playCard",
            DuelAction::DiscardCard { .. } => "discardCard",
            DuelAction::DrawCard => "drawCard",
            DuelAction::EndTurn => "endTurn",
            DuelAction::ActivateTrap { .. } => "activateTrap",
        }
    }

    /// Actions only the interactive seat may submit locally.
    #[must_use]
    pub const fn is_hand_action(&self) -> bool {
        matches!(self, DuelAction::PlayCard { .. } | DuelAction::DiscardCard { .. })
    }
}

/// Where an action came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionOrigin {
    /// Local input from the host.
    Interactive,
    /// A move returned by the remote counterpart.
    Remote,
}

/// A move submitted by the remote counterpart, naming its acting seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMove {
    pub player: PlayerKey,
    pub action: DuelAction,
}

impl RemoteMove {
    #[must_use]
    pub fn new(player: PlayerKey, action: DuelAction) -> Self {
        Self { player, action }
    }
}

/// A record of a completed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// Position in the duel's history, starting at 0.
    pub sequence: u32,
    /// Turn number the action was taken on.
    pub turn: u32,
    pub player: PlayerKey,
    pub action: DuelAction,
    pub origin: ActionOrigin,
}
