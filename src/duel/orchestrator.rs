//! The duel orchestrator: public entry points for one duel.
//!
//! ## Key Types
//!
//! - `Duel`: owns the `DuelState` and the rules that mutate it
//! - `ActionOutcome`: events and winner produced by one action
//!
//! Every action is applied to a clone of the state and committed only when
//! it succeeds, so a rejected action leaves the duel exactly as it was.

use std::sync::Arc;

use crate::cards::CardCatalog;
use crate::core::action::{ActionOrigin, ActionRecord, DuelAction, RemoteMove};
use crate::core::config::DuelConfig;
use crate::core::error::{Result, ValidationError};
use crate::core::player::PlayerKey;
use crate::core::rng::RandomSource;
use crate::core::state::{DuelSetup, DuelState};
use crate::rules::{DuelRules, RulesEngine};
use crate::triggers::DuelEvent;

use super::summary::DuelSummary;

/// What one accepted action produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionOutcome {
    pub events: Vec<DuelEvent>,
    /// Winner after the action, if the duel is over.
    pub winner: Option<PlayerKey>,
    /// The action was silently ignored (interactive input from a seat that
    /// may not act interactively).
    pub ignored: bool,
}

impl ActionOutcome {
    fn ignored(winner: Option<PlayerKey>) -> Self {
        Self {
            events: Vec::new(),
            winner,
            ignored: true,
        }
    }
}

/// One duel between two seats.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
///
/// use card_duel::cards::{CardCatalog, CardId};
/// use card_duel::core::{DuelConfig, DuelSetup, PlayerKey, PlayerSetup, ScriptedRng};
/// use card_duel::duel::Duel;
///
/// let catalog = Arc::new(CardCatalog::standard().unwrap());
/// let setup = DuelSetup::new(
///     PlayerSetup::new("alice", (1..=6).map(CardId::new)),
///     PlayerSetup::new("bot", (1..=6).map(CardId::new)),
/// )
/// .with_first_player(PlayerKey::Player1)
/// .without_shuffle();
///
/// let mut duel = Duel::new(&setup, catalog, DuelConfig::default(), Box::new(ScriptedRng::default())).unwrap();
/// let outcome = duel.play_card(0).unwrap();
/// assert!(!outcome.events.is_empty());
/// assert_eq!(duel.state().players.player2.hp, 190);
/// ```
pub struct Duel {
    rules: DuelRules,
    state: DuelState,
}

impl Duel {
    /// Start a duel from a setup payload.
    pub fn new(
        setup: &DuelSetup,
        catalog: Arc<CardCatalog>,
        config: DuelConfig,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        config.validate()?;
        let state = DuelState::from_setup(setup, &config, rng.as_mut());
        Ok(Self {
            rules: DuelRules::new(catalog, config, rng),
            state,
        })
    }

    /// Resume a duel from an existing snapshot.
    ///
    /// Out-of-range HP is clamped and a seat already at 0 HP loses. An
    /// overfull hand or field is rejected.
    pub fn from_state(
        mut state: DuelState,
        catalog: Arc<CardCatalog>,
        config: DuelConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        config.validate()?;
        let rules = DuelRules::new(catalog, config, rng);
        rules.admit(&mut state)?;
        Ok(Self { rules, state })
    }

    #[must_use]
    pub fn state(&self) -> &DuelState {
        &self.state
    }

    /// Snapshot redacted for `viewer`.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerKey) -> DuelState {
        self.state.view_for(viewer)
    }

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        self.rules.catalog()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerKey> {
        self.rules.winner(&self.state)
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerKey {
        self.state.current_player
    }

    #[must_use]
    pub fn legal_actions(&self, player: PlayerKey) -> Vec<DuelAction> {
        self.rules.legal_actions(&self.state, player)
    }

    #[must_use]
    pub fn summary(&self) -> DuelSummary {
        DuelSummary::from_state(&self.state)
    }

    // === Interactive entry points (current player) ===

    pub fn play_card(&mut self, index: usize) -> Result<ActionOutcome, ValidationError> {
        self.interactive(DuelAction::PlayCard { index })
    }

    pub fn discard_card(&mut self, index: usize) -> Result<ActionOutcome, ValidationError> {
        self.interactive(DuelAction::DiscardCard { index })
    }

    pub fn draw_card(&mut self) -> Result<ActionOutcome, ValidationError> {
        self.interactive(DuelAction::DrawCard)
    }

    pub fn end_turn(&mut self) -> Result<ActionOutcome, ValidationError> {
        self.interactive(DuelAction::EndTurn)
    }

    pub fn activate_trap(&mut self, index: usize) -> Result<ActionOutcome, ValidationError> {
        self.interactive(DuelAction::ActivateTrap { index })
    }

    fn interactive(&mut self, action: DuelAction) -> Result<ActionOutcome, ValidationError> {
        let player = self.state.current_player;
        self.apply(ActionOrigin::Interactive, player, action)
    }

    /// Apply a move returned by the remote counterpart.
    pub fn apply_remote(&mut self, mv: RemoteMove) -> Result<ActionOutcome, ValidationError> {
        self.apply(ActionOrigin::Remote, mv.player, mv.action)
    }

    /// Validate, apply and record one action.
    pub fn apply(
        &mut self,
        origin: ActionOrigin,
        player: PlayerKey,
        action: DuelAction,
    ) -> Result<ActionOutcome, ValidationError> {
        if let Some(winner) = self.state.winner {
            return Err(ValidationError::DuelOver { winner });
        }
        if player != self.state.current_player {
            return Err(ValidationError::OutOfTurn {
                expected: self.state.current_player,
                provided: player,
            });
        }

        let config = self.rules.config();
        if origin == ActionOrigin::Interactive
            && action.is_hand_action()
            && player != config.human_player
        {
            if config.reject_non_interactive {
                return Err(ValidationError::NotInteractive { player });
            }
            tracing::debug!(%player, action = action.name(), "ignored non-interactive input");
            return Ok(ActionOutcome::ignored(None));
        }

        let mut next = self.state.clone();
        let events = self.rules.apply_action(&mut next, player, &action)?;

        next.history.push_back(ActionRecord {
            sequence: self.state.history.len() as u32,
            turn: self.state.turn,
            player,
            action,
            origin,
        });
        self.state = next;

        tracing::info!(
            %player,
            ?origin,
            events = events.len(),
            turn = self.state.turn,
            "action applied"
        );
        Ok(ActionOutcome {
            events,
            winner: self.state.winner,
            ignored: false,
        })
    }
}
