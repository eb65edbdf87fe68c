//! Rules engine for the card duel.
//!
//! `RulesEngine` defines:
//! - Which actions are legal for a player
//! - How an action modifies the duel state
//! - Who has won
//!
//! `DuelRules` is the standard implementation. It owns the catalog, the
//! config and the injected random source; the state it works on is always
//! passed in by the caller.

use std::sync::Arc;

use crate::cards::{CardCatalog, CardId, CardType};
use crate::core::action::DuelAction;
use crate::core::config::DuelConfig;
use crate::core::error::{ValidationError, ZoneError};
use crate::core::player::PlayerKey;
use crate::core::rng::RandomSource;
use crate::core::state::DuelState;
use crate::effects::{EffectResolver, ResolverContext};
use crate::triggers::{DuelEvent, EventLog};
use crate::zones::{CardSelector, Zone, ZoneManager, ZoneRef};

use super::hp::clamp_hp;
use super::turn::{TurnController, TurnPhase};

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty when the player cannot act
/// - `apply_action`: must leave the state untouched when it returns an error
/// - `winner`: `None` while the duel continues
pub trait RulesEngine {
    /// Get the duel configuration.
    fn config(&self) -> &DuelConfig;

    /// Enumerate every action `player` may take right now.
    fn legal_actions(&self, state: &DuelState, player: PlayerKey) -> Vec<DuelAction>;

    /// Apply an action for `player`, returning the events it produced.
    fn apply_action(
        &mut self,
        state: &mut DuelState,
        player: PlayerKey,
        action: &DuelAction,
    ) -> Result<Vec<DuelEvent>, ValidationError>;

    /// The winner, once the duel is over.
    fn winner(&self, state: &DuelState) -> Option<PlayerKey> {
        state.winner
    }

    // === Convenience Methods ===

    /// Check whether a single action is currently legal.
    fn is_legal(&self, state: &DuelState, player: PlayerKey, action: &DuelAction) -> bool {
        self.legal_actions(state, player).contains(action)
    }
}

/// Standard duel rules.
pub struct DuelRules {
    catalog: Arc<CardCatalog>,
    config: DuelConfig,
    rng: Box<dyn RandomSource>,
}

impl DuelRules {
    pub fn new(catalog: Arc<CardCatalog>, config: DuelConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            catalog,
            config,
            rng,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Mutable access to the random source, e.g. for dealing a new duel.
    pub fn rng_mut(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Bring an ingested snapshot in line with the config.
    ///
    /// HP is clamped into `[0, max_hp]`, an overfull hand or field is
    /// rejected, and a seat already at 0 HP ends the duel with the current
    /// player treated as the actor.
    pub fn admit(&self, state: &mut DuelState) -> Result<Vec<DuelEvent>, ValidationError> {
        for key in PlayerKey::ALL {
            let seat = &state.players[key];
            for (zone, len, capacity) in [
                (Zone::Hand, seat.hand.len(), self.config.hand_capacity),
                (Zone::Field, seat.field.len(), self.config.field_capacity),
            ] {
                if len > capacity {
                    return Err(ZoneError::CapacityExceeded {
                        zone: ZoneRef::player(key, zone),
                        capacity,
                    }
                    .into());
                }
            }
        }

        for key in PlayerKey::ALL {
            let change = clamp_hp(state, &self.config, key);
            if change.applied() != 0 {
                tracing::warn!(
                    player = %key,
                    before = change.before,
                    after = change.after,
                    "snapshot hp clamped"
                );
            }
        }

        let mut events = EventLog::new();
        if state.winner.is_some() {
            state.phase = TurnPhase::Over;
        } else {
            let actor = state.current_player;
            Self::settle(state, actor, &mut events);
        }
        Ok(events.into_vec())
    }

    fn check_turn(state: &DuelState, player: PlayerKey) -> Result<(), ValidationError> {
        if let Some(winner) = state.winner {
            return Err(ValidationError::DuelOver { winner });
        }
        if state.current_player != player {
            return Err(ValidationError::OutOfTurn {
                expected: state.current_player,
                provided: player,
            });
        }
        Ok(())
    }

    fn check_hand_lock(state: &DuelState, player: PlayerKey) -> Result<(), ValidationError> {
        let turns = state.players[player].buffs.hand_lock_turns;
        if turns > 0 {
            return Err(ValidationError::HandLocked { player, turns });
        }
        Ok(())
    }

    fn is_set_trap(&self, state: &DuelState, player: PlayerKey, index: usize) -> bool {
        state.players[player]
            .field
            .get(index)
            .is_some_and(|c| c.face_down && self.catalog.card_type(&c.card_id) == Some(CardType::Trap))
    }

    fn play_card(
        &mut self,
        state: &mut DuelState,
        player: PlayerKey,
        index: usize,
        events: &mut EventLog,
    ) -> Result<(), ValidationError> {
        Self::check_hand_lock(state, player)?;

        let field = ZoneRef::player(player, Zone::Field);
        let card = ZoneManager::move_card(
            state,
            &self.config,
            ZoneRef::player(player, Zone::Hand),
            field,
            &CardSelector::Index(index),
        )?;
        let slot = state.players[player].field.len() - 1;
        state.stats[player].cards_played += 1;

        let catalog = Arc::clone(&self.catalog);
        let plan = catalog.plan(&card.card_id);
        let is_trap = catalog.card_type(&card.card_id) == Some(CardType::Trap);
        let mut ctx = ResolverContext::new(&catalog, &self.config, self.rng.as_mut(), events);

        if is_trap {
            if plan.is_some_and(|p| p.auto_trigger) {
                tracing::info!(%player, card = %card.card_id, "trap triggered on play");
                Self::spring_trap(state, &mut ctx, player, slot, &card.card_id);
            } else {
                if let Some(placed) = state.players[player].field.get_mut(slot) {
                    placed.face_down = true;
                }
                tracing::info!(%player, "trap set");
                ctx.events.push(DuelEvent::TrapSet { player });
            }
            return Ok(());
        }

        tracing::info!(%player, card = %card.card_id, "card played");
        ctx.events.push(DuelEvent::CardPlayed {
            player,
            card_id: card.card_id.clone(),
        });
        let resolution = EffectResolver::resolve(state, &mut ctx, player, &card.card_id);
        if resolution.discard_after_use {
            Self::retire(state, &mut ctx, player, slot, &card.card_id);
            ctx.events.push(DuelEvent::CardDiscardedAfterUse {
                player,
                card_id: card.card_id,
            });
        }
        Ok(())
    }

    /// Resolve the trap at `slot` and send it to the discard pile.
    fn spring_trap(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        player: PlayerKey,
        slot: usize,
        card_id: &CardId,
    ) {
        if let Some(trap) = state.players[player].field.get_mut(slot) {
            trap.face_down = false;
        }
        state.stats[player].traps_triggered += 1;
        ctx.events.push(DuelEvent::TrapTriggered {
            player,
            card_id: card_id.clone(),
        });
        EffectResolver::resolve(state, ctx, player, card_id);
        Self::retire(state, ctx, player, slot, card_id);
    }

    /// Move a just-resolved card from the field to the discard pile.
    ///
    /// Resolution only appends to the actor's field, so `slot` still points
    /// at the card unless something unexpected moved it.
    fn retire(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        player: PlayerKey,
        slot: usize,
        card_id: &CardId,
    ) {
        let still_there = state.players[player]
            .field
            .get(slot)
            .is_some_and(|c| &c.card_id == card_id);
        let selector = if still_there {
            CardSelector::Index(slot)
        } else {
            CardSelector::Id(card_id.clone())
        };
        if let Err(err) = ZoneManager::move_card(
            state,
            ctx.config,
            ZoneRef::player(player, Zone::Field),
            ZoneRef::player(player, Zone::Discard),
            &selector,
        ) {
            tracing::warn!(%err, card = %card_id, "played card already left the field");
        }
    }

    fn discard_card(
        &self,
        state: &mut DuelState,
        player: PlayerKey,
        index: usize,
        events: &mut EventLog,
    ) -> Result<(), ValidationError> {
        Self::check_hand_lock(state, player)?;
        let card = ZoneManager::move_card(
            state,
            &self.config,
            ZoneRef::player(player, Zone::Hand),
            ZoneRef::player(player, Zone::Discard),
            &CardSelector::Index(index),
        )?;
        events.push(DuelEvent::Discard {
            player,
            card_id: card.card_id,
            forced: false,
        });
        Ok(())
    }

    fn draw_card(&self, state: &mut DuelState, player: PlayerKey, events: &mut EventLog) {
        match ZoneManager::draw(state, &self.config, player) {
            Ok(card) => {
                state.stats[player].cards_drawn += 1;
                events.push(DuelEvent::Draw {
                    player,
                    card_id: card.card_id,
                    from: Zone::Deck,
                });
            }
            Err(reason) => events.push(DuelEvent::DrawFailed { player, reason }),
        }
    }

    fn activate_trap(
        &mut self,
        state: &mut DuelState,
        player: PlayerKey,
        index: usize,
        events: &mut EventLog,
    ) -> Result<(), ValidationError> {
        if !self.is_set_trap(state, player, index) {
            return Err(ValidationError::NotATrap { index });
        }
        let card_id = state.players[player].field[index].card_id.clone();

        let catalog = Arc::clone(&self.catalog);
        let mut ctx = ResolverContext::new(&catalog, &self.config, self.rng.as_mut(), events);
        tracing::info!(%player, card = %card_id, "trap activated");
        Self::spring_trap(state, &mut ctx, player, index, &card_id);
        Ok(())
    }

    /// Set the winner once an action has fully settled.
    ///
    /// The opponent reaching 0 HP wins for the actor even if the actor also
    /// dropped to 0 in the same action.
    fn settle(state: &mut DuelState, actor: PlayerKey, events: &mut EventLog) {
        let opponent = actor.opponent();
        let winner = if state.players[opponent].hp <= 0 {
            actor
        } else if state.players[actor].hp <= 0 {
            opponent
        } else {
            return;
        };
        state.winner = Some(winner);
        state.phase = TurnPhase::Over;
        tracing::info!(%winner, turn = state.turn, "duel over");
        events.push(DuelEvent::GameOver { winner });
    }
}

impl RulesEngine for DuelRules {
    fn config(&self) -> &DuelConfig {
        &self.config
    }

    fn legal_actions(&self, state: &DuelState, player: PlayerKey) -> Vec<DuelAction> {
        if Self::check_turn(state, player).is_err() {
            return Vec::new();
        }
        let seat = &state.players[player];
        let mut actions = vec![DuelAction::DrawCard, DuelAction::EndTurn];

        if !seat.buffs.is_hand_locked() {
            let field_open = seat.field.len() < self.config.field_capacity;
            for index in 0..seat.hand.len() {
                if field_open {
                    actions.push(DuelAction::PlayCard { index });
                }
                actions.push(DuelAction::DiscardCard { index });
            }
        }

        for index in 0..seat.field.len() {
            if self.is_set_trap(state, player, index) {
                actions.push(DuelAction::ActivateTrap { index });
            }
        }
        actions
    }

    fn apply_action(
        &mut self,
        state: &mut DuelState,
        player: PlayerKey,
        action: &DuelAction,
    ) -> Result<Vec<DuelEvent>, ValidationError> {
        Self::check_turn(state, player)?;
        tracing::debug!(%player, action = action.name(), turn = state.turn, "applying action");

        let mut events = EventLog::new();
        match action {
            DuelAction::PlayCard { index } => self.play_card(state, player, *index, &mut events)?,
            DuelAction::DiscardCard { index } => {
                self.discard_card(state, player, *index, &mut events)?;
            }
            DuelAction::DrawCard => self.draw_card(state, player, &mut events),
            DuelAction::EndTurn => {
                let catalog = Arc::clone(&self.catalog);
                let mut ctx =
                    ResolverContext::new(&catalog, &self.config, self.rng.as_mut(), &mut events);
                TurnController::end_turn(state, &mut ctx);
            }
            DuelAction::ActivateTrap { index } => {
                self.activate_trap(state, player, *index, &mut events)?;
            }
        }

        Self::settle(state, player, &mut events);
        Ok(events.into_vec())
    }
}
