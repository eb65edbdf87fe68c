//! Turn controller.
//!
//! ```text
//! AwaitingAction(active) --endTurn--> TurnTransition --> AwaitingAction(other)
//!                                            |
//!                          other has skipNextTurn: clear, tick,
//!                          active starts a fresh turn instead
//! ```
//!
//! Start of turn, in order: turn counter, draw phase (one guaranteed draw
//! plus `extraDrawPerTurn`, all cancelled by `skipNextDraw`), buff tick,
//! then upkeep effects of the player's field cards. Hand locks wear off at
//! the end of their owner's turn instead.

use serde::{Deserialize, Serialize};

use crate::buffs::{BuffStore, ModifierKey};
use crate::core::player::PlayerKey;
use crate::core::state::DuelState;
use crate::effects::{EffectResolver, ResolverContext};
use crate::triggers::DuelEvent;
use crate::zones::{Zone, ZoneManager};

/// Where the duel is in the turn cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    /// The current player may act.
    #[default]
    AwaitingAction,
    /// Control is passing between players.
    TurnTransition,
    /// A winner is set; no further actions.
    Over,
}

/// Drives turn transitions.
pub struct TurnController;

impl TurnController {
    /// End the current player's turn and start the next one.
    pub fn end_turn(state: &mut DuelState, ctx: &mut ResolverContext<'_>) {
        let ending = state.current_player;
        let next = ending.opponent();
        state.phase = TurnPhase::TurnTransition;
        BuffStore::tick_end(state, ending);

        if BuffStore::consume_one_shot(state, next, ModifierKey::SkipNextTurn) {
            BuffStore::tick(state, next);
            BuffStore::tick_end(state, next);
            tracing::info!(skipped = %next, "turn skipped");
            ctx.events.push(DuelEvent::TurnSkipped { player: next });
            Self::start_turn(state, ctx, ending);
        } else {
            Self::start_turn(state, ctx, next);
        }
    }

    /// Hand control to `player` and run their start-of-turn sequence.
    pub fn start_turn(state: &mut DuelState, ctx: &mut ResolverContext<'_>, player: PlayerKey) {
        state.current_player = player;
        state.turn += 1;
        ctx.events.push(DuelEvent::TurnStarted {
            player,
            turn: state.turn,
        });

        Self::draw_phase(state, ctx, player);
        BuffStore::tick(state, player);
        EffectResolver::resolve_upkeep(state, ctx, player);

        state.phase = TurnPhase::AwaitingAction;
    }

    /// Draw phase. Returns the number of cards drawn.
    pub fn draw_phase(state: &mut DuelState, ctx: &mut ResolverContext<'_>, player: PlayerKey) -> u32 {
        if BuffStore::consume_one_shot(state, player, ModifierKey::SkipNextDraw) {
            ctx.events.push(DuelEvent::DrawSkipped { player });
            return 0;
        }

        let attempts = BuffStore::get(state, player).extra_draw_per_turn.saturating_add(1);
        let mut drawn = 0;
        for _ in 0..attempts {
            match ZoneManager::draw(state, ctx.config, player) {
                Ok(card) => {
                    drawn += 1;
                    state.stats[player].cards_drawn += 1;
                    ctx.events.push(DuelEvent::Draw {
                        player,
                        card_id: card.card_id,
                        from: Zone::Deck,
                    });
                }
                Err(reason) => ctx.events.push(DuelEvent::DrawFailed { player, reason }),
            }
        }
        drawn
    }
}
