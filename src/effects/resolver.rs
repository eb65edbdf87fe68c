//! Effect resolution - applying compiled plans to duel state.
//!
//! The `EffectResolver` applies a card's primitives against
//! `(actor, opponent)`. It never fails: unknown cards resolve as no-ops,
//! empty zones and full hands make the affected primitive a no-op.

use crate::buffs::{BuffStore, DamageOverTime, ModifierPatch};
use crate::cards::{CardCatalog, CardDefinition, CardId, CardType};
use crate::core::config::DuelConfig;
use crate::core::player::PlayerKey;
use crate::core::rng::RandomSource;
use crate::core::state::DuelState;
use crate::rules::hp::change_hp;
use crate::triggers::{DuelEvent, EventLog};
use crate::zones::{CardSelector, Zone, ZoneManager, ZoneRef};

use super::effect::{EffectPrimitive, FieldMutation, PersistentBuff, SkipKind};
use super::targeting::{CardFilter, Selection};

/// Everything resolution needs besides the state itself.
pub struct ResolverContext<'a> {
    pub catalog: &'a CardCatalog,
    pub config: &'a DuelConfig,
    pub rng: &'a mut dyn RandomSource,
    pub events: &'a mut EventLog,
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        catalog: &'a CardCatalog,
        config: &'a DuelConfig,
        rng: &'a mut dyn RandomSource,
        events: &'a mut EventLog,
    ) -> Self {
        Self {
            catalog,
            config,
            rng,
            events,
        }
    }
}

/// What resolving a card's plan did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The card id was in the catalog.
    pub known: bool,
    /// Primitives applied.
    pub applied: usize,
    /// The card should leave the field now.
    pub discard_after_use: bool,
}

/// Resolves effects on duel state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve the on-play plan of `card_id` for `actor`.
    pub fn resolve(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        actor: PlayerKey,
        card_id: &CardId,
    ) -> Resolution {
        let catalog = ctx.catalog;
        let (card, plan) = match catalog.entry(card_id) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "resolved as no-op");
                ctx.events.push(DuelEvent::UnknownCard { card_id: err.0 });
                return Resolution::default();
            }
        };

        for primitive in &plan.primitives {
            Self::apply(state, ctx, actor, card, primitive);
        }
        Resolution {
            known: true,
            applied: plan.primitives.len(),
            discard_after_use: plan.discard_after_use,
        }
    }

    /// Resolve the upkeep plans of every face-up card on `player`'s field.
    pub fn resolve_upkeep(state: &mut DuelState, ctx: &mut ResolverContext<'_>, player: PlayerKey) {
        let catalog = ctx.catalog;
        let permanents: Vec<CardId> = state.players[player]
            .field
            .iter()
            .filter(|c| !c.face_down)
            .map(|c| c.card_id.clone())
            .collect();

        for id in permanents {
            let Ok((card, plan)) = catalog.entry(&id) else {
                continue;
            };
            if !plan.has_upkeep() {
                continue;
            }
            for primitive in &plan.upkeep {
                tracing::debug!(card = %id, %player, "upkeep");
                Self::apply(state, ctx, player, card, primitive);
            }
        }
    }

    /// Apply a single primitive.
    pub fn apply(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        actor: PlayerKey,
        card: &CardDefinition,
        primitive: &EffectPrimitive,
    ) {
        let opponent = actor.opponent();
        tracing::debug!(card = %card.id, %actor, primitive = primitive.name(), "applying");

        match primitive {
            EffectPrimitive::Damage { amount } => {
                Self::damage_foe(state, ctx, actor, opponent, card, *amount);
            }

            EffectPrimitive::AreaDamage { amount } => {
                Self::damage_foe(state, ctx, actor, opponent, card, *amount);
                Self::damage_foe(state, ctx, actor, actor, card, *amount);
            }

            EffectPrimitive::DamageOverTime { amount, turns } => {
                Self::damage_foe(state, ctx, actor, opponent, card, *amount);
                let patch = ModifierPatch::new().dot(Some(DamageOverTime {
                    amount: *amount,
                    turns_remaining: *turns,
                }));
                Self::patch(state, ctx, opponent, patch);
            }

            EffectPrimitive::Heal { amount } => Self::heal(state, ctx, actor, *amount),

            EffectPrimitive::Drain { amount } => {
                let dealt = Self::damage_foe(state, ctx, actor, opponent, card, *amount);
                if dealt > 0 {
                    Self::heal(state, ctx, actor, dealt);
                }
            }

            EffectPrimitive::Draw { count, filter } => {
                for _ in 0..*count {
                    if !Self::draw(state, ctx, actor, filter) {
                        break;
                    }
                }
            }

            EffectPrimitive::LootDraw { count } => {
                for _ in 0..*count {
                    match ZoneManager::take_from_loot(state, ctx.config, actor) {
                        Ok(card) => {
                            state.stats[actor].cards_drawn += 1;
                            ctx.events.push(DuelEvent::Draw {
                                player: actor,
                                card_id: card.card_id,
                                from: Zone::Loot,
                            });
                        }
                        Err(reason) => {
                            ctx.events.push(DuelEvent::DrawFailed {
                                player: actor,
                                reason,
                            });
                            break;
                        }
                    }
                }
            }

            EffectPrimitive::Discard {
                side,
                count,
                filter,
            } => {
                let target = side.resolve(actor);
                for _ in 0..*count {
                    if !Self::random_discard(state, ctx, target, filter) {
                        break;
                    }
                }
            }

            EffectPrimitive::Steal { count, filter } => {
                for _ in 0..*count {
                    if !Self::steal(state, ctx, actor, filter) {
                        break;
                    }
                }
            }

            EffectPrimitive::SpawnCompanion => Self::spawn_companion(state, ctx, actor),

            EffectPrimitive::Field(mutation) => Self::mutate_field(state, ctx, opponent, *mutation),

            EffectPrimitive::SkipFlag { side, kind } => {
                let patch = match kind {
                    SkipKind::Turn => ModifierPatch::new().skip_next_turn(true),
                    SkipKind::Draw => ModifierPatch::new().skip_next_draw(true),
                };
                Self::patch(state, ctx, side.resolve(actor), patch);
            }

            EffectPrimitive::HealBlock { turns } => {
                Self::patch(state, ctx, opponent, ModifierPatch::new().block_heal_turns(*turns));
            }

            EffectPrimitive::HandLock { turns } => {
                Self::patch(state, ctx, opponent, ModifierPatch::new().hand_lock_turns(*turns));
            }

            EffectPrimitive::BuffGrant {
                bonus,
                mult,
                restrict_tags,
            } => {
                let mut patch = ModifierPatch::new().attack_restrict_tags(restrict_tags.clone());
                if *bonus != 0 {
                    patch = patch.next_attack_bonus(*bonus);
                }
                if *mult != 1.0 {
                    patch = patch.next_attack_mult(*mult);
                }
                Self::patch(state, ctx, actor, patch);
            }

            EffectPrimitive::PersistentBuff(buff) => {
                let bag = BuffStore::get(state, actor);
                let patch = match buff {
                    PersistentBuff::ExtraDrawPerTurn(n) => ModifierPatch::new()
                        .extra_draw_per_turn(bag.extra_draw_per_turn.saturating_add(*n)),
                    PersistentBuff::GunFlatBonus(n) => ModifierPatch::new()
                        .gun_flat_bonus(bag.gun_flat_bonus.saturating_add(*n)),
                };
                Self::patch(state, ctx, actor, patch);
            }
        }
    }

    /// Deal `base` damage from `actor` to `target` on behalf of `card`.
    ///
    /// Reads and clears the actor's one-shot attack modifiers, applies them
    /// if their tag restriction admits the card, then adds the persistent
    /// gun bonus for `gun` cards. Returns the HP actually removed.
    pub fn damage_foe(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        actor: PlayerKey,
        target: PlayerKey,
        card: &CardDefinition,
        base: i64,
    ) -> i64 {
        let modifiers = BuffStore::take_attack_modifiers(state, actor);
        let mut amount = modifiers.apply(base, Some(card));
        if card.has_tag("gun") {
            amount = amount.saturating_add(BuffStore::get(state, actor).gun_flat_bonus);
        }
        let amount = amount.max(0);

        let dealt = -change_hp(state, ctx.config, target, -amount).applied();
        state.stats[actor].damage_dealt += dealt;
        ctx.events.push(DuelEvent::Damage {
            source: actor,
            target,
            amount: dealt,
            card_id: card.id.clone(),
        });
        dealt
    }

    fn heal(state: &mut DuelState, ctx: &mut ResolverContext<'_>, player: PlayerKey, amount: i64) {
        let change = change_hp(state, ctx.config, player, amount);
        if change.blocked {
            ctx.events.push(DuelEvent::HealBlocked { player, amount });
            return;
        }
        state.stats[player].healing_done += change.applied();
        ctx.events.push(DuelEvent::Heal {
            player,
            amount: change.applied(),
        });
    }

    fn patch(state: &mut DuelState, ctx: &mut ResolverContext<'_>, player: PlayerKey, patch: ModifierPatch) {
        for buff in BuffStore::apply(state, player, patch) {
            ctx.events.push(DuelEvent::BuffApplied { player, buff });
        }
    }

    fn draw(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        player: PlayerKey,
        filter: &CardFilter,
    ) -> bool {
        let catalog = ctx.catalog;
        let result = ZoneManager::draw_matching(state, ctx.config, player, |c| {
            filter.matches_instance(catalog, c)
        });
        match result {
            Ok(card) => {
                state.stats[player].cards_drawn += 1;
                ctx.events.push(DuelEvent::Draw {
                    player,
                    card_id: card.card_id,
                    from: Zone::Deck,
                });
                true
            }
            Err(reason) => {
                ctx.events.push(DuelEvent::DrawFailed { player, reason });
                false
            }
        }
    }

    fn random_discard(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        player: PlayerKey,
        filter: &CardFilter,
    ) -> bool {
        let catalog = ctx.catalog;
        let hand = ZoneRef::player(player, Zone::Hand);
        let candidates = ZoneManager::positions(state, hand, |c| filter.matches_instance(catalog, c))
            .unwrap_or_default();
        let Some(index) = Selection::Random.pick(&candidates, ctx.rng) else {
            return false;
        };

        match ZoneManager::move_card(
            state,
            ctx.config,
            hand,
            ZoneRef::player(player, Zone::Discard),
            &CardSelector::Index(index),
        ) {
            Ok(card) => {
                ctx.events.push(DuelEvent::Discard {
                    player,
                    card_id: card.card_id,
                    forced: true,
                });
                true
            }
            Err(_) => false,
        }
    }

    fn steal(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        actor: PlayerKey,
        filter: &CardFilter,
    ) -> bool {
        let catalog = ctx.catalog;
        let victim = actor.opponent();
        let from = ZoneRef::player(victim, Zone::Hand);
        let candidates = ZoneManager::positions(state, from, |c| filter.matches_instance(catalog, c))
            .unwrap_or_default();
        let Some(index) = Selection::Random.pick(&candidates, ctx.rng) else {
            return false;
        };

        // Capacity of the actor's hand is enforced by the move itself.
        match ZoneManager::move_card(
            state,
            ctx.config,
            from,
            ZoneRef::player(actor, Zone::Hand),
            &CardSelector::Index(index),
        ) {
            Ok(card) => {
                ctx.events.push(DuelEvent::Steal {
                    from: victim,
                    to: actor,
                    card_id: card.card_id,
                });
                true
            }
            Err(err) => {
                tracing::debug!(%err, "steal skipped");
                false
            }
        }
    }

    fn spawn_companion(state: &mut DuelState, ctx: &mut ResolverContext<'_>, actor: PlayerKey) {
        let catalog = ctx.catalog;
        let Some(index) = state.players[actor]
            .deck
            .iter()
            .position(|c| catalog.card_type(&c.card_id) == Some(CardType::Infected))
        else {
            return;
        };

        match ZoneManager::move_card(
            state,
            ctx.config,
            ZoneRef::player(actor, Zone::Deck),
            ZoneRef::player(actor, Zone::Field),
            &CardSelector::Index(index),
        ) {
            Ok(card) => ctx.events.push(DuelEvent::CompanionSpawned {
                player: actor,
                card_id: card.card_id,
            }),
            Err(err) => tracing::debug!(%err, "companion spawn skipped"),
        }
    }

    fn mutate_field(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        owner: PlayerKey,
        mutation: FieldMutation,
    ) {
        let catalog = ctx.catalog;
        let field = ZoneRef::player(owner, Zone::Field);
        let face_down = ZoneManager::positions(state, field, |c| c.face_down).unwrap_or_default();

        match mutation {
            FieldMutation::Destroy(selection) => {
                let all = ZoneManager::positions(state, field, |_| true).unwrap_or_default();
                if let Some(index) = selection.pick(&all, ctx.rng) {
                    Self::to_discard(state, ctx, owner, index, |owner, card_id| {
                        DuelEvent::CardDestroyed { owner, card_id }
                    });
                }
            }

            FieldMutation::DestroyInfected => {
                let infected = ZoneManager::positions(state, field, |c| {
                    catalog.card_type(&c.card_id) == Some(CardType::Infected)
                })
                .unwrap_or_default();
                if let Some(index) = Selection::First.pick(&infected, ctx.rng) {
                    Self::to_discard(state, ctx, owner, index, |owner, card_id| {
                        DuelEvent::CardDestroyed { owner, card_id }
                    });
                }
            }

            FieldMutation::DisarmTrap => {
                if let Some(index) = Selection::Random.pick(&face_down, ctx.rng) {
                    Self::to_discard(state, ctx, owner, index, |owner, card_id| {
                        DuelEvent::TrapDisarmed { owner, card_id }
                    });
                }
            }

            FieldMutation::RevealTrap => {
                if let Some(index) = Selection::Random.pick(&face_down, ctx.rng) {
                    if let Some(card) = state.players[owner].field.get_mut(index) {
                        card.face_down = false;
                        ctx.events.push(DuelEvent::TrapRevealed {
                            owner,
                            card_id: card.card_id.clone(),
                        });
                    }
                }
            }
        }
    }

    fn to_discard(
        state: &mut DuelState,
        ctx: &mut ResolverContext<'_>,
        owner: PlayerKey,
        index: usize,
        event: impl FnOnce(PlayerKey, CardId) -> DuelEvent,
    ) {
        match ZoneManager::move_card(
            state,
            ctx.config,
            ZoneRef::player(owner, Zone::Field),
            ZoneRef::player(owner, Zone::Discard),
            &CardSelector::Index(index),
        ) {
            Ok(card) => ctx.events.push(event(owner, card.card_id)),
            Err(err) => tracing::debug!(%err, "field card not removed"),
        }
    }
}
