//! Pattern table compiling effect text into an `EffectPlan`.
//!
//! Patterns are tried in a fixed order and are not exclusive: each one
//! scans the whole text and contributes zero or more primitives. The order
//! of the table is the order primitives resolve in.

use std::collections::BTreeSet;

use super::effect::{EffectPlan, EffectPrimitive, FieldMutation, PersistentBuff, Primitives, SkipKind};
use super::targeting::{CardFilter, Selection, Side};
use super::text::{
    bonus, count, is_card_word, is_turn_word, multiplier, plain_number, repeat_notation,
    split_upkeep, Clause, EffectText, DAMAGE_WORDS,
};
use crate::cards::{CardDefinition, CardType};
use crate::triggers::{DiscardPolicy, TrapTrigger};

type Build = fn(&EffectText, &mut Primitives);

struct Pattern {
    name: &'static str,
    /// Only evaluated for cards of this type.
    only: Option<CardType>,
    build: Build,
}

impl Pattern {
    const fn general(name: &'static str, build: Build) -> Self {
        Self {
            name,
            only: None,
            build,
        }
    }
}

const PATTERNS: &[Pattern] = &[
    Pattern::general("damage", damage),
    Pattern::general("area-damage", area_damage),
    Pattern::general("damage-over-time", damage_over_time),
    Pattern::general("heal", heal),
    Pattern::general("draw", draw),
    Pattern::general("discard", discard),
    Pattern::general("steal", steal),
    Pattern::general("skip", skip),
    Pattern::general("heal-block", heal_block),
    Pattern::general("field", field),
    Pattern::general("attack-buff", attack_buff),
    Pattern::general("gun-bonus", gun_bonus),
    Pattern {
        name: "infected",
        only: Some(CardType::Infected),
        build: infected,
    },
];

/// Patterns allowed in start-of-turn text.
const UPKEEP_PATTERNS: &[Pattern] = &[
    Pattern::general("heal", heal),
    Pattern::general("draw", draw),
];

fn run(patterns: &[Pattern], card: &CardDefinition, text: &EffectText) -> Primitives {
    let mut out = Primitives::new();
    for pattern in patterns {
        if pattern.only.is_some_and(|t| t != card.card_type) {
            continue;
        }
        let before = out.len();
        (pattern.build)(text, &mut out);
        if out.len() > before {
            tracing::trace!(card = %card.id, pattern = pattern.name, "pattern matched");
        }
    }
    out
}

impl EffectPlan {
    /// Compile a card definition.
    ///
    /// ```
    /// use card_duel::cards::{CardDefinition, CardId, CardType};
    /// use card_duel::effects::{EffectPlan, EffectPrimitive};
    ///
    /// let card = CardDefinition::new(CardId::new(2), "Shotgun", CardType::Attack)
    ///     .with_text("Deal 8x2 dmg.");
    /// let plan = EffectPlan::compile(&card);
    /// assert_eq!(plan.primitives.as_slice(), &[EffectPrimitive::Damage { amount: 16 }]);
    /// ```
    #[must_use]
    pub fn compile(card: &CardDefinition) -> Self {
        let (immediate, upkeep) = split_upkeep(&card.effect_text);
        let primitives = run(PATTERNS, card, &EffectText::new(&immediate));
        let upkeep = upkeep
            .map(|text| run(UPKEEP_PATTERNS, card, &EffectText::new(&text)))
            .unwrap_or_default();

        Self {
            primitives,
            upkeep,
            auto_trigger: TrapTrigger::is_automatic(card),
            discard_after_use: DiscardPolicy::discards_after_use(card),
        }
    }
}

// === Damage ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Single,
    Both,
    OverTurns(u32),
}

#[derive(Clone, Copy, Debug)]
struct DamagePhrase {
    amount: i64,
    repeated: bool,
    infection: bool,
    scope: Scope,
}

fn hits_both(after: &[String]) -> bool {
    after.iter().any(|w| w == "everyone")
        || after.windows(2).any(|w| {
            matches!(
                (w[0].as_str(), w[1].as_str()),
                ("both", "players" | "sides") | ("all", "players") | ("each", "player")
            )
        })
}

/// Whether word `i` sits inside a "next ... attack ..." buff phrase.
fn in_attack_buff(clause: &Clause, i: usize) -> bool {
    let before = &clause.words[..i];
    before.iter().rposition(|w| w == "next").is_some_and(|next| {
        before[next + 1..]
            .iter()
            .any(|w| w == "attack" || w == "attacks")
    })
}

fn damage_phrases(clause: &Clause) -> Vec<DamagePhrase> {
    let mut phrases = Vec::new();
    for (i, word) in clause.words.iter().enumerate() {
        // Attack buffs talk about damage without dealing any.
        if !DAMAGE_WORDS.contains(&word.as_str()) || in_attack_buff(clause, i) {
            continue;
        }
        let mut j = i;
        let infection = j > 0 && clause.word(j - 1) == Some("infection");
        if infection {
            j -= 1;
        }
        let Some(prev) = j.checked_sub(1).and_then(|k| clause.word(k)) else {
            continue;
        };

        let spaced_repeat = (j >= 3 && matches!(clause.word(j - 2), Some("x" | "×")))
            .then(|| Some((plain_number(clause.word(j - 3)?)?, plain_number(prev)?)))
            .flatten();
        let (amount, repeated) = if let Some((n, m)) = repeat_notation(prev).or(spaced_repeat) {
            (n.saturating_mul(m), true)
        } else if let Some(n) = plain_number(prev) {
            (n, false)
        } else {
            continue;
        };

        let after = &clause.words[i + 1..];
        let scope = match after {
            [over, m, unit, ..] if over == "over" && is_turn_word(unit) => match count(m) {
                Some(turns) => Scope::OverTurns(turns),
                None => continue,
            },
            _ if hits_both(after) => Scope::Both,
            _ => Scope::Single,
        };

        phrases.push(DamagePhrase {
            amount,
            repeated,
            infection,
            scope,
        });
    }
    phrases
}

fn all_damage_phrases(text: &EffectText) -> Vec<DamagePhrase> {
    text.iter().flat_map(damage_phrases).collect()
}

/// "deal NxM dmg" wins over "deal N dmg"; only one fires.
fn damage(text: &EffectText, out: &mut Primitives) {
    let single: Vec<_> = all_damage_phrases(text)
        .into_iter()
        .filter(|p| p.scope == Scope::Single && !p.infection)
        .collect();
    let chosen = single
        .iter()
        .find(|p| p.repeated)
        .or_else(|| single.iter().find(|p| !p.repeated));
    if let Some(phrase) = chosen {
        out.push(EffectPrimitive::Damage {
            amount: phrase.amount,
        });
    }
}

fn area_damage(text: &EffectText, out: &mut Primitives) {
    if let Some(phrase) = all_damage_phrases(text)
        .into_iter()
        .find(|p| p.scope == Scope::Both && !p.infection)
    {
        out.push(EffectPrimitive::AreaDamage {
            amount: phrase.amount,
        });
    }
}

fn damage_over_time(text: &EffectText, out: &mut Primitives) {
    let found = all_damage_phrases(text).into_iter().find_map(|p| match p.scope {
        Scope::OverTurns(turns) if !p.infection => Some((p.amount, turns)),
        _ => None,
    });
    if let Some((amount, turns)) = found {
        out.push(EffectPrimitive::DamageOverTime { amount, turns });
    }
}

// === Healing ===

const HEAL_VERBS: &[&str] = &[
    "heal", "heals", "restore", "restores", "recover", "recovers", "regain", "regains", "gain",
    "gains",
];

fn is_hp_word(word: Option<&str>) -> bool {
    matches!(word, Some("hp" | "health" | "life"))
}

fn heal(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        if clause.has_any(&["drain", "drains"]) || clause.mentions_opponent() {
            continue;
        }
        let found = clause.words.iter().enumerate().find_map(|(i, w)| {
            if !HEAL_VERBS.contains(&w.as_str()) {
                return None;
            }
            let amount = plain_number(clause.word(i + 1)?)?;
            let needs_unit = matches!(w.as_str(), "gain" | "gains");
            (!needs_unit || is_hp_word(clause.word(i + 2))).then_some(amount)
        });
        if let Some(amount) = found {
            out.push(EffectPrimitive::Heal { amount });
        }
    }
}

// === Card movement ===

/// Parse "<count> [random|extra] [<kind>] card(s)" at `start`.
fn card_phrase(clause: &Clause, start: usize) -> Option<(u32, CardFilter)> {
    let n = count(clause.word(start)?)?;
    let mut j = start + 1;
    if matches!(clause.word(j), Some("random" | "extra" | "more" | "additional")) {
        j += 1;
    }
    let filter = match clause.word(j)? {
        w if is_card_word(w) => return Some((n, CardFilter::Any)),
        w => CardFilter::kind(w),
    };
    clause.word(j + 1).filter(|w| is_card_word(w))?;
    Some((n, filter))
}

fn draw(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        if clause.mentions_opponent() {
            continue;
        }
        let Some(i) = clause.find_any(&["draw", "draws"]) else {
            continue;
        };

        if clause.has_any(&["loot"]) {
            if let Some(n) = clause.word(i + 1).and_then(count) {
                out.push(EffectPrimitive::LootDraw { count: n });
            }
            continue;
        }

        let Some((n, filter)) = card_phrase(clause, i + 1) else {
            continue;
        };
        let extra = clause.has_any(&["extra", "additional", "more"]);
        let per_turn = clause.has_any(&["each", "every", "per"]) && clause.has_any(&["turn"]);
        if extra && per_turn {
            out.push(EffectPrimitive::PersistentBuff(PersistentBuff::ExtraDrawPerTurn(n)));
        } else {
            out.push(EffectPrimitive::Draw { count: n, filter });
        }
    }
}

fn discard(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let Some(i) = clause.find_any(&["discard", "discards"]) else {
            continue;
        };
        if let Some((n, filter)) = card_phrase(clause, i + 1) {
            let side = if clause.mentions_opponent() {
                Side::Opponent
            } else {
                Side::Actor
            };
            out.push(EffectPrimitive::Discard {
                side,
                count: n,
                filter,
            });
        }
    }
}

fn steal(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let Some(i) = clause.find_any(&["steal", "steals"]) else {
            continue;
        };
        if let Some((n, filter)) = card_phrase(clause, i + 1) {
            out.push(EffectPrimitive::Steal { count: n, filter });
        }
    }
}

// === Modifiers ===

fn skip(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let Some(i) = clause.find_any(&["skip", "skips"]) else {
            continue;
        };
        let window = &clause.words[i + 1..clause.len().min(i + 4)];
        let kind = if window.iter().any(|w| is_turn_word(w)) {
            SkipKind::Turn
        } else if window.iter().any(|w| w == "draw" || w == "draws") {
            SkipKind::Draw
        } else {
            continue;
        };
        let side = if clause.mentions_opponent() || !clause.mentions_self() {
            Side::Opponent
        } else {
            Side::Actor
        };
        out.push(EffectPrimitive::SkipFlag { side, kind });
    }
}

fn heal_block(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let healing = clause.has_any(&["heal", "heals", "healing"]);
        let blocking =
            clause.has_any(&["block", "blocks", "prevent", "prevents", "cannot", "can't", "no"]);
        if healing && blocking {
            out.push(EffectPrimitive::HealBlock {
                turns: clause.turns_for().unwrap_or(1),
            });
        }
    }
}

fn field(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let trap = clause.has_any(&["trap", "traps"]);
        let mutation = if clause.has_any(&["destroy", "destroys", "remove", "removes"]) {
            if clause.has_any(&["infected"]) {
                FieldMutation::DestroyInfected
            } else if trap {
                FieldMutation::DisarmTrap
            } else if clause.mentions_opponent() || clause.has_any(&["field"]) {
                if clause.has_any(&["random"]) {
                    FieldMutation::Destroy(Selection::Random)
                } else {
                    FieldMutation::Destroy(Selection::First)
                }
            } else {
                continue;
            }
        } else if clause.has_any(&["disarm", "disarms"]) {
            FieldMutation::DisarmTrap
        } else if trap && clause.has_any(&["reveal", "reveals", "expose", "exposes"]) {
            FieldMutation::RevealTrap
        } else {
            continue;
        };
        out.push(EffectPrimitive::Field(mutation));
    }
}

const BUFF_FILLER: &[&str] = &["your", "the", "a", "card", "cards"];

fn attack_buff(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        let Some(next) = clause.find_any(&["next"]) else {
            continue;
        };
        let Some(attack) = clause.words[next..]
            .iter()
            .position(|w| w == "attack" || w == "attacks")
            .map(|k| next + k)
        else {
            continue;
        };

        let bonus = clause.words.iter().find_map(|w| bonus(w)).unwrap_or(0);
        let mult = clause.words.iter().find_map(|w| multiplier(w)).unwrap_or(1.0);
        if bonus == 0 && mult == 1.0 {
            continue;
        }

        let tags: BTreeSet<String> = clause.words[next + 1..attack]
            .iter()
            .filter(|w| !BUFF_FILLER.contains(&w.as_str()))
            .cloned()
            .collect();
        out.push(EffectPrimitive::BuffGrant {
            bonus,
            mult,
            restrict_tags: (!tags.is_empty()).then_some(tags),
        });
    }
}

fn gun_bonus(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        if !clause.has_any(&["guns", "gun"]) || clause.has_any(&["next"]) {
            continue;
        }
        if let Some(n) = clause.words.iter().find_map(|w| bonus(w)) {
            out.push(EffectPrimitive::PersistentBuff(PersistentBuff::GunFlatBonus(n)));
        }
    }
}

// === Infected ===

fn infected(text: &EffectText, out: &mut Primitives) {
    for clause in text.iter() {
        if let Some(i) = clause.find_any(&["drain", "drains"]) {
            if let Some(amount) = clause.word(i + 1).and_then(plain_number) {
                out.push(EffectPrimitive::Drain { amount });
            }
        }

        for phrase in damage_phrases(clause).into_iter().filter(|p| p.infection) {
            out.push(EffectPrimitive::Damage {
                amount: phrase.amount,
            });
        }

        if clause.has_any(&["lock", "locks"]) && clause.has_any(&["hand", "hands"]) {
            out.push(EffectPrimitive::HandLock {
                turns: clause.turns_for().unwrap_or(1),
            });
        }

        if clause.has_any(&["spawn", "spawns", "summon", "summons"]) {
            out.push(EffectPrimitive::SpawnCompanion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn plan(card_type: CardType, text: &str) -> EffectPlan {
        EffectPlan::compile(&CardDefinition::new(CardId::new(1), "Test", card_type).with_text(text))
    }

    fn primitives(card_type: CardType, text: &str) -> Vec<EffectPrimitive> {
        plan(card_type, text).primitives.into_vec()
    }

    #[test]
    fn test_plain_damage() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 10 dmg."),
            vec![EffectPrimitive::Damage { amount: 10 }]
        );
        assert_eq!(
            primitives(CardType::Attack, "Deals 7 damage to the enemy."),
            vec![EffectPrimitive::Damage { amount: 7 }]
        );
    }

    #[test]
    fn test_repeat_damage_wins_over_plain() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 10x2 DMG"),
            vec![EffectPrimitive::Damage { amount: 20 }]
        );
        assert_eq!(
            primitives(CardType::Attack, "Deal 5 dmg. Then deal 4 x 3 dmg."),
            vec![EffectPrimitive::Damage { amount: 12 }]
        );
    }

    #[test]
    fn test_area_damage_only() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 15 dmg to both players."),
            vec![EffectPrimitive::AreaDamage { amount: 15 }]
        );
    }

    #[test]
    fn test_single_and_area_not_exclusive() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 10 dmg. Deal 5 dmg to both players."),
            vec![
                EffectPrimitive::Damage { amount: 10 },
                EffectPrimitive::AreaDamage { amount: 5 },
            ]
        );
    }

    #[test]
    fn test_damage_over_time() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 5 dmg over 3 turns."),
            vec![EffectPrimitive::DamageOverTime { amount: 5, turns: 3 }]
        );
    }

    #[test]
    fn test_heal_variants() {
        assert_eq!(
            primitives(CardType::Tactical, "Restore 20 HP."),
            vec![EffectPrimitive::Heal { amount: 20 }]
        );
        assert_eq!(
            primitives(CardType::Defense, "Gain 5 health."),
            vec![EffectPrimitive::Heal { amount: 5 }]
        );
        assert!(primitives(CardType::Defense, "Gain 5 cards.").is_empty());
    }

    #[test]
    fn test_draw_variants() {
        assert_eq!(
            primitives(CardType::Tactical, "Draw 2 cards."),
            vec![EffectPrimitive::Draw { count: 2, filter: CardFilter::Any }]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Draw 1 trap card."),
            vec![EffectPrimitive::Draw { count: 1, filter: CardFilter::kind("trap") }]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Draw a card."),
            vec![EffectPrimitive::Draw { count: 1, filter: CardFilter::Any }]
        );
        assert_eq!(
            primitives(CardType::Loot, "Draw 1 card from the loot pile."),
            vec![EffectPrimitive::LootDraw { count: 1 }]
        );
        assert_eq!(
            primitives(CardType::Loot, "Draw 1 extra card each turn."),
            vec![EffectPrimitive::PersistentBuff(PersistentBuff::ExtraDrawPerTurn(1))]
        );
    }

    #[test]
    fn test_discard_and_steal() {
        assert_eq!(
            primitives(CardType::Tactical, "Force the opponent to discard 1 attack card."),
            vec![EffectPrimitive::Discard {
                side: Side::Opponent,
                count: 1,
                filter: CardFilter::kind("attack"),
            }]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Steal 1 card from your opponent."),
            vec![EffectPrimitive::Steal { count: 1, filter: CardFilter::Any }]
        );
        assert!(primitives(CardType::Attack, "Discard after use.").is_empty());
        assert!(primitives(CardType::Attack, "Discard this card.").is_empty());
    }

    #[test]
    fn test_skip_direction() {
        assert_eq!(
            primitives(CardType::Trap, "Opponent skips their next turn."),
            vec![EffectPrimitive::SkipFlag { side: Side::Opponent, kind: SkipKind::Turn }]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Skip your next draw."),
            vec![EffectPrimitive::SkipFlag { side: Side::Actor, kind: SkipKind::Draw }]
        );
    }

    #[test]
    fn test_heal_block() {
        assert_eq!(
            primitives(CardType::Tactical, "Block enemy healing for 2 turns."),
            vec![EffectPrimitive::HealBlock { turns: 2 }]
        );
    }

    #[test]
    fn test_field_mutations() {
        assert_eq!(
            primitives(CardType::Tactical, "Destroy 1 random enemy field card."),
            vec![EffectPrimitive::Field(FieldMutation::Destroy(Selection::Random))]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Remove an enemy card from the field."),
            vec![EffectPrimitive::Field(FieldMutation::Destroy(Selection::First))]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Destroy an infected enemy card."),
            vec![EffectPrimitive::Field(FieldMutation::DestroyInfected)]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Disarm a random enemy trap."),
            vec![EffectPrimitive::Field(FieldMutation::DisarmTrap)]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Reveal an enemy trap."),
            vec![EffectPrimitive::Field(FieldMutation::RevealTrap)]
        );
    }

    #[test]
    fn test_attack_buffs() {
        assert_eq!(
            primitives(CardType::Tactical, "Your next attack deals x2 dmg."),
            vec![EffectPrimitive::BuffGrant { bonus: 0, mult: 2.0, restrict_tags: None }]
        );
        assert_eq!(
            primitives(CardType::Tactical, "Your next gun attack deals +10 dmg."),
            vec![EffectPrimitive::BuffGrant {
                bonus: 10,
                mult: 1.0,
                restrict_tags: Some(BTreeSet::from(["gun".to_string()])),
            }]
        );
        assert_eq!(
            primitives(CardType::Loot, "Guns deal +5 dmg for the rest of the duel."),
            vec![EffectPrimitive::PersistentBuff(PersistentBuff::GunFlatBonus(5))]
        );
    }

    #[test]
    fn test_damage_before_attack_buff_in_one_clause() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 10 dmg and your next attack gains +5"),
            vec![
                EffectPrimitive::Damage { amount: 10 },
                EffectPrimitive::BuffGrant { bonus: 5, mult: 1.0, restrict_tags: None },
            ]
        );
    }

    #[test]
    fn test_oversized_repeat_damage_saturates() {
        assert_eq!(
            primitives(CardType::Attack, "Deal 4000000000x4000000000 dmg."),
            vec![EffectPrimitive::Damage { amount: i64::MAX }]
        );
        assert_eq!(
            primitives(CardType::Attack, "Deal 4000000000 x 4000000000 dmg."),
            vec![EffectPrimitive::Damage { amount: i64::MAX }]
        );
    }

    #[test]
    fn test_infected_branch_only_for_infected() {
        let text = "Deal 6 dmg. 4 infection dmg. Lock the opponent's hand for 1 turn.";
        assert_eq!(
            primitives(CardType::Infected, text),
            vec![
                EffectPrimitive::Damage { amount: 6 },
                EffectPrimitive::Damage { amount: 4 },
                EffectPrimitive::HandLock { turns: 1 },
            ]
        );
        assert_eq!(
            primitives(CardType::Attack, text),
            vec![EffectPrimitive::Damage { amount: 6 }]
        );
    }

    #[test]
    fn test_drain_and_spawn() {
        assert_eq!(
            primitives(CardType::Infected, "Drain 8 HP. Spawns a companion."),
            vec![EffectPrimitive::Drain { amount: 8 }, EffectPrimitive::SpawnCompanion]
        );
    }

    #[test]
    fn test_upkeep_split() {
        let plan = plan(CardType::Defense, "At the start of your turn, restore 5 HP.");
        assert!(plan.primitives.is_empty());
        assert_eq!(plan.upkeep.as_slice(), &[EffectPrimitive::Heal { amount: 5 }]);
    }

    #[test]
    fn test_flags() {
        let trap = plan(CardType::Trap, "Triggered automatically on enemy card: deal 10 dmg.");
        assert!(trap.auto_trigger);
        assert_eq!(trap.primitives.as_slice(), &[EffectPrimitive::Damage { amount: 10 }]);
        assert!(!plan(CardType::Trap, "Deal 20 dmg.").auto_trigger);
        assert!(plan(CardType::Attack, "Deal 12 dmg. Discard after use.").discard_after_use);
    }

    #[test]
    fn test_unrecognized_text_is_empty() {
        assert!(plan(CardType::Tactical, "Looks menacing.").is_empty());
    }
}
