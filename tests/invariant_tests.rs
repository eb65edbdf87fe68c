//! Property tests over random duels.
//!
//! Random decks from the standard catalog, random seeds and random legal
//! action choices. After every action:
//! - both players' HP stays in `[0, max_hp]`
//! - zones respect their capacities
//! - the multiset of cards across both players and the loot pile is
//!   exactly the one dealt at setup

use std::sync::Arc;

use card_duel::cards::{CardCatalog, CardId};
use card_duel::core::{
    ActionOrigin, DuelConfig, DuelSetup, GameRng, PlayerKey, PlayerSetup,
};
use card_duel::duel::Duel;
use card_duel::zones::ZoneManager;
use proptest::prelude::*;

fn deck_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=29, 0..16)
}

fn run_duel(seed: u64, deck1: Vec<u32>, deck2: Vec<u32>, loot: Vec<u32>, choices: Vec<usize>) {
    let config = DuelConfig::default();
    let setup = DuelSetup::new(
        PlayerSetup::new("p1", deck1.into_iter().map(CardId::new)),
        PlayerSetup::new("p2", deck2.into_iter().map(CardId::new)),
    )
    .with_loot_pile(loot.into_iter().map(CardId::new));

    let catalog = Arc::new(CardCatalog::standard().unwrap());
    let mut duel = Duel::new(&setup, catalog, config.clone(), Box::new(GameRng::new(seed))).unwrap();
    let dealt = ZoneManager::global_pool(duel.state());

    for choice in choices {
        if duel.winner().is_some() {
            break;
        }
        let player = duel.current_player();
        let legal = duel.legal_actions(player);
        assert!(!legal.is_empty());
        let action = legal[choice % legal.len()].clone();

        duel.apply(ActionOrigin::Remote, player, action.clone())
            .unwrap_or_else(|err| panic!("legal action {action:?} rejected: {err}"));

        let state = duel.state();
        for key in PlayerKey::ALL {
            let seat = &state.players[key];
            assert!((0..=config.max_hp).contains(&seat.hp), "hp out of range: {}", seat.hp);
            assert!(seat.hand.len() <= config.hand_capacity);
            assert!(seat.field.len() <= config.field_capacity);
        }
        assert_eq!(ZoneManager::global_pool(state), dealt);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_random_duels_keep_invariants(
        seed in any::<u64>(),
        deck1 in deck_strategy(),
        deck2 in deck_strategy(),
        loot in prop::collection::vec(1u32..=29, 0..4),
        choices in prop::collection::vec(any::<usize>(), 1..120),
    ) {
        run_duel(seed, deck1, deck2, loot, choices);
    }

    #[test]
    fn test_card_id_normalization(n in 0u32..1000) {
        let id = CardId::new(n);
        prop_assert_eq!(id.as_str().len(), 3);
        prop_assert_eq!(CardId::parse(&n.to_string()), id.clone());
        let from_json: CardId = serde_json::from_str(&n.to_string()).unwrap();
        prop_assert_eq!(from_json, id);
    }
}
