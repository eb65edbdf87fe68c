//! Async session tests against scripted remote counterparts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use card_duel::cards::{CardCatalog, CardInstance};
use card_duel::core::{
    DuelAction, DuelConfig, DuelError, DuelState, PlayerKey, RemoteMove, ScriptedRng,
    TransportError, ValidationError,
};
use card_duel::duel::{Duel, DuelSession, DuelSummary, RemoteCounterpart};

/// Answers with queued moves and records persisted summaries.
#[derive(Default)]
struct ScriptedRemote {
    moves: Mutex<Vec<RemoteMove>>,
    persisted: Mutex<Vec<DuelSummary>>,
    seen_views: Mutex<Vec<DuelState>>,
}

impl ScriptedRemote {
    fn with_moves(moves: Vec<RemoteMove>) -> Self {
        Self {
            moves: Mutex::new(moves),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RemoteCounterpart for ScriptedRemote {
    async fn request_move(&self, view: &DuelState) -> Result<RemoteMove, TransportError> {
        self.seen_views.lock().unwrap().push(view.clone());
        let mut moves = self.moves.lock().unwrap();
        if moves.is_empty() {
            return Err(TransportError::Status {
                code: 503,
                message: "no move queued".into(),
            });
        }
        Ok(moves.remove(0))
    }

    async fn persist_summary(&self, summary: &DuelSummary) -> Result<(), TransportError> {
        self.persisted.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

/// Never answers in time.
struct SlowRemote;

#[async_trait]
impl RemoteCounterpart for SlowRemote {
    async fn request_move(&self, _view: &DuelState) -> Result<RemoteMove, TransportError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(RemoteMove::new(PlayerKey::Player2, DuelAction::EndTurn))
    }
}

fn duel() -> Duel {
    let mut state = DuelState::new("alice", "bot", &DuelConfig::default());
    state.players.player1.hand = [1u32, 6].into_iter().map(CardInstance::new).collect();
    state.players.player1.deck = (1..=5).map(CardInstance::new).collect();
    state.players.player2.hand = [1u32, 7].into_iter().map(CardInstance::new).collect();
    state.players.player2.deck = (1..=5).map(CardInstance::new).collect();
    Duel::from_state(
        state,
        Arc::new(CardCatalog::standard().unwrap()),
        DuelConfig::default().with_remote_timeout(Duration::from_millis(50)),
        Box::new(ScriptedRng::default()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_bot_move_applies_remote_action() {
    let remote = ScriptedRemote::with_moves(vec![
        RemoteMove::new(PlayerKey::Player2, DuelAction::PlayCard { index: 0 }),
        RemoteMove::new(PlayerKey::Player2, DuelAction::EndTurn),
    ]);
    let session = DuelSession::new(duel(), remote);

    session.end_turn().await.unwrap();
    let outcome = session.bot_move().await.unwrap();
    assert!(!outcome.ignored);
    assert_eq!(session.snapshot().await.players.player1.hp, 190);

    session.bot_move().await.unwrap();
    assert_eq!(session.snapshot().await.current_player, PlayerKey::Player1);

    // The bot only ever sees its own redacted view.
    let views = session.remote().seen_views.lock().unwrap();
    assert!(views[0].players.player1.hand.iter().all(|c| c.card_id.is_hidden()));
}

#[tokio::test]
async fn test_bot_move_out_of_turn() {
    let session = DuelSession::new(duel(), ScriptedRemote::default());

    let err = session.bot_move().await.unwrap_err();
    assert!(matches!(
        err,
        DuelError::Validation(ValidationError::OutOfTurn {
            expected: PlayerKey::Player1,
            provided: PlayerKey::Player2,
        })
    ));
    assert!(session.remote().seen_views.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_error_leaves_state_untouched() {
    let session = DuelSession::new(duel(), ScriptedRemote::default());
    session.end_turn().await.unwrap();
    let before = session.snapshot().await;

    let err = session.bot_move().await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(err, DuelError::Transport(TransportError::Status { code: 503, .. })));
    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn test_timeout_leaves_state_untouched() {
    let session = DuelSession::new(duel(), SlowRemote);
    session.end_turn().await.unwrap();
    let before = session.snapshot().await;

    let err = session.bot_move().await.unwrap_err();

    assert!(matches!(
        err,
        DuelError::Transport(TransportError::Timeout(t)) if t == Duration::from_millis(50)
    ));
    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn test_remote_move_for_wrong_seat_rejected() {
    let remote = ScriptedRemote::with_moves(vec![RemoteMove::new(
        PlayerKey::Player1,
        DuelAction::DrawCard,
    )]);
    let session = DuelSession::new(duel(), remote);
    session.end_turn().await.unwrap();
    let before = session.snapshot().await;

    let err = session.bot_move().await.unwrap_err();
    assert!(matches!(err, DuelError::Validation(ValidationError::OutOfTurn { .. })));
    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn test_finish_persists_summary() {
    let session = DuelSession::new(duel(), ScriptedRemote::default());
    session.play_card(0).await.unwrap();

    let summary = session.finish().await.unwrap();

    assert_eq!(summary.players.player1.stats.cards_played, 1);
    assert_eq!(summary.actions, 1);
    assert_eq!(session.remote().persisted.lock().unwrap().as_slice(), &[summary]);

    let duel = session.into_inner();
    assert_eq!(duel.state().players.player2.hp, 190);
}
