//! Async session around one duel and its remote counterpart.
//!
//! The remote counterpart answers bot moves and stores finished duel
//! summaries. The session holds the duel behind a `tokio::sync::Mutex`
//! for the whole round-trip, so local input can't interleave with a
//! pending bot move. A failed or timed-out round-trip changes nothing.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::action::RemoteMove;
use crate::core::error::{Result, TransportError, ValidationError};
use crate::core::player::PlayerKey;
use crate::core::state::DuelState;

use super::orchestrator::{ActionOutcome, Duel};
use super::summary::DuelSummary;

/// The remote side of a duel: the bot's move source and summary sink.
#[async_trait]
pub trait RemoteCounterpart: Send + Sync {
    /// Ask for the bot's next move given its view of the duel.
    async fn request_move(&self, view: &DuelState) -> Result<RemoteMove, TransportError>;

    /// Store the summary of a finished duel.
    async fn persist_summary(&self, _summary: &DuelSummary) -> Result<(), TransportError> {
        Ok(())
    }
}

/// A duel plus the remote counterpart driving its bot seat.
pub struct DuelSession<R> {
    duel: Mutex<Duel>,
    remote: R,
    timeout: Duration,
}

impl<R: RemoteCounterpart> DuelSession<R> {
    pub fn new(duel: Duel, remote: R) -> Self {
        let timeout = duel.config().remote_timeout();
        Self {
            duel: Mutex::new(duel),
            remote,
            timeout,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fetch the bot's move and apply it.
    ///
    /// Transport failures and timeouts are returned as-is; the duel is left
    /// untouched and the call can be retried.
    pub async fn bot_move(&self) -> Result<ActionOutcome> {
        let mut duel = self.duel.lock().await;
        if let Some(winner) = duel.winner() {
            return Err(ValidationError::DuelOver { winner }.into());
        }
        let bot = duel.config().bot_player();
        if duel.current_player() != bot {
            return Err(ValidationError::OutOfTurn {
                expected: duel.current_player(),
                provided: bot,
            }
            .into());
        }

        let view = duel.view_for(bot);
        let mv = match tokio::time::timeout(self.timeout, self.remote.request_move(&view)).await {
            Ok(Ok(mv)) => mv,
            Ok(Err(err)) => {
                tracing::warn!(%err, "remote move request failed");
                return Err(err.into());
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "remote move request timed out");
                return Err(TransportError::Timeout(self.timeout).into());
            }
        };
        Ok(duel.apply_remote(mv)?)
    }

    pub async fn play_card(&self, index: usize) -> Result<ActionOutcome> {
        Ok(self.duel.lock().await.play_card(index)?)
    }

    pub async fn discard_card(&self, index: usize) -> Result<ActionOutcome> {
        Ok(self.duel.lock().await.discard_card(index)?)
    }

    pub async fn draw_card(&self) -> Result<ActionOutcome> {
        Ok(self.duel.lock().await.draw_card()?)
    }

    pub async fn end_turn(&self) -> Result<ActionOutcome> {
        Ok(self.duel.lock().await.end_turn()?)
    }

    pub async fn activate_trap(&self, index: usize) -> Result<ActionOutcome> {
        Ok(self.duel.lock().await.activate_trap(index)?)
    }

    /// Full state snapshot.
    pub async fn snapshot(&self) -> DuelState {
        self.duel.lock().await.state().clone()
    }

    pub async fn view_for(&self, viewer: PlayerKey) -> DuelState {
        self.duel.lock().await.view_for(viewer)
    }

    /// Build the summary and hand it to the remote counterpart.
    pub async fn finish(&self) -> Result<DuelSummary> {
        let summary = self.duel.lock().await.summary();
        match tokio::time::timeout(self.timeout, self.remote.persist_summary(&summary)).await {
            Ok(Ok(())) => {
                tracing::info!(winner = ?summary.winner, turns = summary.turns, "summary persisted");
                Ok(summary)
            }
            Ok(Err(err)) => {
                tracing::warn!(%err, "summary persistence failed");
                Err(err.into())
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "summary persistence timed out");
                Err(TransportError::Timeout(self.timeout).into())
            }
        }
    }

    pub fn into_inner(self) -> Duel {
        self.duel.into_inner()
    }
}
