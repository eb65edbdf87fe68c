//! Duel orchestration.
//!
//! - `Duel`: synchronous entry points (play, discard, draw, end turn,
//!   activate trap), winner evaluation and history
//! - `DuelSession`: async wrapper around a `Duel` and its
//!   `RemoteCounterpart`
//! - `DuelSummary`: end-of-duel report

mod orchestrator;
mod session;
mod summary;

pub use orchestrator::{ActionOutcome, Duel};
pub use session::{DuelSession, RemoteCounterpart};
pub use summary::{DuelSummary, PlayerSummary};
