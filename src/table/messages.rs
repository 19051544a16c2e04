//! Table actor message types.

use crate::game::{Action, GameError, GameSnapshot, PlayerView, TimerKind, VoteStatus};
use tokio::sync::oneshot;

/// Messages accepted by a [`TableActor`](super::TableActor).
#[derive(Debug)]
pub enum TableMessage {
    AddPlayer {
        player_id: String,
        name: String,
        response: oneshot::Sender<Result<PlayerView, GameError>>,
    },

    StartGame {
        response: oneshot::Sender<Result<GameSnapshot, GameError>>,
    },

    /// Player decision routed through the engine's dispatch table
    SubmitAction {
        player_id: String,
        action: Action,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    VoteNextHand {
        player_id: String,
        ready: bool,
        response: oneshot::Sender<Result<VoteStatus, GameError>>,
    },

    ConfirmStartWithReady {
        player_id: String,
        response: oneshot::Sender<Result<VoteStatus, GameError>>,
    },

    StartNewRound {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    GetSnapshot {
        response: oneshot::Sender<GameSnapshot>,
    },

    /// Internal: a scheduled timer ran out
    TimerFired { kind: TimerKind, token: u64 },

    /// Stop the actor; pending timers are aborted
    Close { response: oneshot::Sender<()> },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("table is closed")]
    Closed,
}
