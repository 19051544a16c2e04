//! Async table runtime.
//!
//! A [`TableActor`] owns one engine and applies messages one at a time, so
//! every write is serialized. Timer commands emitted by the engine become
//! `tokio` sleep tasks that report back through the inbox. Snapshots are
//! published on a `watch` channel and can be read while the actor works.

mod messages;

pub use messages::{TableError, TableMessage};

use crate::engine::GameEngine;
use crate::game::{Action, GameSnapshot, PlayerView, TimerCommand, TimerKind, VoteStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const INBOX_CAPACITY: usize = 100;

/// Cloneable handle for talking to a running table.
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    snapshots: watch::Receiver<GameSnapshot>,
    game_id: String,
}

impl TableHandle {
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Send a raw message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), TableError> {
        self.sender.send(message).await.map_err(|_| TableError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> Result<T, TableError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| TableError::Closed)
    }

    pub async fn add_player(&self, player_id: &str, name: &str) -> Result<PlayerView, TableError> {
        let (player_id, name) = (player_id.to_string(), name.to_string());
        Ok(self.request(|response| TableMessage::AddPlayer { player_id, name, response }).await??)
    }

    pub async fn start_game(&self) -> Result<GameSnapshot, TableError> {
        Ok(self.request(|response| TableMessage::StartGame { response }).await??)
    }

    pub async fn submit_action(&self, player_id: &str, action: Action) -> Result<(), TableError> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|response| TableMessage::SubmitAction { player_id, action, response })
            .await??)
    }

    pub async fn vote_next_hand(
        &self,
        player_id: &str,
        ready: bool,
    ) -> Result<VoteStatus, TableError> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|response| TableMessage::VoteNextHand { player_id, ready, response })
            .await??)
    }

    pub async fn confirm_start_with_ready(&self, player_id: &str) -> Result<VoteStatus, TableError> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|response| TableMessage::ConfirmStartWithReady { player_id, response })
            .await??)
    }

    pub async fn start_new_round(&self) -> Result<(), TableError> {
        Ok(self.request(|response| TableMessage::StartNewRound { response }).await??)
    }

    /// Snapshot taken inside the actor, after every message queued before it.
    pub async fn snapshot(&self) -> Result<GameSnapshot, TableError> {
        self.request(|response| TableMessage::GetSnapshot { response }).await
    }

    /// Most recently published snapshot, without a round trip.
    pub fn latest(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    pub async fn close(&self) -> Result<(), TableError> {
        self.request(|response| TableMessage::Close { response }).await
    }
}

/// Table actor driving a single engine.
pub struct TableActor<E: GameEngine> {
    engine: E,
    inbox: mpsc::Receiver<TableMessage>,
    /// Weak so that dropping every handle ends the actor.
    timer_sender: mpsc::WeakSender<TableMessage>,
    timers: HashMap<TimerKind, (u64, JoinHandle<()>)>,
    closed: bool,
}

impl<E: GameEngine + Send + 'static> TableActor<E> {
    /// Wire the engine's observer to a fresh snapshot channel.
    pub fn new(mut engine: E) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (publisher, snapshots) = watch::channel(engine.snapshot());
        engine.set_observer(Arc::new(move |snapshot: &GameSnapshot| {
            publisher.send_replace(snapshot.clone());
        }));

        let handle = TableHandle { game_id: engine.game_id().to_string(), sender, snapshots };
        let actor = Self {
            engine,
            inbox,
            timer_sender: handle.sender.downgrade(),
            timers: HashMap::new(),
            closed: false,
        };
        (actor, handle)
    }

    /// Spawn the actor on the current runtime.
    pub fn spawn(engine: E) -> TableHandle {
        let (actor, handle) = Self::new(engine);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the table event loop until closed or every handle is dropped.
    pub async fn run(mut self) {
        log::info!("Table {} starting", self.engine.game_id());
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            self.apply_timer_commands();
            if self.closed {
                break;
            }
        }
        for (_, (_, task)) in self.timers.drain() {
            task.abort();
        }
        log::info!("Table {} closed", self.engine.game_id());
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::AddPlayer { player_id, name, response } => {
                let _ = response.send(self.engine.add_player(&player_id, &name));
            }

            TableMessage::StartGame { response } => {
                let _ = response.send(self.engine.start_game());
            }

            TableMessage::SubmitAction { player_id, action, response } => {
                let result = self.engine.submit_action(&player_id, action);
                if let Err(e) = &result {
                    let game_id = self.engine.game_id();
                    log::debug!("Table {game_id}: {player_id} {} rejected: {e}", action.name());
                }
                let _ = response.send(result);
            }

            TableMessage::VoteNextHand { player_id, ready, response } => {
                let _ = response.send(self.engine.vote_next_hand(&player_id, ready));
            }

            TableMessage::ConfirmStartWithReady { player_id, response } => {
                let _ = response.send(self.engine.confirm_start_with_ready(&player_id));
            }

            TableMessage::StartNewRound { response } => {
                let _ = response.send(self.engine.start_new_round());
            }

            TableMessage::GetSnapshot { response } => {
                let _ = response.send(self.engine.snapshot());
            }

            TableMessage::TimerFired { kind, token } => {
                if matches!(self.timers.get(&kind), Some((armed, _)) if *armed == token) {
                    self.timers.remove(&kind);
                }
                self.engine.on_timer(kind, token);
            }

            TableMessage::Close { response } => {
                self.closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Turn the engine's timer commands into sleep tasks.
    fn apply_timer_commands(&mut self) {
        for command in self.engine.drain_timer_commands() {
            match command {
                TimerCommand::Arm { kind, token, after } => {
                    let sender = self.timer_sender.clone();
                    let task = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        if let Some(sender) = sender.upgrade() {
                            let _ = sender.send(TableMessage::TimerFired { kind, token }).await;
                        }
                    });
                    if let Some((_, previous)) = self.timers.insert(kind, (token, task)) {
                        previous.abort();
                    }
                }
                TimerCommand::Cancel { kind } => {
                    if let Some((_, task)) = self.timers.remove(&kind) {
                        task.abort();
                    }
                }
            }
        }
    }
}
