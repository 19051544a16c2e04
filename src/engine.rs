// Table engine API boundary. The trait collects the operations a room or
// transport layer needs, so the table actor can drive any engine without
// depending on `Game` internals. It is implemented for the core `Game` type.

use crate::game::{
    Action, GameError, GameSnapshot, GameState, PlayerView, StateObserver, TimerCommand,
    TimerKind, VoteStatus,
};
use std::sync::Arc;

pub trait GameEngine {
    // Lobby
    fn add_player(&mut self, id: &str, name: &str) -> Result<PlayerView, GameError>;
    fn start_game(&mut self) -> Result<GameSnapshot, GameError>;

    // Play
    fn submit_action(&mut self, player_id: &str, action: Action) -> Result<(), GameError>;
    fn vote_next_hand(&mut self, player_id: &str, ready: bool) -> Result<VoteStatus, GameError>;
    fn confirm_start_with_ready(&mut self, player_id: &str) -> Result<VoteStatus, GameError>;
    fn start_new_round(&mut self) -> Result<(), GameError>;

    // Timers
    fn on_timer(&mut self, kind: TimerKind, token: u64) -> bool;
    fn drain_timer_commands(&mut self) -> Vec<TimerCommand>;

    // Observation
    fn set_observer(&mut self, observer: Arc<dyn StateObserver>);
    fn snapshot(&self) -> GameSnapshot;
    fn state(&self) -> GameState;
    fn game_id(&self) -> &str;
}

impl GameEngine for crate::game::Game {
    fn add_player(&mut self, id: &str, name: &str) -> Result<PlayerView, GameError> {
        self.add_player(id, name).map(crate::game::Player::view)
    }
    fn start_game(&mut self) -> Result<GameSnapshot, GameError> {
        self.start_game()
    }

    fn submit_action(&mut self, player_id: &str, action: Action) -> Result<(), GameError> {
        self.submit_action(player_id, action)
    }
    fn vote_next_hand(&mut self, player_id: &str, ready: bool) -> Result<VoteStatus, GameError> {
        self.vote_next_hand(player_id, ready)
    }
    fn confirm_start_with_ready(&mut self, player_id: &str) -> Result<VoteStatus, GameError> {
        self.confirm_start_with_ready(player_id)
    }
    fn start_new_round(&mut self) -> Result<(), GameError> {
        self.start_new_round()
    }

    fn on_timer(&mut self, kind: TimerKind, token: u64) -> bool {
        self.on_timer(kind, token)
    }
    fn drain_timer_commands(&mut self) -> Vec<TimerCommand> {
        self.drain_timer_commands()
    }

    fn set_observer(&mut self, observer: Arc<dyn StateObserver>) {
        self.set_observer(observer)
    }
    fn snapshot(&self) -> GameSnapshot {
        self.snapshot()
    }
    fn state(&self) -> GameState {
        self.state()
    }
    fn game_id(&self) -> &str {
        self.game_id()
    }
}
