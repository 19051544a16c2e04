//! Read-only views of a table handed to the transport layer.

use super::{GameState, PlayerId};
use crate::cards::Card;
use crate::evaluator::Combination;
use serde::Serialize;

/// A single chip movement, queued for client animation and drained on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDelta {
    pub player_id: PlayerId,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ExposeOutcome {
    ExposerWins,
    ExposedWins,
    /// Equal hands with two players left: both go to Vara.
    TieVara,
    /// Equal hands with more than two players left: the exposer folds.
    TieExposerFolds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposeResult {
    pub exposer_id: PlayerId,
    pub exposed_id: PlayerId,
    pub exposer_combination: String,
    pub exposed_combination: String,
    pub outcome: ExposeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAction {
    pub player_id: PlayerId,
    pub action: &'static str,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: u64,
    pub cards: Vec<Card>,
    pub current_bet: u64,
    pub total_bet: u64,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub is_sleeping: bool,
    pub is_in_vara: bool,
    pub combination: Option<Combination>,
    pub points: u8,
}

/// Consistent picture of a table between two transitions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    pub round_id: u64,
    pub game_state: GameState,
    pub players: Vec<PlayerView>,
    /// Set whenever the table waits on a player's decision.
    pub current_player_index: Option<usize>,
    pub current_player_id: Option<PlayerId>,
    pub pot: u64,
    pub vara_pot: u64,
    pub vara_players: Vec<PlayerId>,
    pub vara_initiator: Option<PlayerId>,
    pub betting_round: u8,
    pub current_bet: u64,
    pub players_acted: usize,
    pub last_raiser_id: Option<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub winners: Vec<PlayerId>,
    pub carry_over_pot: u64,
    pub balance_deltas: Vec<BalanceDelta>,
    pub vote_countdown: u32,
    pub ready_players: Vec<PlayerId>,
    pub vote_initiator_id: Option<PlayerId>,
    /// Exactly three of four eligible players are ready and may confirm a start.
    pub ready_to_start_with_voted: bool,
    pub start_confirmations: Vec<PlayerId>,
    pub expose_result: Option<ExposeResult>,
    pub last_action: Option<LastAction>,
    /// Readable log of the hand so far, oldest first.
    pub hand_history: Vec<String>,
}

impl GameSnapshot {
    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Chips on the table: stacks plus both pots and any carried pot.
    pub fn chips_in_play(&self) -> u64 {
        self.players.iter().map(|p| p.chips).sum::<u64>()
            + self.pot
            + self.vara_pot
            + self.carry_over_pot
    }
}
