use super::vara::VaraState;
use super::{Game, GameError, GameState, TimerKind};
use serde::Serialize;
use std::time::Duration;

const TICK: Duration = Duration::from_secs(1);
/// Table size at which three ready players may start without the fourth.
const START_WITH_READY_TABLE: usize = 4;

#[derive(Debug, Clone, Default)]
pub(crate) struct VotingState {
    pub(crate) ready: Vec<usize>,
    pub(crate) confirmed: Vec<usize>,
    /// Seconds left before the next hand starts on its own.
    pub(crate) countdown: u32,
    pub(crate) initiator: Option<usize>,
}

/// Tally returned to a voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub ready_count: usize,
    pub total: usize,
    /// The vote completed and the next hand was dealt.
    pub started: bool,
    pub confirmations: usize,
}

impl Game {
    /// Awake seats holding chips.
    fn eligible(&self) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&s| !self.players[s].sleeping && self.players[s].chips > 0)
            .collect()
    }

    /// Open the vote for the next hand.
    pub(crate) fn start_vote_new_round(&mut self, initiator: Option<usize>) {
        self.timers.cancel(TimerKind::Turn);
        self.timers.cancel(TimerKind::VoteCountdown);
        self.state = GameState::VotingNewRound;
        self.voting = VotingState { initiator, ..VotingState::default() };
        for p in self.players.iter_mut() {
            p.sleeping = p.chips == 0;
            p.in_vara = false;
        }

        let eligible = self.eligible().len();
        if eligible >= self.settings.min_players {
            self.voting.countdown = self.settings.vote_countdown_secs;
            self.timers.arm(TimerKind::VoteCountdown, TICK);
            log::info!(
                "[{}] voting for the next hand, {eligible} eligible, {}s",
                self.game_id,
                self.voting.countdown
            );
        } else {
            log::warn!(
                "[{}] only {eligible} player(s) with chips, waiting for more",
                self.game_id
            );
        }
        self.notify();
    }

    /// Cast (`ready = true`) or retract a ready vote. A complete vote deals the next hand.
    pub fn vote_next_hand(&mut self, player_id: &str, ready: bool) -> Result<VoteStatus, GameError> {
        let seat = self.seat_of(player_id)?;
        if self.state != GameState::VotingNewRound {
            return Err(GameError::IllegalState { state: self.state, operation: "voteNextHand" });
        }
        if !self.eligible().contains(&seat) {
            return Err(GameError::IllegalState {
                state: self.state,
                operation: "voteNextHand without chips",
            });
        }

        if ready {
            if !self.voting.ready.contains(&seat) {
                self.voting.ready.push(seat);
            }
        } else {
            self.voting.ready.retain(|&s| s != seat);
            self.voting.confirmed.clear();
        }

        let mut status = self.vote_status();
        log::debug!(
            "[{}] {player_id} ready={ready} ({}/{})",
            self.game_id,
            status.ready_count,
            status.total
        );
        if status.total >= self.settings.min_players && status.ready_count == status.total {
            self.start_new_round()?;
            status.started = true;
        } else {
            self.notify();
        }
        Ok(status)
    }

    /// One of three ready players agrees to start without the unready fourth.
    pub fn confirm_start_with_ready(&mut self, player_id: &str) -> Result<VoteStatus, GameError> {
        let seat = self.seat_of(player_id)?;
        if self.state != GameState::VotingNewRound || !self.can_start_with_ready() {
            return Err(GameError::IllegalState {
                state: self.state,
                operation: "confirmStartWithReady",
            });
        }
        if !self.voting.ready.contains(&seat) {
            return Err(GameError::IllegalState {
                state: self.state,
                operation: "confirmStartWithReady without a ready vote",
            });
        }
        if !self.voting.confirmed.contains(&seat) {
            self.voting.confirmed.push(seat);
        }

        let mut status = self.vote_status();
        if status.confirmations == self.voting.ready.len() {
            let unready: Vec<usize> =
                self.eligible().into_iter().filter(|s| !self.voting.ready.contains(s)).collect();
            for &seat in &unready {
                log::info!("[{}] {} sits out this hand", self.game_id, self.players[seat].id);
            }
            self.deal_next_hand(&unready)?;
            status.started = true;
        } else {
            self.notify();
        }
        Ok(status)
    }

    pub(crate) fn can_start_with_ready(&self) -> bool {
        self.eligible().len() == START_WITH_READY_TABLE
            && self.voting.ready.len() == START_WITH_READY_TABLE - 1
    }

    fn vote_status(&self) -> VoteStatus {
        VoteStatus {
            ready_count: self.voting.ready.len(),
            total: self.eligible().len(),
            started: false,
            confirmations: self.voting.confirmed.len(),
        }
    }

    pub(crate) fn tick_vote_countdown(&mut self) {
        if self.state != GameState::VotingNewRound {
            return;
        }
        self.voting.countdown = self.voting.countdown.saturating_sub(1);
        if self.voting.countdown > 0 {
            self.timers.arm(TimerKind::VoteCountdown, TICK);
            self.notify();
            return;
        }
        if let Err(e) = self.start_new_round() {
            log::error!("[{}] vote countdown could not start a hand: {e}", self.game_id);
        }
    }

    /// Deal the next hand with the dealer button moved on, or park in the vote
    /// when fewer than the minimum number of players hold chips.
    pub fn start_new_round(&mut self) -> Result<(), GameError> {
        self.deal_next_hand(&[])
    }

    /// Everyone holding chips is woken except the seats in `sitting_out`.
    fn deal_next_hand(&mut self, sitting_out: &[usize]) -> Result<(), GameError> {
        if !matches!(self.state, GameState::Showdown | GameState::VotingNewRound) {
            return Err(GameError::IllegalState { state: self.state, operation: "startNewRound" });
        }
        self.timers.cancel_all();
        self.pending = None;
        self.carry_over_pot += std::mem::take(&mut self.pot);
        self.carry_over_pot += std::mem::take(&mut self.vara.pot);
        self.vara = VaraState::default();
        for (seat, p) in self.players.iter_mut().enumerate() {
            p.sleeping = p.chips == 0 || sitting_out.contains(&seat);
            p.in_vara = false;
        }

        let eligible = self.eligible().len();
        if eligible < self.settings.min_players {
            log::warn!(
                "[{}] cannot deal with {eligible} player(s) holding chips, parked",
                self.game_id
            );
            self.state = GameState::VotingNewRound;
            self.voting.countdown = 0;
            self.voting.ready.clear();
            self.voting.confirmed.clear();
            self.notify();
            return Ok(());
        }

        let n = self.players.len();
        let from = self.dealer.unwrap_or(n - 1);
        self.dealer = super::ring_from(from, n).find(|&s| !self.players[s].sleeping);
        self.begin_hand();
        Ok(())
    }
}
