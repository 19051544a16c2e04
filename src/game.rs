mod betting;
mod showdown;
pub mod snapshot;
mod timers;
mod vara;
mod voting;

use crate::cards::Card;
use crate::config::{ConfigError, GameSettings};
use crate::deck::Deck;
use crate::evaluator::Combination;
use crate::hand::{Hand, HAND_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use snapshot::{
    BalanceDelta, ExposeOutcome, ExposeResult, GameSnapshot, LastAction, PlayerView,
};
pub use timers::{TimerCommand, TimerKind};
pub use voting::VoteStatus;

use showdown::PendingTransition;
use timers::Timers;
use vara::VaraState;
use voting::VotingState;

pub type PlayerId = String;

/// Table phase. Only the betting-capable phases accept `submit_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum GameState {
    Waiting,
    Betting,
    Showdown,
    VotingNewRound,
    WaitingForVaraJoin,
    Vara,
    WinnerVaraChoice,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            GameState::Waiting => "waiting",
            GameState::Betting => "betting",
            GameState::Showdown => "showdown",
            GameState::VotingNewRound => "voting_new_round",
            GameState::WaitingForVaraJoin => "waiting_for_vara_join",
            GameState::Vara => "vara",
            GameState::WinnerVaraChoice => "winner_vara_choice",
        }
    }

    pub fn is_betting_capable(self) -> bool {
        matches!(
            self,
            GameState::Betting
                | GameState::Vara
                | GameState::WaitingForVaraJoin
                | GameState::WinnerVaraChoice
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandHistoryVerb {
    Ante,
    Fold,
    Check,
    Call,
    RaiseTo,
    AllIn,
    Expose,
    JoinVara,
    RefuseVara,
    Win,
    Split,
    Bonus,
}

impl HandHistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HandHistoryVerb::Ante => "Ante",
            HandHistoryVerb::Fold => "Fold",
            HandHistoryVerb::Check => "Check",
            HandHistoryVerb::Call => "Call",
            HandHistoryVerb::RaiseTo => "Raise to",
            HandHistoryVerb::AllIn => "All-in",
            HandHistoryVerb::Expose => "Expose",
            HandHistoryVerb::JoinVara => "Join Vara",
            HandHistoryVerb::RefuseVara => "Refuse Vara",
            HandHistoryVerb::Win => "Win",
            HandHistoryVerb::Split => "Split",
            HandHistoryVerb::Bonus => "Bonus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandHistoryEntry {
    pub seat: usize,
    pub verb: HandHistoryVerb,
    pub amount: Option<u64>,
    pub betting_round: u8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("table is full: at most {max} players")]
    CapacityExceeded { max: usize },
    #[error("game already started")]
    AlreadyStarted,
    #[error("not enough players: need {min}, have {have}")]
    InsufficientPlayers { min: usize, have: usize },
    #[error("not your turn")]
    NotYourTurn,
    #[error("{operation} is not allowed while {state}")]
    IllegalState { state: GameState, operation: &'static str },
    #[error("invalid amount: min {min}, max {max}, got {got}")]
    InvalidRaise { min: u64, max: u64, got: u64 },
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("nothing to call")]
    NoOpenBet,
    #[error("no player to expose")]
    NoExposeTarget,
    #[error("unknown action: '{0}'")]
    UnknownAction(String),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("player already seated: {0}")]
    DuplicatePlayer(String),
}

/// Answer to a winner's Vara offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerChoice {
    /// Stake the winnings in a new Vara.
    Vara,
    /// Bank the winnings and move on to the next hand.
    Collect,
}

impl FromStr for WinnerChoice {
    type Err = GameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vara" => Ok(WinnerChoice::Vara),
            "collect" => Ok(WinnerChoice::Collect),
            other => Err(GameError::UnknownAction(format!("winnerChoice {other}"))),
        }
    }
}

/// Player decision accepted by [`Game::submit_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    Fold,
    Call,
    /// Chips to add on top of the player's current bet.
    Raise(u64),
    AllIn,
    Expose,
    JoinVara(u64),
    RefuseVara,
    WinnerChoice(WinnerChoice),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Call => "call",
            Action::Raise(_) => "raise",
            Action::AllIn => "all-in",
            Action::Expose => "expose",
            Action::JoinVara(_) => "joinVara",
            Action::RefuseVara => "refuseVara",
            Action::WinnerChoice(_) => "winnerChoice",
        }
    }

    /// Build an action from the transport's kind string and optional argument
    /// (an amount, or `vara`/`collect` for a winner choice).
    ///
    /// ```
    /// use seka_rs::game::{Action, WinnerChoice};
    ///
    /// assert_eq!(Action::parse("raise", Some("50")).unwrap(), Action::Raise(50));
    /// assert_eq!(
    ///     Action::parse("winnerChoice", Some("collect")).unwrap(),
    ///     Action::WinnerChoice(WinnerChoice::Collect)
    /// );
    /// assert!(Action::parse("check-raise", None).is_err());
    /// ```
    pub fn parse(kind: &str, arg: Option<&str>) -> Result<Action, GameError> {
        let amount = || -> Result<u64, GameError> {
            match arg.map(str::trim) {
                None | Some("") => Ok(0),
                Some(raw) => raw
                    .parse::<u64>()
                    .map_err(|_| GameError::UnknownAction(format!("{kind} {raw}"))),
            }
        };
        let action = match kind.trim() {
            "fold" => Action::Fold,
            "call" => Action::Call,
            "raise" => Action::Raise(amount()?),
            "all-in" | "allin" => Action::AllIn,
            "expose" => Action::Expose,
            "joinVara" => Action::JoinVara(amount()?),
            "refuseVara" => Action::RefuseVara,
            "winnerChoice" => Action::WinnerChoice(arg.unwrap_or_default().parse()?),
            other => return Err(GameError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

/// Receives a snapshot at every visible transition. Must not block.
pub trait StateObserver: Send + Sync {
    fn on_state_change(&self, snapshot: &GameSnapshot);
}

impl<F> StateObserver for F
where
    F: Fn(&GameSnapshot) + Send + Sync,
{
    fn on_state_change(&self, snapshot: &GameSnapshot) {
        self(snapshot)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) chips: u64,
    pub(crate) hand: Option<Hand>,
    pub(crate) current_bet: u64,
    pub(crate) total_bet: u64,
    pub(crate) status: PlayerStatus,
    pub(crate) sleeping: bool,
    pub(crate) in_vara: bool,
    pub(crate) combination: Option<Combination>,
}

impl Player {
    fn new(id: PlayerId, name: String, chips: u64) -> Self {
        Self {
            id,
            name,
            chips,
            hand: None,
            current_bet: 0,
            total_bet: 0,
            status: PlayerStatus::Active,
            sleeping: false,
            in_vara: false,
            combination: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's chip stack
    pub fn chips(&self) -> u64 {
        self.chips
    }

    /// Returns the player's cards, if dealt and not folded
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    /// Returns chips committed in the current betting round
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    /// Returns chips committed over the whole hand
    pub fn total_bet(&self) -> u64 {
        self.total_bet
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn is_in_vara(&self) -> bool {
        self.in_vara
    }

    /// Returns the last evaluated combination, set at expose or showdown
    pub fn combination(&self) -> Option<Combination> {
        self.combination
    }

    /// Dealt into the current hand and not folded.
    pub(crate) fn is_contending(&self) -> bool {
        !self.sleeping && self.status != PlayerStatus::Folded
    }

    /// Contending and still able to put chips in.
    pub(crate) fn can_act(&self) -> bool {
        !self.sleeping && self.status == PlayerStatus::Active
    }

    fn reset_for_hand(&mut self) {
        self.hand = None;
        self.combination = None;
        self.current_bet = 0;
        self.total_bet = 0;
        self.status = PlayerStatus::Active;
        self.in_vara = false;
    }

    pub(crate) fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            name: self.name.clone(),
            chips: self.chips,
            cards: self.hand.map(|h| h.cards().to_vec()).unwrap_or_default(),
            current_bet: self.current_bet,
            total_bet: self.total_bet,
            is_folded: self.status == PlayerStatus::Folded,
            is_all_in: self.status == PlayerStatus::AllIn,
            is_sleeping: self.sleeping,
            is_in_vara: self.in_vara,
            combination: self.combination,
            points: self.combination.map_or(0, |c| c.points),
        }
    }
}

/// Seats reachable from `start` in turn order, excluding `start` until the full lap.
pub(crate) fn ring_from(start: usize, n: usize) -> impl Iterator<Item = usize> {
    (1..=n).map(move |k| (start + k) % n.max(1))
}

/// Authoritative Seka table state machine.
///
/// All mutation goes through the operations below; every operation validates
/// before it mutates, so a returned error leaves the table untouched.
pub struct Game {
    pub(crate) game_id: String,
    pub(crate) settings: GameSettings,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) deck: Deck,
    pub(crate) players: Vec<Player>,
    pub(crate) state: GameState,
    pub(crate) round_id: u64,
    pub(crate) current: usize,
    pub(crate) dealer: Option<usize>,
    pub(crate) pot: u64,
    pub(crate) carry_over_pot: u64,
    pub(crate) betting_round: u8,
    pub(crate) players_acted: usize,
    pub(crate) current_bet: u64,
    pub(crate) last_raiser: Option<usize>,
    /// Winners of the last resolved hand, in turn order from the dealer's left
    pub(crate) winners: Vec<usize>,
    pub(crate) last_action: Option<LastAction>,
    pub(crate) expose_result: Option<ExposeResult>,
    pub(crate) vara: VaraState,
    pub(crate) voting: VotingState,
    pub(crate) pending: Option<PendingTransition>,
    pub(crate) timers: Timers,
    balance_deltas: Vec<BalanceDelta>,
    hand_history: Vec<HandHistoryEntry>,
    observer: Option<Arc<dyn StateObserver>>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("game_id", &self.game_id)
            .field("state", &self.state)
            .field("round_id", &self.round_id)
            .field("pot", &self.pot)
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    pub fn new(game_id: impl Into<String>, settings: GameSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            game_id: game_id.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            deck: Deck::seka(),
            players: Vec::with_capacity(settings.max_players),
            settings,
            state: GameState::Waiting,
            round_id: 0,
            current: 0,
            dealer: None,
            pot: 0,
            carry_over_pot: 0,
            betting_round: 0,
            players_acted: 0,
            current_bet: 0,
            last_raiser: None,
            winners: Vec::new(),
            last_action: None,
            expose_result: None,
            vara: VaraState::default(),
            voting: VotingState::default(),
            pending: None,
            timers: Timers::default(),
            balance_deltas: Vec::new(),
            hand_history: Vec::new(),
            observer: None,
        })
    }

    /// Register the single state-change callback.
    pub fn set_observer(&mut self, observer: Arc<dyn StateObserver>) {
        self.observer = Some(observer);
    }

    pub fn add_player(
        &mut self,
        id: impl Into<PlayerId>,
        name: impl Into<String>,
    ) -> Result<&Player, GameError> {
        if self.state != GameState::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(GameError::CapacityExceeded { max: self.settings.max_players });
        }
        let id = id.into();
        if self.players.iter().any(|p| p.id == id) {
            return Err(GameError::DuplicatePlayer(id));
        }
        log::info!("[{}] {} joined", self.game_id, id);
        self.players.push(Player::new(id, name.into(), self.settings.starting_chips));
        self.notify();
        let seat = self.players.len() - 1;
        Ok(&self.players[seat])
    }

    pub fn start_game(&mut self) -> Result<GameSnapshot, GameError> {
        if self.state != GameState::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() < self.settings.min_players {
            return Err(GameError::InsufficientPlayers {
                min: self.settings.min_players,
                have: self.players.len(),
            });
        }
        log::info!("[{}] game started with {} players", self.game_id, self.players.len());
        self.dealer = Some(0);
        self.begin_hand();
        Ok(self.snapshot())
    }

    /// Single entry point for player decisions.
    ///
    /// Checks the turn first, then routes through the (state, action) table;
    /// any pair not listed is an `IllegalState`.
    pub fn submit_action(&mut self, player_id: &str, action: Action) -> Result<(), GameError> {
        use Action as A;
        use GameState as S;

        let seat = self.seat_of(player_id)?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }
        log::debug!("[{}] {} -> {:?} ({})", self.game_id, player_id, action, self.state);
        match (self.state, action) {
            (S::Betting | S::Vara, A::Fold) => {
                self.fold(seat);
                Ok(())
            }
            (S::Betting | S::Vara, A::Call) => self.call(seat),
            (S::Betting | S::Vara, A::Raise(amount)) => self.raise(seat, amount),
            (S::Betting | S::Vara, A::AllIn) => self.all_in(seat),
            (S::Betting | S::Vara, A::Expose) => self.expose(seat),
            (S::WaitingForVaraJoin, A::JoinVara(amount)) => self.join_vara(seat, amount),
            (S::WaitingForVaraJoin, A::RefuseVara | A::Fold) => {
                self.refuse_vara(seat);
                Ok(())
            }
            (S::WinnerVaraChoice, A::WinnerChoice(choice)) => {
                self.winner_choice(seat, choice);
                Ok(())
            }
            (state, action) => Err(GameError::IllegalState { state, operation: action.name() }),
        }
    }

    /// Deliver a fired timer. Returns false for stale or cancelled timers.
    pub fn on_timer(&mut self, kind: TimerKind, token: u64) -> bool {
        if !self.timers.claim(kind, token) {
            log::warn!("[{}] ignoring stale {kind:?} timer #{token}", self.game_id);
            return false;
        }
        match kind {
            TimerKind::Turn => self.turn_expired(),
            TimerKind::RoundEnd => self.run_pending(),
            TimerKind::ExposeResult => {
                self.expose_result = None;
                self.notify();
            }
            TimerKind::VoteCountdown => self.tick_vote_countdown(),
        }
        true
    }

    /// Fire the currently armed timer of `kind`, if any.
    pub fn fire_timer(&mut self, kind: TimerKind) -> bool {
        match self.timers.token(kind) {
            Some(token) => self.on_timer(kind, token),
            None => false,
        }
    }

    pub fn timer_token(&self, kind: TimerKind) -> Option<u64> {
        self.timers.token(kind)
    }

    /// Timer commands produced since the last call, in order.
    pub fn drain_timer_commands(&mut self) -> Vec<TimerCommand> {
        self.timers.drain()
    }

    /// Chip movements not yet delivered to an observer.
    pub fn drain_balance_deltas(&mut self) -> Vec<BalanceDelta> {
        std::mem::take(&mut self.balance_deltas)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let id_of = |seat: usize| self.players.get(seat).map(|p| p.id.clone());
        let ids = |seats: &[usize]| seats.iter().filter_map(|&s| id_of(s)).collect::<Vec<_>>();
        let current = self.state.is_betting_capable().then_some(self.current);
        GameSnapshot {
            game_id: self.game_id.clone(),
            round_id: self.round_id,
            game_state: self.state,
            players: self.players.iter().map(Player::view).collect(),
            current_player_index: current,
            current_player_id: current.and_then(id_of),
            pot: self.pot,
            vara_pot: self.vara.pot,
            vara_players: ids(&self.vara.players),
            vara_initiator: self.vara.initiator.and_then(id_of),
            betting_round: self.betting_round,
            current_bet: self.current_bet,
            players_acted: self.players_acted,
            last_raiser_id: self.last_raiser.and_then(id_of),
            dealer_id: self.dealer.and_then(id_of),
            winner: match self.winners.as_slice() {
                [only] => id_of(*only),
                _ => None,
            },
            winners: ids(&self.winners),
            carry_over_pot: self.carry_over_pot,
            balance_deltas: self.balance_deltas.clone(),
            vote_countdown: self.voting.countdown,
            ready_players: ids(&self.voting.ready),
            vote_initiator_id: self.voting.initiator.and_then(id_of),
            ready_to_start_with_voted: self.state == GameState::VotingNewRound
                && self.can_start_with_ready(),
            start_confirmations: ids(&self.voting.confirmed),
            expose_result: self.expose_result.clone(),
            last_action: self.last_action.clone(),
            hand_history: self.history_lines(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The player whose decision the table waits on, in betting-capable states.
    pub fn current_player(&self) -> Option<&Player> {
        if self.state.is_betting_capable() {
            self.players.get(self.current)
        } else {
            None
        }
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn vara_pot(&self) -> u64 {
        self.vara.pot
    }

    pub fn carry_over_pot(&self) -> u64 {
        self.carry_over_pot
    }

    pub fn betting_round(&self) -> u8 {
        self.betting_round
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn players_acted(&self) -> usize {
        self.players_acted
    }

    pub fn dealer(&self) -> Option<&Player> {
        self.dealer.and_then(|d| self.players.get(d))
    }

    pub fn winners(&self) -> Vec<&Player> {
        self.winners.iter().filter_map(|&s| self.players.get(s)).collect()
    }

    pub fn expose_result(&self) -> Option<&ExposeResult> {
        self.expose_result.as_ref()
    }

    pub fn history_recent(&self, n: usize) -> Vec<HandHistoryEntry> {
        let start = self.hand_history.len().saturating_sub(n);
        self.hand_history[start..].to_vec()
    }

    /// One line per history entry, e.g. "Ann Raise to 20 [round 1]".
    pub fn history_lines(&self) -> Vec<String> {
        self.hand_history
            .iter()
            .map(|entry| {
                let amount = entry.amount.map(|v| format!(" {v}")).unwrap_or_default();
                format!(
                    "{} {}{} [round {}]",
                    self.players[entry.seat].name,
                    entry.verb.label(),
                    amount,
                    entry.betting_round
                )
            })
            .collect()
    }

    pub(crate) fn seat_of(&self, id: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| GameError::PlayerNotFound(id.to_string()))
    }

    /// Contending seats in turn order starting left of the dealer.
    pub(crate) fn contenders(&self) -> Vec<usize> {
        let n = self.players.len();
        ring_from(self.dealer.unwrap_or(0), n).filter(|&s| self.players[s].is_contending()).collect()
    }

    pub(crate) fn next_actor_from(&self, from: usize) -> Option<usize> {
        ring_from(from, self.players.len()).find(|&s| self.players[s].can_act())
    }

    /// Move chips from a stack into the pot as a bet.
    pub(crate) fn commit(&mut self, seat: usize, amount: u64) {
        let p = &mut self.players[seat];
        let amount = amount.min(p.chips);
        p.chips -= amount;
        p.current_bet += amount;
        p.total_bet += amount;
        if p.chips == 0 && p.status == PlayerStatus::Active {
            p.status = PlayerStatus::AllIn;
        }
        self.pot += amount;
        self.push_delta(seat, -(amount as i64));
    }

    pub(crate) fn credit(&mut self, seat: usize, amount: u64) {
        self.players[seat].chips += amount;
        self.push_delta(seat, amount as i64);
    }

    pub(crate) fn push_delta(&mut self, seat: usize, delta: i64) {
        if delta == 0 {
            return;
        }
        let player_id = self.players[seat].id.clone();
        self.balance_deltas.push(BalanceDelta { player_id, delta });
    }

    pub(crate) fn set_last_action(&mut self, seat: usize, action: &'static str, amount: u64) {
        let player_id = self.players[seat].id.clone();
        self.last_action = Some(LastAction { player_id, action, amount });
    }

    pub(crate) fn record_history(&mut self, seat: usize, verb: HandHistoryVerb, amount: Option<u64>) {
        let entry = HandHistoryEntry { seat, verb, amount, betting_round: self.betting_round };
        self.hand_history.push(entry);
    }

    pub(crate) fn arm_turn_timer(&mut self) {
        let after = self.settings.turn_timeout();
        self.timers.arm(TimerKind::Turn, after);
    }

    /// Publish a snapshot; delivered deltas leave the queue.
    pub(crate) fn notify(&mut self) {
        if let Some(observer) = self.observer.clone() {
            let snapshot = self.snapshot();
            self.balance_deltas.clear();
            observer.on_state_change(&snapshot);
        }
    }

    /// Fresh shuffled deck, three cards to every awake seat, one at a time from the dealer's left.
    pub(crate) fn deal(&mut self) {
        self.deck = Deck::seka();
        self.deck.shuffle_with(&mut self.rng);
        let n = self.players.len();
        let seats: Vec<usize> =
            ring_from(self.dealer.unwrap_or(0), n).filter(|&s| !self.players[s].sleeping).collect();
        let mut piles: Vec<Vec<Card>> = vec![Vec::with_capacity(HAND_SIZE); seats.len()];
        for _ in 0..HAND_SIZE {
            for pile in piles.iter_mut() {
                if let Some(card) = self.deck.draw() {
                    pile.push(card);
                }
            }
        }
        for (seat, pile) in seats.into_iter().zip(piles) {
            match Hand::from_slice(&pile) {
                Ok(hand) => self.players[seat].hand = Some(hand),
                Err(e) => log::error!("[{}] could not deal seat {seat}: {e}", self.game_id),
            }
        }
    }

    /// Ante, deal and open round 1 of a regular hand around `self.dealer`.
    pub(crate) fn begin_hand(&mut self) {
        self.round_id += 1;
        self.hand_history.clear();
        // deltas nobody drained belong to the previous hand
        self.balance_deltas.clear();
        self.winners.clear();
        self.last_action = None;
        self.expose_result = None;
        self.vara = VaraState::default();
        self.voting = VotingState::default();
        for p in self.players.iter_mut() {
            p.reset_for_hand();
        }

        self.pot += std::mem::take(&mut self.carry_over_pot);
        let ante = self.settings.ante;
        for seat in 0..self.players.len() {
            if self.players[seat].sleeping {
                continue;
            }
            let paid = ante.min(self.players[seat].chips);
            self.commit(seat, paid);
            self.record_history(seat, HandHistoryVerb::Ante, Some(paid));
        }

        self.deal();
        self.state = GameState::Betting;
        log::info!(
            "[{}] round {} dealt, dealer {:?}, pot {}",
            self.game_id,
            self.round_id,
            self.dealer().map(Player::id),
            self.pot
        );
        self.open_betting();
    }

    /// Reset betting counters and hand the first turn to the dealer's left.
    pub(crate) fn open_betting(&mut self) {
        self.betting_round = 1;
        self.players_acted = 0;
        self.current_bet = 0;
        self.last_raiser = None;
        for p in self.players.iter_mut() {
            if p.can_act() && p.chips == 0 {
                p.status = PlayerStatus::AllIn;
            }
        }
        if self.should_force_showdown() {
            self.showdown();
            return;
        }
        match self.next_actor_from(self.dealer.unwrap_or(0)) {
            Some(first) => {
                self.current = first;
                self.arm_turn_timer();
                self.notify();
            }
            None => self.showdown(),
        }
    }

    fn turn_expired(&mut self) {
        let seat = self.current;
        let id = self.players.get(seat).map(|p| p.id.clone()).unwrap_or_default();
        log::info!("[{}] turn timer expired for {id} in {}", self.game_id, self.state);
        let action = match self.state {
            GameState::Betting | GameState::Vara => Action::Fold,
            GameState::WaitingForVaraJoin => Action::RefuseVara,
            GameState::WinnerVaraChoice => Action::WinnerChoice(WinnerChoice::Collect),
            _ => return,
        };
        if let Err(e) = self.submit_action(&id, action) {
            log::error!("[{}] timeout {} for {id} failed: {e}", self.game_id, action.name());
        }
    }
}

#[cfg(test)]
mod tests;
