//! Vara: the sudden-death side game that settles a tie.
//!
//! Tied players are seeded into the Vara, everyone else awake is asked in turn
//! order to buy in or refuse, and once all have decided the participants play
//! a fresh hand for the combined pot while the rest of the table sleeps.

use super::{Game, GameError, GameState, HandHistoryVerb, PlayerStatus, TimerKind, WinnerChoice};

#[derive(Debug, Clone, Default)]
pub(crate) struct VaraState {
    /// From initiation until the Vara hand resolves.
    pub(crate) in_progress: bool,
    pub(crate) pot: u64,
    /// Participants in joining order.
    pub(crate) players: Vec<usize>,
    pub(crate) initiator: Option<usize>,
    pub(crate) refused: Vec<usize>,
    /// What the offered winner put at stake by winning the last Vara hand.
    pub(crate) winner_stake: u64,
}

impl Game {
    /// Move the pot into Vara and start collecting join decisions after the initiator.
    pub(crate) fn initiate_vara(&mut self, first: usize, second: Option<usize>, initiator: usize) {
        self.timers.cancel(TimerKind::Turn);
        let mut players = vec![first];
        players.extend(second.filter(|&s| s != first));
        self.vara = VaraState {
            in_progress: true,
            pot: std::mem::take(&mut self.pot),
            players,
            initiator: Some(initiator),
            refused: Vec::new(),
            winner_stake: 0,
        };
        self.state = GameState::WaitingForVaraJoin;
        self.current_bet = 0;
        self.players_acted = 0;
        self.last_raiser = None;
        for (seat, p) in self.players.iter_mut().enumerate() {
            p.status = PlayerStatus::Active;
            p.current_bet = 0;
            p.total_bet = 0;
            p.in_vara = self.vara.players.contains(&seat);
        }
        log::info!(
            "[{}] Vara initiated by {} with pot {}",
            self.game_id,
            self.players[initiator].id,
            self.vara.pot
        );
        self.next_vara_decision(initiator);
    }

    /// Awake, holding chips, and neither joined nor refused.
    fn is_undecided(&self, seat: usize) -> bool {
        let p = &self.players[seat];
        !p.sleeping && p.chips > 0 && !p.in_vara && !self.vara.refused.contains(&seat)
    }

    fn next_vara_decision(&mut self, from: usize) {
        let n = self.players.len();
        match super::ring_from(from, n).find(|&s| self.is_undecided(s)) {
            Some(next) => {
                self.current = next;
                self.arm_turn_timer();
                self.notify();
            }
            None => self.start_vara_round(),
        }
    }

    pub(crate) fn vara_buy_in(&self) -> u64 {
        self.settings.vara_buy_in(self.vara.pot)
    }

    pub(crate) fn join_vara(&mut self, seat: usize, amount: u64) -> Result<(), GameError> {
        let required = self.vara_buy_in();
        let chips = self.players[seat].chips;
        if chips < required {
            return Err(GameError::InsufficientFunds { needed: required, available: chips });
        }
        if amount < required || amount > chips {
            return Err(GameError::InvalidRaise { min: required, max: chips, got: amount });
        }

        self.timers.cancel(TimerKind::Turn);
        self.players[seat].chips -= amount;
        self.players[seat].in_vara = true;
        self.push_delta(seat, -(amount as i64));
        self.vara.pot += amount;
        self.vara.players.push(seat);
        self.set_last_action(seat, "joinVara", amount);
        self.record_history(seat, HandHistoryVerb::JoinVara, Some(amount));
        self.next_vara_decision(seat);
        Ok(())
    }

    pub(crate) fn refuse_vara(&mut self, seat: usize) {
        self.timers.cancel(TimerKind::Turn);
        self.vara.refused.push(seat);
        self.set_last_action(seat, "refuseVara", 0);
        self.record_history(seat, HandHistoryVerb::RefuseVara, None);
        self.next_vara_decision(seat);
    }

    /// Deal the Vara hand to the participants; the rest of the table sleeps.
    fn start_vara_round(&mut self) {
        if self.vara.players.len() < 2 {
            return self.abandon_vara();
        }
        self.round_id += 1;
        self.pot += std::mem::take(&mut self.vara.pot);
        self.winners.clear();
        self.last_action = None;
        for p in self.players.iter_mut() {
            let joined = p.in_vara;
            p.reset_for_hand();
            p.in_vara = joined;
            p.sleeping = !joined;
        }
        self.dealer = self.vara.initiator;
        self.deal();
        self.state = GameState::Vara;
        log::info!(
            "[{}] Vara round {} dealt to {} players, pot {}",
            self.game_id,
            self.round_id,
            self.vara.players.len(),
            self.pot
        );
        self.open_betting();
    }

    /// Fewer than two participants: a lone one takes the Vara pot back, otherwise it carries over.
    fn abandon_vara(&mut self) {
        let pot = std::mem::take(&mut self.vara.pot);
        let sole = self.vara.players.first().copied();
        match sole {
            Some(seat) => self.credit(seat, pot),
            None => self.carry_over_pot += pot,
        }
        log::info!("[{}] Vara abandoned, {pot} returned", self.game_id);
        self.vara = VaraState::default();
        for p in self.players.iter_mut() {
            p.in_vara = false;
        }
        self.start_vote_new_round(sole);
    }

    /// Wrap up a Vara hand. A sole winner is offered another Vara for what they won.
    pub(crate) fn end_vara(&mut self, winner: Option<usize>, stake: u64) {
        self.timers.cancel(TimerKind::ExposeResult);
        self.expose_result = None;
        self.state = GameState::Betting;
        self.vara = VaraState::default();
        for p in self.players.iter_mut() {
            p.sleeping = false;
            p.in_vara = false;
        }
        match winner {
            Some(seat) => {
                self.vara.winner_stake = stake;
                self.state = GameState::WinnerVaraChoice;
                self.current = seat;
                self.arm_turn_timer();
                self.notify();
            }
            None => self.start_vote_new_round(None),
        }
    }

    pub(crate) fn winner_choice(&mut self, seat: usize, choice: WinnerChoice) {
        self.timers.cancel(TimerKind::Turn);
        match choice {
            WinnerChoice::Vara => {
                let stake = self.vara.winner_stake.min(self.players[seat].chips);
                self.players[seat].chips -= stake;
                self.push_delta(seat, -(stake as i64));
                self.pot += stake;
                self.set_last_action(seat, "winnerChoice", stake);
                self.initiate_vara(seat, None, seat);
            }
            WinnerChoice::Collect => {
                self.set_last_action(seat, "winnerChoice", 0);
                self.start_vote_new_round(Some(seat));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameSettings;
    use crate::game::{Action, Game, GameError, GameState, TimerKind, WinnerChoice};

    fn table(n: usize) -> Game {
        let mut g = Game::new("t", GameSettings { seed: Some(11), ..GameSettings::default() })
            .expect("valid settings");
        for i in 0..n {
            g.add_player(format!("p{i}"), format!("P{i}")).unwrap();
        }
        g.start_game().unwrap();
        g
    }

    fn total_chips(g: &Game) -> u64 {
        g.snapshot().chips_in_play()
    }

    #[test]
    fn join_and_refuse_then_deal_to_participants() {
        let mut g = table(3);
        let before = total_chips(&g);
        g.initiate_vara(0, Some(1), 0);
        assert_eq!(g.state(), GameState::WaitingForVaraJoin);
        assert_eq!(g.vara_pot(), 30);
        assert_eq!(g.current, 2, "only p2 has to decide");

        assert_eq!(
            g.submit_action("p2", Action::JoinVara(10)),
            Err(GameError::InvalidRaise { min: 15, max: 990, got: 10 })
        );
        g.submit_action("p2", Action::JoinVara(15)).unwrap();
        assert_eq!(g.state(), GameState::Vara);
        assert_eq!(g.pot(), 45);
        assert_eq!(g.vara_pot(), 0);
        assert!(g.players.iter().all(|p| p.hand.is_some()));
        assert_eq!(g.dealer, Some(0));
        assert_eq!(g.current, 1, "first turn after the initiator");
        assert_eq!(total_chips(&g), before);
    }

    #[test]
    fn refusers_sleep_through_the_vara_hand() {
        let mut g = table(3);
        g.initiate_vara(0, Some(1), 0);
        g.submit_action("p2", Action::Fold).unwrap();
        assert_eq!(g.state(), GameState::Vara);
        assert!(g.players[2].sleeping);
        assert!(g.players[2].hand.is_none());
        assert_eq!(g.pot(), 30);
    }

    #[test]
    fn lone_participant_takes_the_vara_pot_back() {
        let mut g = table(2);
        let before = total_chips(&g);
        g.initiate_vara(0, None, 0);
        assert_eq!(g.vara_pot(), 20);
        assert_eq!(g.current, 1);
        g.submit_action("p1", Action::RefuseVara).unwrap();
        assert_eq!(g.state(), GameState::VotingNewRound);
        assert_eq!(g.players[0].chips, 990 + 20);
        assert_eq!(g.vara_pot(), 0);
        assert_eq!(total_chips(&g), before);
    }

    #[test]
    fn vara_winner_can_stake_winnings_again() {
        let mut g = table(2);
        g.initiate_vara(0, Some(1), 0);
        assert_eq!(g.state(), GameState::Vara);
        let first = g.current_player().unwrap().id().to_string();
        g.submit_action(&first, Action::Fold).unwrap();
        let winner = g.winners[0];
        assert_eq!(g.state(), GameState::Showdown);
        assert!(g.fire_timer(TimerKind::RoundEnd));
        assert_eq!(g.state(), GameState::WinnerVaraChoice);
        assert_eq!(g.current, winner);

        let winner_id = g.players[winner].id.clone();
        g.submit_action(&winner_id, Action::WinnerChoice(WinnerChoice::Vara)).unwrap();
        assert_eq!(g.state(), GameState::WaitingForVaraJoin);
        assert_eq!(g.vara_pot(), 20);
        assert_eq!(g.vara.players, vec![winner]);
    }

    #[test]
    fn winner_choice_times_out_to_collect() {
        let mut g = table(2);
        g.initiate_vara(0, Some(1), 0);
        let first = g.current_player().unwrap().id().to_string();
        g.submit_action(&first, Action::Fold).unwrap();
        g.fire_timer(TimerKind::RoundEnd);
        assert_eq!(g.state(), GameState::WinnerVaraChoice);
        assert!(g.fire_timer(TimerKind::Turn));
        assert_eq!(g.state(), GameState::VotingNewRound);
    }

    #[test]
    fn new_round_from_a_vara_showdown_wakes_refusers() {
        let mut g = table(3);
        g.initiate_vara(0, Some(1), 0);
        g.submit_action("p2", Action::RefuseVara).unwrap();
        assert_eq!(g.state(), GameState::Vara);
        assert!(g.players[2].sleeping);

        g.players[1].chips = 0;
        assert_eq!(g.current, 1);
        g.submit_action("p1", Action::Fold).unwrap();
        assert_eq!(g.state(), GameState::Showdown);

        g.start_new_round().unwrap();
        assert_eq!(g.state(), GameState::Betting);
        assert!(!g.players[2].sleeping);
        assert!(g.players[2].hand.is_some());
        assert!(g.players[1].sleeping);
        assert!(g.players.iter().all(|p| !p.in_vara));
        assert_eq!(g.round_id(), 3);
    }

    #[test]
    fn buy_in_beyond_the_stack_changes_nothing() {
        let mut g = table(3);
        g.initiate_vara(0, Some(1), 0);
        g.players[2].chips = 14;
        let (pot, vara_pot, current) = (g.pot(), g.vara_pot(), g.current);
        assert_eq!(
            g.submit_action("p2", Action::JoinVara(15)),
            Err(GameError::InsufficientFunds { needed: 15, available: 14 })
        );
        assert_eq!((g.pot(), g.vara_pot(), g.current), (pot, vara_pot, current));
        assert_eq!(g.players[2].chips, 14);
        assert!(!g.players[2].in_vara);
        assert_eq!(g.state(), GameState::WaitingForVaraJoin);
    }
}
