use super::{Game, GameState, HandHistoryVerb, TimerKind};
use crate::evaluator::evaluate;
use std::time::Duration;

/// What the table does once the round-end display pause is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingTransition {
    Vote { initiator: Option<usize> },
    Vara { first: usize, second: usize },
    EndVara { winner: Option<usize>, stake: u64 },
}

impl Game {
    /// Everyone else folded: the survivor takes the pot without a reveal.
    pub(crate) fn win_uncontested(&mut self, winner: usize) {
        self.timers.cancel(TimerKind::Turn);
        self.state = GameState::Showdown;
        let amount = std::mem::take(&mut self.pot);
        self.credit(winner, amount);
        self.winners = vec![winner];
        self.record_history(winner, HandHistoryVerb::Win, Some(amount));
        log::info!("[{}] {} wins {amount} uncontested", self.game_id, self.players[winner].id);
        self.notify();
        let delay = self.settings.fold_display();
        self.conclude(Some(winner), amount, delay);
    }

    pub(crate) fn showdown(&mut self) {
        self.timers.cancel(TimerKind::Turn);
        self.state = GameState::Showdown;
        self.last_action = None;

        let contenders = self.contenders();
        for &seat in &contenders {
            self.players[seat].combination = self.players[seat].hand.map(|h| evaluate(&h));
        }
        let best = contenders.iter().filter_map(|&s| self.players[s].combination).max();
        let winners: Vec<usize> = match best {
            Some(best) => contenders
                .into_iter()
                .filter(|&s| self.players[s].combination == Some(best))
                .collect(),
            None => Vec::new(),
        };
        self.winners = winners.clone();
        let delay = self.settings.showdown_display();

        match winners.as_slice() {
            [] => {
                log::warn!("[{}] showdown without contenders, pot carried over", self.game_id);
                self.carry_over_pot += std::mem::take(&mut self.pot);
                self.notify();
                self.conclude(None, 0, delay);
            }
            [winner] => {
                let winner = *winner;
                let amount = std::mem::take(&mut self.pot);
                self.credit(winner, amount);
                self.record_history(winner, HandHistoryVerb::Win, Some(amount));
                log::info!("[{}] {} wins {amount} at showdown", self.game_id, self.players[winner].id);
                if self.players[winner].combination.is_some_and(|c| c.pure_ace_seka) {
                    self.collect_seka_bonus(winner);
                }
                self.notify();
                self.conclude(Some(winner), amount, delay);
            }
            [first, second] => {
                // the pot stays whole and seeds Vara after the pause
                log::info!("[{}] two-way tie, Vara follows", self.game_id);
                self.notify();
                self.schedule(PendingTransition::Vara { first: *first, second: *second }, delay);
            }
            many => {
                let many = many.to_vec();
                let pot = std::mem::take(&mut self.pot);
                let share = pot / many.len() as u64;
                let remainder = pot % many.len() as u64;
                for (i, &seat) in many.iter().enumerate() {
                    let amount = if i == 0 { share + remainder } else { share };
                    self.credit(seat, amount);
                    self.record_history(seat, HandHistoryVerb::Split, Some(amount));
                }
                log::info!("[{}] pot {pot} split {} ways", self.game_id, many.len());
                self.notify();
                self.conclude(None, 0, delay);
            }
        }
    }

    /// Every other awake player pays the penalty to a pure Ace Seka, capped at their stack.
    fn collect_seka_bonus(&mut self, winner: usize) {
        let penalty = self.settings.seka_aces_penalty();
        for seat in 0..self.players.len() {
            if seat == winner || self.players[seat].sleeping {
                continue;
            }
            let paid = penalty.min(self.players[seat].chips);
            if paid == 0 {
                continue;
            }
            self.players[seat].chips -= paid;
            self.push_delta(seat, -(paid as i64));
            self.credit(winner, paid);
            self.record_history(seat, HandHistoryVerb::Bonus, Some(paid));
        }
    }

    /// After the pause: a Vara hand ends (possibly with an offer), a regular one goes to the vote.
    fn conclude(&mut self, winner: Option<usize>, won: u64, delay: Duration) {
        let next = if self.vara.in_progress {
            PendingTransition::EndVara { winner, stake: won }
        } else {
            PendingTransition::Vote { initiator: winner }
        };
        self.schedule(next, delay);
    }

    fn schedule(&mut self, next: PendingTransition, delay: Duration) {
        self.pending = Some(next);
        self.timers.arm(TimerKind::RoundEnd, delay);
    }

    pub(crate) fn run_pending(&mut self) {
        match self.pending.take() {
            Some(PendingTransition::Vote { initiator }) => self.start_vote_new_round(initiator),
            Some(PendingTransition::Vara { first, second }) => {
                self.initiate_vara(first, Some(second), first)
            }
            Some(PendingTransition::EndVara { winner, stake }) => self.end_vara(winner, stake),
            None => {}
        }
    }
}
