use super::{
    ExposeOutcome, ExposeResult, Game, GameError, GameState, HandHistoryVerb, PlayerStatus,
    TimerKind,
};
use crate::evaluator::{compare, evaluate};
use std::cmp::Ordering;

impl Game {
    pub(crate) fn fold(&mut self, seat: usize) {
        self.fold_seat(seat);
        self.players_acted += 1;
        self.set_last_action(seat, "fold", 0);
        self.record_history(seat, HandHistoryVerb::Fold, None);
        self.advance_betting();
    }

    /// Mark folded and hide the cards. Chips already bet stay in the pot.
    fn fold_seat(&mut self, seat: usize) {
        let p = &mut self.players[seat];
        p.status = PlayerStatus::Folded;
        p.hand = None;
    }

    pub(crate) fn call(&mut self, seat: usize) -> Result<(), GameError> {
        if self.current_bet == 0 {
            return Err(GameError::NoOpenBet);
        }
        let p = &self.players[seat];
        let owed = self.current_bet.saturating_sub(p.current_bet);
        let chips = p.chips;

        if owed == 0 {
            self.set_last_action(seat, "check", 0);
            self.record_history(seat, HandHistoryVerb::Check, None);
        } else if chips < owed {
            // short stack: all-in for what is left, the table bet stays
            self.commit(seat, chips);
            self.players[seat].status = PlayerStatus::AllIn;
            self.set_last_action(seat, "all-in", chips);
            self.record_history(seat, HandHistoryVerb::AllIn, Some(chips));
        } else {
            self.commit(seat, owed);
            self.set_last_action(seat, "call", owed);
            self.record_history(seat, HandHistoryVerb::Call, Some(owed));
        }
        self.players_acted += 1;
        self.advance_betting();
        Ok(())
    }

    /// `amount` is added to the player's current bet; the sum becomes the table bet.
    pub(crate) fn raise(&mut self, seat: usize, amount: u64) -> Result<(), GameError> {
        let (chips, bet) = (self.players[seat].chips, self.players[seat].current_bet);
        let min_target = if self.current_bet == 0 {
            self.settings.min_bet
        } else {
            self.current_bet + self.settings.min_raise
        };
        // the ante already counts toward the bet, but a raise must add chips
        let min_amount = min_target.saturating_sub(bet).max(1);
        if amount > chips {
            return Err(GameError::InvalidRaise { min: min_amount, max: chips, got: amount });
        }
        if amount == chips {
            return self.all_in(seat);
        }
        let target = bet + amount;
        if amount < min_amount {
            return Err(GameError::InvalidRaise { min: min_amount, max: chips, got: amount });
        }

        self.commit(seat, amount);
        self.current_bet = target;
        self.last_raiser = Some(seat);
        self.players_acted = 1;
        self.set_last_action(seat, "raise", amount);
        self.record_history(seat, HandHistoryVerb::RaiseTo, Some(target));
        self.advance_betting();
        Ok(())
    }

    pub(crate) fn all_in(&mut self, seat: usize) -> Result<(), GameError> {
        let p = &self.players[seat];
        let chips = p.chips;
        if chips == 0 {
            return Err(GameError::InsufficientFunds { needed: 1, available: 0 });
        }
        let total = p.current_bet + chips;

        self.commit(seat, chips);
        self.players[seat].status = PlayerStatus::AllIn;
        if total > self.current_bet {
            self.current_bet = total;
            self.last_raiser = Some(seat);
            self.players_acted = 1;
        } else {
            self.players_acted += 1;
        }
        self.set_last_action(seat, "all-in", chips);
        self.record_history(seat, HandHistoryVerb::AllIn, Some(chips));
        self.advance_betting();
        Ok(())
    }

    /// Pay the fee and compare hands with the next player able to act.
    pub(crate) fn expose(&mut self, seat: usize) -> Result<(), GameError> {
        if self.betting_round < 2 {
            return Err(GameError::IllegalState {
                state: self.state,
                operation: "expose before betting round 2",
            });
        }
        let fee = self.settings.expose_fee();
        let chips = self.players[seat].chips;
        if chips < fee {
            return Err(GameError::InsufficientFunds { needed: fee, available: chips });
        }
        let target = self
            .next_actor_from(seat)
            .filter(|&t| t != seat)
            .ok_or(GameError::NoExposeTarget)?;
        let (Some(own), Some(theirs)) = (self.players[seat].hand, self.players[target].hand) else {
            return Err(GameError::NoExposeTarget);
        };

        let exposer = evaluate(&own);
        let exposed = evaluate(&theirs);
        self.players[seat].combination = Some(exposer);
        self.players[target].combination = Some(exposed);

        let outcome = match compare(&exposer, &exposed) {
            Ordering::Greater => ExposeOutcome::ExposerWins,
            Ordering::Less => ExposeOutcome::ExposedWins,
            Ordering::Equal if self.contenders().len() == 2 => ExposeOutcome::TieVara,
            // house rule: the player who forced the reveal loses the tie
            Ordering::Equal => ExposeOutcome::TieExposerFolds,
        };
        log::info!(
            "[{}] {} exposes {}: {} vs {} -> {outcome:?}",
            self.game_id,
            self.players[seat].id,
            self.players[target].id,
            exposer.summary(),
            exposed.summary()
        );

        self.expose_result = Some(ExposeResult {
            exposer_id: self.players[seat].id.clone(),
            exposed_id: self.players[target].id.clone(),
            exposer_combination: exposer.summary(),
            exposed_combination: exposed.summary(),
            outcome,
        });
        let display = self.settings.expose_display();
        self.timers.arm(TimerKind::ExposeResult, display);
        self.set_last_action(seat, "expose", fee);

        if outcome == ExposeOutcome::TieVara {
            // no loser: the fee is waived and the whole pot seeds Vara
            self.record_history(seat, HandHistoryVerb::Expose, Some(0));
            self.initiate_vara(seat, Some(target), seat);
            return Ok(());
        }

        self.pay_fee(seat, fee);
        self.record_history(seat, HandHistoryVerb::Expose, Some(fee));
        match outcome {
            ExposeOutcome::ExposerWins => self.fold_seat(target),
            _ => self.fold_seat(seat),
        }
        self.players_acted += 1;
        self.notify();
        self.advance_betting();
        Ok(())
    }

    /// Fee into the pot without counting toward the player's bet.
    fn pay_fee(&mut self, seat: usize, fee: u64) {
        let p = &mut self.players[seat];
        p.chips -= fee;
        p.total_bet += fee;
        if p.chips == 0 && p.status == PlayerStatus::Active {
            p.status = PlayerStatus::AllIn;
        }
        self.pot += fee;
        self.push_delta(seat, -(fee as i64));
    }

    /// Completion pipeline run after every betting action.
    pub(crate) fn advance_betting(&mut self) {
        self.timers.cancel(TimerKind::Turn);
        match self.contenders().as_slice() {
            [] => return self.showdown(),
            [winner] => return self.win_uncontested(*winner),
            _ => {}
        }
        if self.should_force_showdown() {
            return self.showdown();
        }
        if self.round_complete() {
            if self.betting_round >= 2 {
                return self.showdown();
            }
            self.betting_round = 2;
            self.players_acted = 0;
            self.last_raiser = None;
            log::debug!("[{}] betting round 2, table bet {}", self.game_id, self.current_bet);
        }
        match self.next_actor_from(self.current) {
            Some(next) => {
                self.current = next;
                self.arm_turn_timer();
                self.notify();
            }
            None => self.showdown(),
        }
    }

    /// Nobody is left to bet against: every contender but at most one is all-in
    /// and that one has matched the table bet.
    pub(crate) fn should_force_showdown(&self) -> bool {
        let contenders = self.contenders();
        let all_in = contenders
            .iter()
            .filter(|&&s| self.players[s].status == PlayerStatus::AllIn)
            .count();
        let acting: Vec<usize> =
            contenders.into_iter().filter(|&s| self.players[s].can_act()).collect();
        all_in > 0
            && match acting.as_slice() {
                [] => true,
                [only] => self.players[*only].current_bet >= self.current_bet,
                _ => false,
            }
    }

    /// Everyone able to act has matched and acted since the last raise.
    /// All-in players cannot add chips and never hold the round open.
    pub(crate) fn round_complete(&self) -> bool {
        let acting: Vec<u64> = self
            .players
            .iter()
            .filter(|p| p.can_act())
            .map(|p| p.current_bet)
            .collect();
        let Some(&first) = acting.first() else {
            return true;
        };
        let target = if self.current_bet == 0 { first } else { self.current_bet };
        acting.iter().all(|&bet| bet == target) && self.players_acted >= acting.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameSettings;
    use crate::game::{Action, Game, GameError, GameState, PlayerStatus};

    fn started(n: usize) -> Game {
        let mut g = Game::new("t", GameSettings { seed: Some(3), ..GameSettings::default() })
            .expect("valid settings");
        for i in 0..n {
            g.add_player(format!("p{i}"), format!("P{i}")).unwrap();
        }
        g.start_game().unwrap();
        g
    }

    fn current_id(g: &Game) -> String {
        g.current_player().unwrap().id().to_string()
    }

    #[test]
    fn call_without_open_bet_is_rejected_atomically() {
        let mut g = started(3);
        let pot = g.pot();
        let id = current_id(&g);
        assert_eq!(g.submit_action(&id, Action::Call), Err(GameError::NoOpenBet));
        assert_eq!(g.pot(), pot);
        assert_eq!(current_id(&g), id);
    }

    #[test]
    fn raise_below_minimum_and_over_stack_fail() {
        let mut g = started(2);
        let id = current_id(&g);
        assert!(matches!(
            g.submit_action(&id, Action::Raise(0)),
            Err(GameError::InvalidRaise { got: 0, .. })
        ));
        assert!(matches!(
            g.submit_action(&id, Action::Raise(5000)),
            Err(GameError::InvalidRaise { max: 990, .. })
        ));
        assert_eq!(g.players_acted(), 0);
    }

    #[test]
    fn reraise_must_clear_min_raise() {
        let mut g = started(3);
        let a = current_id(&g);
        g.submit_action(&a, Action::Raise(50)).unwrap();
        assert_eq!(g.current_bet(), 60);
        let b = current_id(&g);
        // 10 already in from the ante; target must reach 70
        assert!(matches!(
            g.submit_action(&b, Action::Raise(55)),
            Err(GameError::InvalidRaise { min: 60, .. })
        ));
        g.submit_action(&b, Action::Raise(60)).unwrap();
        assert_eq!(g.current_bet(), 70);
        assert_eq!(g.players_acted(), 1);
    }

    #[test]
    fn whole_stack_raise_becomes_all_in() {
        let mut g = started(2);
        let id = current_id(&g);
        g.submit_action(&id, Action::Raise(990)).unwrap();
        let p = g.player(&id).unwrap();
        assert_eq!(p.status(), PlayerStatus::AllIn);
        assert_eq!(p.chips(), 0);
        assert_eq!(g.current_bet(), 1000);
    }

    #[test]
    fn all_in_with_empty_stack_is_rejected() {
        let mut g = started(2);
        let id = current_id(&g);
        let seat = g.seat_of(&id).unwrap();
        g.players[seat].chips = 0;
        assert_eq!(
            g.submit_action(&id, Action::AllIn),
            Err(GameError::InsufficientFunds { needed: 1, available: 0 })
        );
    }

    #[test]
    fn expose_in_first_round_is_illegal() {
        let mut g = started(2);
        let id = current_id(&g);
        assert!(matches!(
            g.submit_action(&id, Action::Expose),
            Err(GameError::IllegalState { state: GameState::Betting, .. })
        ));
    }

    #[test]
    fn lone_actor_must_answer_an_all_in_raise() {
        let mut g = started(2);
        let a = current_id(&g);
        g.submit_action(&a, Action::AllIn).unwrap();
        assert_eq!(g.state(), GameState::Betting, "the other player still owes chips");
        let b = current_id(&g);
        assert_ne!(a, b);
        g.submit_action(&b, Action::Call).unwrap();
        assert_eq!(g.state(), GameState::Showdown);
    }
}
