use super::*;
use std::sync::Mutex;

fn table(n: usize) -> Game {
    let mut g = Game::new("t", GameSettings { seed: Some(42), ..GameSettings::default() })
        .expect("valid settings");
    for i in 0..n {
        g.add_player(format!("p{i}"), format!("P{i}")).unwrap();
    }
    g.start_game().unwrap();
    g
}

fn act(g: &mut Game, action: Action) {
    let id = g.current_player().expect("someone to act").id().to_string();
    g.submit_action(&id, action).unwrap();
}

fn set_hand(g: &mut Game, seat: usize, cards: &str) {
    g.players[seat].hand = Some(cards.parse().expect("valid hand"));
}

#[test]
fn raise_call_closes_round_one() {
    let mut g = table(2);
    assert_eq!((g.pot(), g.current_bet(), g.current), (20, 0, 1));

    act(&mut g, Action::Raise(50));
    assert_eq!(g.players[1].chips, 940);
    assert_eq!((g.pot(), g.current_bet(), g.players_acted()), (70, 60, 1));

    act(&mut g, Action::Call);
    assert_eq!(g.players[0].chips, 940);
    assert_eq!(g.pot(), 120);
    assert_eq!(g.betting_round(), 2);
    assert_eq!(g.players_acted(), 0);
    assert_eq!(g.current_bet(), 60, "the table bet carries into round 2");
    assert_eq!(g.current, 1);
}

#[test]
fn under_call_goes_all_in_without_raising() {
    let mut g = table(3);
    g.players[2].chips = 5;
    act(&mut g, Action::Raise(40));
    act(&mut g, Action::Call);
    let short = &g.players[2];
    assert_eq!(short.status, PlayerStatus::AllIn);
    assert_eq!(short.chips, 0);
    assert_eq!(short.current_bet, 15);
    assert_eq!(g.current_bet(), 50);
    assert_eq!(g.current, 0, "the all-in player is skipped");

    act(&mut g, Action::Call);
    assert_eq!(g.betting_round(), 2);
    assert_eq!(g.state(), GameState::Betting);
}

#[test]
fn raise_reopens_the_round() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    act(&mut g, Action::Raise(20));
    assert_eq!(g.players_acted(), 1);
    assert_eq!(g.betting_round(), 1);
    act(&mut g, Action::Call);
    assert_eq!(g.betting_round(), 1, "p2 has not answered the re-raise");
    act(&mut g, Action::Call);
    assert_eq!(g.betting_round(), 2);
}

#[test]
fn fold_to_one_wins_instantly() {
    let mut g = table(2);
    act(&mut g, Action::Fold);
    assert_eq!(g.state(), GameState::Showdown);
    assert_eq!(g.players[0].chips, 1010);
    assert_eq!(g.pot(), 0);
    assert_eq!(g.snapshot().winner.as_deref(), Some("p0"));
    assert!(g.players[1].hand.is_none());
}

#[test]
fn expose_tie_between_two_starts_vara_without_fee() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Fold);
    act(&mut g, Action::Call);
    assert_eq!((g.betting_round(), g.current), (2, 1));
    set_hand(&mut g, 1, "As Kh Qd");
    set_hand(&mut g, 0, "Ac Kd Qh");
    let pot = g.pot();

    act(&mut g, Action::Expose);
    assert_eq!(g.state(), GameState::WaitingForVaraJoin);
    assert_eq!(g.vara_pot(), pot);
    assert_eq!(g.pot(), 0);
    let snap = g.snapshot();
    assert!(snap.vara_players.contains(&"p0".to_string()));
    assert!(snap.vara_players.contains(&"p1".to_string()));
    assert_eq!(snap.vara_initiator.as_deref(), Some("p1"));
    assert_eq!(snap.current_player_id.as_deref(), Some("p2"));
    assert_eq!(snap.expose_result.map(|r| r.outcome), Some(ExposeOutcome::TieVara));
}

/// House rule: with more than two players left the exposer loses a tie.
#[test]
fn expose_tie_among_three_folds_the_exposer() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    act(&mut g, Action::Call);
    set_hand(&mut g, 1, "As Kh Qd");
    set_hand(&mut g, 2, "Ac Kd Qh");
    let pot = g.pot();

    act(&mut g, Action::Expose);
    assert_eq!(g.players[1].status, PlayerStatus::Folded);
    assert_eq!(g.pot(), pot + 10);
    assert_eq!(g.players[1].current_bet, 20, "the fee is not a bet");
    assert_eq!(g.state(), GameState::Betting);
    assert_eq!(g.current, 2);
    let result = g.expose_result().cloned().unwrap();
    assert_eq!(result.outcome, ExposeOutcome::TieExposerFolds);
    assert_eq!(result.exposed_id, "p2");

    assert!(g.fire_timer(TimerKind::ExposeResult));
    assert!(g.expose_result().is_none());
}

#[test]
fn stronger_exposer_folds_the_target() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    act(&mut g, Action::Call);
    set_hand(&mut g, 1, "As Ah Ad");
    set_hand(&mut g, 2, "10c Jd Qh");

    act(&mut g, Action::Expose);
    assert_eq!(g.players[2].status, PlayerStatus::Folded);
    assert_eq!(g.players[1].status, PlayerStatus::Active);
    assert_eq!(g.players[1].chips, 1000 - 20 - 10);
}

#[test]
fn expose_fee_beyond_the_stack_changes_nothing() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    act(&mut g, Action::Call);
    assert_eq!((g.betting_round(), g.current), (2, 1));
    g.players[1].chips = 5;
    let pot = g.pot();

    assert_eq!(
        g.submit_action("p1", Action::Expose),
        Err(GameError::InsufficientFunds { needed: 10, available: 5 })
    );
    assert_eq!((g.pot(), g.current, g.players[1].chips), (pot, 1, 5));
    assert!(g.expose_result().is_none());
    assert!(g.players.iter().all(|p| p.status == PlayerStatus::Active));
}

#[test]
fn expose_without_anyone_left_to_act_is_rejected() {
    let mut g = table(3);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    act(&mut g, Action::Call);
    act(&mut g, Action::Fold);
    act(&mut g, Action::AllIn);
    assert_eq!((g.state(), g.betting_round(), g.current), (GameState::Betting, 2, 0));
    let (pot, chips) = (g.pot(), g.players[0].chips);

    assert_eq!(g.submit_action("p0", Action::Expose), Err(GameError::NoExposeTarget));
    assert_eq!((g.pot(), g.current, g.players[0].chips), (pot, 0, chips));
    assert!(g.expose_result().is_none());
    assert_eq!(g.players[0].status, PlayerStatus::Active);
}

#[test]
fn turn_timeout_folds_the_current_player() {
    let mut g = table(2);
    assert!(g.fire_timer(TimerKind::Turn));
    assert_eq!(g.players[1].status, PlayerStatus::Folded);
    assert_eq!(g.state(), GameState::Showdown);
}

#[test]
fn stale_turn_timer_is_ignored() {
    let mut g = table(2);
    let stale = g.timer_token(TimerKind::Turn).unwrap();
    act(&mut g, Action::Raise(10));
    assert!(!g.on_timer(TimerKind::Turn, stale));
    assert_eq!(g.state(), GameState::Betting);
    assert_eq!(g.current, 0);
    assert_eq!(g.players[0].status, PlayerStatus::Active);
}

#[test]
fn chips_are_conserved_through_a_hand() {
    let mut g = table(3);
    let total = g.snapshot().chips_in_play();
    assert_eq!(total, 3000);
    for action in [Action::Raise(30), Action::Call, Action::Raise(50), Action::Call, Action::Fold] {
        act(&mut g, action);
        assert_eq!(g.snapshot().chips_in_play(), total);
    }
    while g.state() == GameState::Betting {
        act(&mut g, Action::Call);
        assert_eq!(g.snapshot().chips_in_play(), total);
    }
    while g.fire_timer(TimerKind::RoundEnd) || g.fire_timer(TimerKind::Turn) {
        assert_eq!(g.snapshot().chips_in_play(), total);
        if g.state() == GameState::VotingNewRound {
            break;
        }
    }
    assert_eq!(g.snapshot().chips_in_play(), total);
}

#[test]
fn observer_receives_deltas_once() {
    let seen: Arc<Mutex<Vec<GameSnapshot>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let mut g = Game::new("obs", GameSettings { seed: Some(1), ..GameSettings::default() }).unwrap();
    g.set_observer(Arc::new(move |s: &GameSnapshot| sink.lock().unwrap().push(s.clone())));
    g.add_player("a", "A").unwrap();
    g.add_player("b", "B").unwrap();
    g.start_game().unwrap();

    let snaps = seen.lock().unwrap();
    let dealt = snaps.last().unwrap();
    assert_eq!(dealt.game_state, GameState::Betting);
    assert_eq!(dealt.balance_deltas.len(), 2);
    assert!(dealt.balance_deltas.iter().all(|d| d.delta == -10));
    drop(snaps);
    assert!(g.drain_balance_deltas().is_empty());
}

#[test]
fn deltas_queue_without_an_observer() {
    let mut g = table(2);
    let deltas = g.drain_balance_deltas();
    assert_eq!(deltas.len(), 2);
    act(&mut g, Action::Fold);
    assert_eq!(g.drain_balance_deltas(), vec![BalanceDelta { player_id: "p0".into(), delta: 20 }]);
}

#[test]
fn undrained_deltas_are_dropped_at_the_next_deal() {
    let mut g = table(2);
    act(&mut g, Action::Fold);
    assert!(g.fire_timer(TimerKind::RoundEnd));
    assert_eq!(g.state(), GameState::VotingNewRound);
    g.start_new_round().unwrap();

    let deltas = g.drain_balance_deltas();
    assert_eq!(deltas.len(), 2, "only this hand's antes");
    assert!(deltas.iter().all(|d| d.delta == -10));
}

#[test]
fn dispatch_rejects_out_of_phase_actions() {
    let mut g = table(2);
    assert_eq!(g.submit_action("p0", Action::Fold), Err(GameError::NotYourTurn));
    assert_eq!(
        g.submit_action("nobody", Action::Fold),
        Err(GameError::PlayerNotFound("nobody".into()))
    );
    assert_eq!(
        g.submit_action("p1", Action::JoinVara(10)),
        Err(GameError::IllegalState { state: GameState::Betting, operation: "joinVara" })
    );
    assert_eq!(
        g.submit_action("p1", Action::WinnerChoice(WinnerChoice::Collect)),
        Err(GameError::IllegalState { state: GameState::Betting, operation: "winnerChoice" })
    );
    act(&mut g, Action::Fold);
    assert_eq!(
        g.submit_action("p0", Action::Call),
        Err(GameError::NotYourTurn),
        "nobody holds the turn during showdown"
    );
}

#[test]
fn lobby_rules() {
    let mut g = Game::new("lobby", GameSettings::default()).unwrap();
    g.add_player("a", "A").unwrap();
    assert_eq!(g.start_game().unwrap_err(), GameError::InsufficientPlayers { min: 2, have: 1 });
    assert_eq!(g.add_player("a", "A2").unwrap_err(), GameError::DuplicatePlayer("a".into()));
    for i in 1..7 {
        g.add_player(format!("p{i}"), "x").unwrap();
    }
    assert_eq!(g.add_player("p8", "x").unwrap_err(), GameError::CapacityExceeded { max: 7 });
    g.start_game().unwrap();
    assert_eq!(g.start_game().unwrap_err(), GameError::AlreadyStarted);
    assert_eq!(g.add_player("late", "x").unwrap_err(), GameError::AlreadyStarted);
}

#[test]
fn action_parse_covers_transport_kinds() {
    assert_eq!(Action::parse("fold", None).unwrap(), Action::Fold);
    assert_eq!(Action::parse("allin", None).unwrap(), Action::AllIn);
    assert_eq!(Action::parse("joinVara", Some("25")).unwrap(), Action::JoinVara(25));
    assert_eq!(
        Action::parse("winnerChoice", Some("vara")).unwrap(),
        Action::WinnerChoice(WinnerChoice::Vara)
    );
    assert!(matches!(Action::parse("raise", Some("lots")), Err(GameError::UnknownAction(_))));
    assert!(matches!(Action::parse("winnerChoice", None), Err(GameError::UnknownAction(_))));
}

#[test]
fn history_records_the_hand() {
    let mut g = table(2);
    act(&mut g, Action::Raise(10));
    act(&mut g, Action::Call);
    let recent = g.history_recent(2);
    assert_eq!(recent[0].verb, HandHistoryVerb::RaiseTo);
    assert_eq!(recent[0].amount, Some(20));
    assert_eq!(recent[1].verb, HandHistoryVerb::Call);
    let lines = g.snapshot().hand_history;
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "P0 Ante 10 [round 1]");
    assert_eq!(lines[2], "P1 Raise to 20 [round 1]");
}
