use std::collections::HashMap;
use std::time::Duration;

/// Scheduled transitions a table needs from its runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TimerKind {
    /// Betting turn, Vara join decision or winner choice.
    Turn,
    /// Display pause after a hand resolves, before the next transition.
    RoundEnd,
    /// Clears the last expose result.
    ExposeResult,
    /// One-second tick of the next-hand countdown.
    VoteCountdown,
}

/// Instruction for the runtime. Arming a kind replaces any earlier timer of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Arm { kind: TimerKind, token: u64, after: Duration },
    Cancel { kind: TimerKind },
}

/// Armed timers keyed by kind. A fired timer only counts when its token is
/// still the armed one, so late or repeated deliveries are no-ops.
#[derive(Debug, Default)]
pub(crate) struct Timers {
    next_token: u64,
    armed: HashMap<TimerKind, u64>,
    outbox: Vec<TimerCommand>,
}

impl Timers {
    pub(crate) fn arm(&mut self, kind: TimerKind, after: Duration) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.armed.insert(kind, token);
        self.outbox.push(TimerCommand::Arm { kind, token, after });
        log::debug!("armed {kind:?} timer #{token} for {after:?}");
        token
    }

    pub(crate) fn cancel(&mut self, kind: TimerKind) {
        if let Some(token) = self.armed.remove(&kind) {
            self.outbox.push(TimerCommand::Cancel { kind });
            log::debug!("cancelled {kind:?} timer #{token}");
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        let kinds: Vec<TimerKind> = self.armed.keys().copied().collect();
        for kind in kinds {
            self.cancel(kind);
        }
    }

    /// Consume the armed timer if `token` matches it.
    pub(crate) fn claim(&mut self, kind: TimerKind, token: u64) -> bool {
        if self.armed.get(&kind) == Some(&token) {
            self.armed.remove(&kind);
            true
        } else {
            false
        }
    }

    pub(crate) fn token(&self, kind: TimerKind) -> Option<u64> {
        self.armed.get(&kind).copied()
    }

    pub(crate) fn drain(&mut self) -> Vec<TimerCommand> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_invalidates_the_old_token() {
        let mut t = Timers::default();
        let first = t.arm(TimerKind::Turn, Duration::from_secs(20));
        let second = t.arm(TimerKind::Turn, Duration::from_secs(20));
        assert!(!t.claim(TimerKind::Turn, first));
        assert!(t.claim(TimerKind::Turn, second));
        assert!(!t.claim(TimerKind::Turn, second), "a claimed timer cannot fire twice");
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut t = Timers::default();
        let token = t.arm(TimerKind::ExposeResult, Duration::from_secs(5));
        t.cancel(TimerKind::ExposeResult);
        t.cancel(TimerKind::ExposeResult);
        assert!(!t.claim(TimerKind::ExposeResult, token));
        let cmds = t.drain();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1], TimerCommand::Cancel { kind: TimerKind::ExposeResult });
        assert!(t.drain().is_empty());
    }
}
