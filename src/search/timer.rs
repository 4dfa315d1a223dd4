use std::time::Duration;

/// Identifies one scheduled delayed task. A fire carrying a token that is no
/// longer held by its slot is stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// The delayed tasks a widget can hold at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Debounce,
    Inactivity,
}

/// Holds at most one pending delayed task of a given kind.
#[derive(Debug)]
pub struct TimerSlot {
    kind: TimerKind,
    delay: Duration,
    generation: u64,
    pending: Option<TimerToken>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind, delay: Duration) -> Self {
        Self {
            kind,
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a new task, returning its token and the token it replaced.
    pub fn arm(&mut self) -> (TimerToken, Option<TimerToken>) {
        self.generation += 1;
        let token = TimerToken(self.generation);
        let previous = self.pending.replace(token);
        (token, previous)
    }

    /// Drop the pending task, if any, returning its token.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take()
    }

    /// Consume a fire. Returns false for stale or already-cancelled tokens.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
