//! Query debouncing.
//!
//! Every typed change supersedes the previous one: the pending quiet-period
//! timer is replaced and any fetch already in flight stops being current, so
//! its response is dropped when it arrives.

use std::time::Duration;

use crate::search::timer::{TimerKind, TimerSlot, TimerToken};

/// What a query change asks of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceStep {
    /// Query is below the minimum length: nothing is scheduled and results
    /// should be cleared right away
    TooShort { cancelled: Option<TimerToken> },
    /// A fetch is scheduled after the quiet period
    Scheduled {
        token: TimerToken,
        after: Duration,
        cancelled: Option<TimerToken>,
    },
}

#[derive(Debug)]
pub struct Debouncer {
    slot: TimerSlot,
    min_query_chars: usize,
    /// Query waiting for the quiet period to elapse
    pending_query: Option<String>,
    /// Fetch issued for this token and query, awaiting completion
    in_flight: Option<(TimerToken, String)>,
}

impl Debouncer {
    pub fn new(delay: Duration, min_query_chars: usize) -> Self {
        Self {
            slot: TimerSlot::new(TimerKind::Debounce, delay),
            min_query_chars,
            pending_query: None,
            in_flight: None,
        }
    }

    pub fn on_query(&mut self, query: &str) -> DebounceStep {
        let cancelled = self.slot.cancel();
        self.pending_query = None;
        self.in_flight = None;

        if query.chars().count() < self.min_query_chars {
            return DebounceStep::TooShort { cancelled };
        }

        let (token, _) = self.slot.arm();
        self.pending_query = Some(query.to_string());
        DebounceStep::Scheduled {
            token,
            after: self.slot.delay(),
            cancelled,
        }
    }

    /// The quiet period for `token` elapsed. Returns the query to fetch, or
    /// `None` if the token was superseded.
    pub fn elapsed(&mut self, token: TimerToken) -> Option<String> {
        if !self.slot.fire(token) {
            return None;
        }
        let query = self.pending_query.take()?;
        self.in_flight = Some((token, query.clone()));
        Some(query)
    }

    /// A fetch finished. Returns the query it was issued for if it is still
    /// the current one.
    pub fn complete(&mut self, token: TimerToken) -> Option<String> {
        match self.in_flight.take() {
            Some((current, query)) if current == token => Some(query),
            other => {
                self.in_flight = other;
                None
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Forget the pending timer and any in-flight fetch.
    pub fn reset(&mut self) -> Option<TimerToken> {
        self.pending_query = None;
        self.in_flight = None;
        self.slot.cancel()
    }
}
