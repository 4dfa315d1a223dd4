//! The search-and-autocomplete widget core.
//!
//! `SearchWidget` is a synchronous state machine: the host feeds it
//! [`Event`]s in delivery order and carries out the [`Effect`]s it returns
//! (start or cancel a delayed task, issue a fetch). It never sleeps, spawns
//! or blocks, so every transition is deterministic and testable without a clock.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::search::debounce::{DebounceStep, Debouncer};
use crate::search::filter::{extends, filter_and_suggest, narrow};
use crate::search::record::SearchRecord;
use crate::search::timer::{TimerKind, TimerToken};
use crate::search::visibility::{DismissReason, Region, Visibility, VisibilityController};
use crate::service::{SearchError, SearchResponse};

/// Timing and length thresholds for one widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetConfig {
    pub debounce: Duration,
    pub inactivity: Duration,
    pub min_query_chars: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            inactivity: Duration::from_secs(7),
            min_query_chars: 3,
        }
    }
}

impl From<&SearchConfig> for WidgetConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            inactivity: config.inactivity(),
            min_query_chars: config.min_query_chars,
        }
    }
}

/// Everything the widget shows, owned by exactly one widget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Filtered records from the last successful fetch, server order
    pub raw_results: Vec<SearchRecord>,
    pub suggestion: String,
    /// Set by accepting a suggestion; shown instead of `raw_results` when non-empty
    pub narrowed_results: Vec<SearchRecord>,
    pub is_fetching: bool,
    pub pointer_inside_panel: bool,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// The user edited the input
    QueryTyped(String),
    DebounceElapsed(TimerToken),
    FetchCompleted {
        token: TimerToken,
        outcome: Result<SearchResponse, SearchError>,
    },
    /// The accept-suggestion key was pressed
    AcceptSuggestion,
    PointerEnteredPanel,
    PointerLeftPanel,
    PointerDown(Region),
    InactivityElapsed(TimerToken),
    Clear,
    Unmount,
}

/// Work the host must carry out on the widget's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver the matching `*Elapsed` event after `after`
    Schedule {
        kind: TimerKind,
        token: TimerToken,
        after: Duration,
    },
    /// Abort the delayed task holding `token`; it must not fire
    Cancel { kind: TimerKind, token: TimerToken },
    /// Look up `query` and deliver `Event::FetchCompleted` with `token`
    Fetch { token: TimerToken, query: String },
}

pub struct SearchWidget {
    state: SearchState,
    debouncer: Debouncer,
    visibility: VisibilityController,
    mounted: bool,
}

impl SearchWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            state: SearchState::default(),
            debouncer: Debouncer::new(config.debounce, config.min_query_chars),
            visibility: VisibilityController::new(config.inactivity),
            mounted: true,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn suggestion(&self) -> &str {
        &self.state.suggestion
    }

    pub fn is_fetching(&self) -> bool {
        self.state.is_fetching
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn visibility(&self) -> Visibility {
        if self.state.narrowed_results.is_empty() && self.state.raw_results.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    /// Records the panel renders: the narrowed set once a suggestion was
    /// accepted, otherwise the raw results.
    pub fn displayed_results(&self) -> &[SearchRecord] {
        if self.state.narrowed_results.is_empty() {
            &self.state.raw_results
        } else {
            &self.state.narrowed_results
        }
    }

    /// Ghost text for the input: what the user typed followed by the rest of
    /// the suggestion. `None` when there is nothing to complete.
    pub fn completion_hint(&self) -> Option<String> {
        if self.state.suggestion.is_empty() {
            return None;
        }
        let typed = self.state.query.chars().count();
        let rest: String = self.state.suggestion.chars().skip(typed).collect();
        Some(format!("{}{}", self.state.query, rest))
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        if !self.mounted {
            tracing::debug!("Ignoring {:?} after unmount", event);
            return Vec::new();
        }

        let mut effects = Vec::new();
        match event {
            Event::QueryTyped(query) => self.on_query_typed(query, &mut effects),
            Event::DebounceElapsed(token) => match self.debouncer.elapsed(token) {
                Some(query) => {
                    tracing::debug!("Fetching results for '{}'", query);
                    self.state.is_fetching = true;
                    effects.push(Effect::Fetch { token, query });
                }
                None => tracing::debug!("Stale debounce fire {:?}", token),
            },
            Event::FetchCompleted { token, outcome } => {
                self.on_fetch_completed(token, outcome, &mut effects)
            }
            Event::AcceptSuggestion => self.on_accept(&mut effects),
            Event::PointerEnteredPanel => {
                self.state.pointer_inside_panel = true;
                self.visibility.pointer_entered(&mut effects);
            }
            Event::PointerLeftPanel => {
                self.state.pointer_inside_panel = false;
                self.visibility.pointer_left();
                self.sync_inactivity(true, &mut effects);
            }
            Event::PointerDown(region) => {
                if region == Region::Outside && self.visibility() == Visibility::Visible {
                    self.dismiss(DismissReason::OutsideClick, &mut effects);
                }
            }
            Event::InactivityElapsed(token) => {
                if self.visibility.fire(token) {
                    self.dismiss(DismissReason::Inactivity, &mut effects);
                } else {
                    tracing::debug!("Stale inactivity fire {:?}", token);
                }
            }
            Event::Clear => self.dismiss(DismissReason::Explicit, &mut effects),
            Event::Unmount => {
                self.cancel_timers(&mut effects);
                self.mounted = false;
                tracing::debug!("Search widget unmounted");
            }
        }
        effects
    }

    fn on_query_typed(&mut self, query: String, effects: &mut Vec<Effect>) {
        let step = self.debouncer.on_query(&query);
        self.state.query = query;
        // Any fetch still running now belongs to a superseded query
        self.state.is_fetching = false;

        match step {
            DebounceStep::TooShort { cancelled } => {
                push_cancel(effects, TimerKind::Debounce, cancelled);
                self.state.raw_results.clear();
                self.state.suggestion.clear();
            }
            DebounceStep::Scheduled {
                token,
                after,
                cancelled,
            } => {
                push_cancel(effects, TimerKind::Debounce, cancelled);
                if !extends(&self.state.suggestion, &self.state.query) {
                    self.state.suggestion.clear();
                }
                effects.push(Effect::Schedule {
                    kind: TimerKind::Debounce,
                    token,
                    after,
                });
            }
        }
        self.sync_inactivity(true, effects);
    }

    fn on_fetch_completed(
        &mut self,
        token: TimerToken,
        outcome: Result<SearchResponse, SearchError>,
        effects: &mut Vec<Effect>,
    ) {
        let Some(query) = self.debouncer.complete(token) else {
            tracing::debug!("Discarding response for superseded fetch {:?}", token);
            return;
        };
        self.state.is_fetching = false;

        match outcome {
            Ok(response) if response.is_ok() => {
                let filtered = filter_and_suggest(&query, &response.records);
                tracing::debug!(
                    "'{}': {} fetched, {} kept, {} malformed, suggestion={:?}",
                    query,
                    response.records.len(),
                    filtered.records.len(),
                    response.skipped,
                    filtered.suggestion
                );
                self.state.raw_results = filtered.records;
                self.state.suggestion = filtered.suggestion;
                self.state.narrowed_results.clear();
            }
            Ok(response) => {
                tracing::warn!(
                    "Search for '{}' failed with status {}",
                    query,
                    response.status
                );
            }
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {}", query, e);
            }
        }
        self.sync_inactivity(false, effects);
    }

    fn on_accept(&mut self, effects: &mut Vec<Effect>) {
        if self.state.suggestion.is_empty() {
            return;
        }
        let accepted = std::mem::take(&mut self.state.suggestion);
        // Acceptance is local: drop any pending or running lookup instead of
        // letting it overwrite the narrowed set
        push_cancel(effects, TimerKind::Debounce, self.debouncer.reset());
        self.state.is_fetching = false;

        self.state.narrowed_results = narrow(&self.state.raw_results, &accepted);
        tracing::debug!(
            "Accepted suggestion '{}', {} records narrowed",
            accepted,
            self.state.narrowed_results.len()
        );
        self.state.query = accepted;
        self.sync_inactivity(false, effects);
    }

    /// Reset every field to its initial value. Safe to call repeatedly.
    fn dismiss(&mut self, reason: DismissReason, effects: &mut Vec<Effect>) {
        self.cancel_timers(effects);
        if self.state != SearchState::default() {
            tracing::debug!("Search dismissed: {:?}", reason);
        }
        self.state = SearchState::default();
    }

    fn cancel_timers(&mut self, effects: &mut Vec<Effect>) {
        push_cancel(effects, TimerKind::Debounce, self.debouncer.reset());
        self.visibility.reset(effects);
    }

    fn sync_inactivity(&mut self, restart: bool, effects: &mut Vec<Effect>) {
        let has_results = self.visibility() == Visibility::Visible;
        let query_is_empty = self.state.query.is_empty();
        self.visibility
            .sync(has_results, query_is_empty, restart, effects);
    }
}

fn push_cancel(effects: &mut Vec<Effect>, kind: TimerKind, token: Option<TimerToken>) {
    if let Some(token) = token {
        effects.push(Effect::Cancel { kind, token });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::record::fixtures::{reply, topic};

    fn widget() -> SearchWidget {
        SearchWidget::new(WidgetConfig::default())
    }

    fn scheduled(effects: &[Effect], kind: TimerKind) -> Option<TimerToken> {
        effects.iter().find_map(|e| match e {
            Effect::Schedule { kind: k, token, .. } if *k == kind => Some(*token),
            _ => None,
        })
    }

    /// Type a query, let the debounce fire and complete the fetch.
    fn search(w: &mut SearchWidget, query: &str, records: Vec<SearchRecord>) {
        let fx = w.handle(Event::QueryTyped(query.to_string()));
        let token = scheduled(&fx, TimerKind::Debounce).expect("debounce scheduled");
        let fx = w.handle(Event::DebounceElapsed(token));
        assert!(matches!(fx.as_slice(), [Effect::Fetch { .. }]));
        w.handle(Event::FetchCompleted {
            token,
            outcome: Ok(SearchResponse::ok(records)),
        });
    }

    #[test]
    fn typing_clears_fetching_flag_of_superseded_fetch() {
        let mut w = widget();
        let fx = w.handle(Event::QueryTyped("sonic".into()));
        let token = scheduled(&fx, TimerKind::Debounce).unwrap();
        w.handle(Event::DebounceElapsed(token));
        assert!(w.is_fetching());
        w.handle(Event::QueryTyped("sonics".into()));
        assert!(!w.is_fetching());
    }

    #[test]
    fn failed_fetch_keeps_previous_results() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);

        let fx = w.handle(Event::QueryTyped("sonic x".into()));
        let token = scheduled(&fx, TimerKind::Debounce).unwrap();
        w.handle(Event::DebounceElapsed(token));
        w.handle(Event::FetchCompleted {
            token,
            outcome: Err(SearchError::Transport("connection reset".into())),
        });
        assert!(!w.is_fetching());
        assert_eq!(w.state().raw_results.len(), 1);
    }

    #[test]
    fn non_200_keeps_previous_results() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);

        let fx = w.handle(Event::QueryTyped("sonicx".into()));
        let token = scheduled(&fx, TimerKind::Debounce).unwrap();
        w.handle(Event::DebounceElapsed(token));
        w.handle(Event::FetchCompleted {
            token,
            outcome: Ok(SearchResponse {
                status: 500,
                records: vec![topic(9, "sonicx")],
                skipped: 0,
            }),
        });
        assert_eq!(w.state().raw_results[0].id(), 1);
    }

    #[test]
    fn completion_hint_appends_rest_of_suggestion() {
        let mut w = widget();
        search(&mut w, "son", vec![topic(1, "SONiC Networking")]);
        assert_eq!(w.completion_hint().as_deref(), Some("soniC Networking"));
        w.handle(Event::AcceptSuggestion);
        assert_eq!(w.completion_hint(), None);
    }

    #[test]
    fn suggestion_survives_typing_that_still_matches_it() {
        let mut w = widget();
        search(&mut w, "son", vec![topic(1, "SONiC Networking")]);
        w.handle(Event::QueryTyped("sonic n".into()));
        assert_eq!(w.suggestion(), "SONiC Networking");
        assert_eq!(w.completion_hint().as_deref(), Some("sonic networking"));

        w.handle(Event::QueryTyped("bgp".into()));
        assert_eq!(w.suggestion(), "");
        assert_eq!(w.completion_hint(), None);
    }

    #[test]
    fn failed_fetch_does_not_revive_an_unrelated_suggestion() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);

        let fx = w.handle(Event::QueryTyped("bgp routing".into()));
        let token = scheduled(&fx, TimerKind::Debounce).unwrap();
        w.handle(Event::DebounceElapsed(token));
        w.handle(Event::FetchCompleted {
            token,
            outcome: Err(SearchError::Timeout(5000)),
        });
        assert_eq!(w.suggestion(), "");
        assert!(w.handle(Event::AcceptSuggestion).is_empty());
        assert_eq!(w.query(), "bgp routing");
    }

    #[test]
    fn accept_without_suggestion_is_ignored() {
        let mut w = widget();
        search(&mut w, "routing", vec![reply(2, 1, "bgp", "routing loops")]);
        assert_eq!(w.suggestion(), "");
        let before = w.state().clone();
        assert!(w.handle(Event::AcceptSuggestion).is_empty());
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn accept_cancels_pending_debounce() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);
        let fx = w.handle(Event::QueryTyped("sonic n".into()));
        let pending = scheduled(&fx, TimerKind::Debounce).unwrap();

        let fx = w.handle(Event::AcceptSuggestion);
        assert!(fx.contains(&Effect::Cancel {
            kind: TimerKind::Debounce,
            token: pending
        }));
        assert!(w.handle(Event::DebounceElapsed(pending)).is_empty());
    }

    #[test]
    fn pointer_down_inside_keeps_results() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);
        w.handle(Event::PointerDown(Region::Input));
        w.handle(Event::PointerDown(Region::Panel));
        assert_eq!(w.visibility(), Visibility::Visible);
    }

    #[test]
    fn unmount_cancels_pending_timers_and_ignores_later_events() {
        let mut w = widget();
        let fx = w.handle(Event::QueryTyped("sonic".into()));
        let token = scheduled(&fx, TimerKind::Debounce).unwrap();

        let fx = w.handle(Event::Unmount);
        assert_eq!(
            fx,
            vec![Effect::Cancel {
                kind: TimerKind::Debounce,
                token
            }]
        );
        assert!(!w.is_mounted());
        assert!(w.handle(Event::DebounceElapsed(token)).is_empty());
        assert!(w.handle(Event::QueryTyped("other".into())).is_empty());
    }

    #[test]
    fn fresh_results_replace_a_previous_narrowing() {
        let mut w = widget();
        search(&mut w, "sonic", vec![topic(1, "SONiC Networking")]);
        w.handle(Event::AcceptSuggestion);
        assert_eq!(w.state().narrowed_results.len(), 1);

        search(&mut w, "observ", vec![topic(5, "Observability")]);
        assert!(w.state().narrowed_results.is_empty());
        assert_eq!(w.displayed_results()[0].id(), 5);
    }
}
