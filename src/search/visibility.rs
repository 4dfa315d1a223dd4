use std::time::Duration;

use crate::search::timer::{TimerKind, TimerSlot, TimerToken};
use crate::search::widget::Effect;

/// Whether the result panel is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Where a pointer-down landed, relative to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Input,
    Panel,
    Outside,
}

/// Why the search state was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    OutsideClick,
    Inactivity,
    Explicit,
}

/// Tracks the pointer over the panel and owns the inactivity timer.
#[derive(Debug)]
pub struct VisibilityController {
    inactivity: TimerSlot,
    pointer_inside_panel: bool,
}

impl VisibilityController {
    pub fn new(inactivity: Duration) -> Self {
        Self {
            inactivity: TimerSlot::new(TimerKind::Inactivity, inactivity),
            pointer_inside_panel: false,
        }
    }

    pub fn pointer_inside_panel(&self) -> bool {
        self.pointer_inside_panel
    }

    pub fn is_armed(&self) -> bool {
        self.inactivity.is_armed()
    }

    pub fn pointer_entered(&mut self, effects: &mut Vec<Effect>) {
        self.pointer_inside_panel = true;
        self.disarm(effects);
    }

    pub fn pointer_left(&mut self) {
        self.pointer_inside_panel = false;
    }

    /// Arm, re-arm or disarm the inactivity timer for the current state.
    /// `restart` re-arms an already pending timer so the full timeout runs again.
    pub fn sync(
        &mut self,
        has_results: bool,
        query_is_empty: bool,
        restart: bool,
        effects: &mut Vec<Effect>,
    ) {
        let wanted = has_results && query_is_empty && !self.pointer_inside_panel;
        if !wanted {
            self.disarm(effects);
            return;
        }
        if self.inactivity.is_armed() && !restart {
            return;
        }
        let (token, previous) = self.inactivity.arm();
        if let Some(previous) = previous {
            effects.push(Effect::Cancel {
                kind: TimerKind::Inactivity,
                token: previous,
            });
        }
        tracing::debug!("Inactivity dismiss armed for {:?}", self.inactivity.delay());
        effects.push(Effect::Schedule {
            kind: TimerKind::Inactivity,
            token,
            after: self.inactivity.delay(),
        });
    }

    /// Consume an inactivity fire; false when it was cancelled or superseded.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        self.inactivity.fire(token)
    }

    pub fn disarm(&mut self, effects: &mut Vec<Effect>) {
        if let Some(token) = self.inactivity.cancel() {
            effects.push(Effect::Cancel {
                kind: TimerKind::Inactivity,
                token,
            });
        }
    }

    pub fn reset(&mut self, effects: &mut Vec<Effect>) {
        self.disarm(effects);
        self.pointer_inside_panel = false;
    }
}
