//! Funnel session state.
//!
//! A `FunnelState` is owned by exactly one session and only ever replaced by
//! the output of [`crate::engine::transition`].

use crate::{FunnelState, Screen};
use std::fmt;

impl Screen {
    /// Intake ends the funnel; no intent leaves it
    pub fn is_terminal(self) -> bool {
        self == Screen::Intake
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Decision => "decision",
            Screen::Catalog => "catalog",
            Screen::Quiz => "quiz",
            Screen::Recommendation => "recommendation",
            Screen::Intake => "intake",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FunnelState {
    /// Fresh state at session start: Decision screen, nothing selected or answered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_terminal(&self) -> bool {
        self.screen.is_terminal()
    }

    pub fn has_selection(&self) -> bool {
        self.selected_medication_id.is_some()
    }
}
