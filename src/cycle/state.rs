//! Cycle state and loop arithmetic
//!
//! `CycleState` is the only mutable entity of a session. The helpers here are
//! pure so the controller and the property tests share one definition of the
//! wrap-around and loop-budget rules.

use serde::{Deserialize, Serialize};

use crate::cycle::config::LoopLimit;

/// Ceiling on the number of automatic advancements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum MaxTransitions {
    /// Advance until stopped by other means
    Unbounded,
    /// Advance at most this many times
    Bounded(u64),
}

impl MaxTransitions {
    /// Budget for `limit` full loops over `panel_count` panels.
    ///
    /// One loop is `N - 1` transitions. A sequence of one panel (or none)
    /// can never visibly advance, so its budget is always zero.
    #[must_use]
    pub fn for_sequence(limit: LoopLimit, panel_count: usize) -> Self {
        if panel_count <= 1 {
            return Self::Bounded(0);
        }
        match limit {
            LoopLimit::Unbounded => Self::Unbounded,
            LoopLimit::Loops(loops) => {
                let per_loop = (panel_count - 1) as u64;
                Self::Bounded(u64::from(loops).saturating_mul(per_loop))
            }
        }
    }

    /// Whether `completed` transitions use up the budget.
    #[must_use]
    pub const fn is_exhausted(self, completed: u64) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(max) => completed >= max,
        }
    }
}

/// Index following `current` in a sequence of `panel_count`, wrapping to 1.
#[must_use]
pub const fn next_index(current: usize, panel_count: usize) -> usize {
    let next = current + 1;
    if next > panel_count {
        1
    } else {
        next
    }
}

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Auto-advance is enabled and has budget left
    Running,
    /// A manual selection (or configuration) disabled auto-advance
    ManuallyStopped,
    /// The loop limit was reached
    LoopExhausted,
    /// The session was torn down
    TornDown,
}

impl CyclePhase {
    /// Whether automatic advancement can still happen in this phase.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Mutable state of one presenter session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    /// Currently visible panel; `None` only for an empty sequence
    pub active_index: Option<usize>,
    /// Cleared by a manual selection and never set again
    pub auto_advance_enabled: bool,
    /// Automatic advancements performed so far
    pub completed_transitions: u64,
    /// Fixed at initialization
    pub max_transitions: MaxTransitions,
    /// Set by teardown
    pub torn_down: bool,
}

impl CycleState {
    /// Fresh state for a session.
    #[must_use]
    pub const fn new(
        active_index: Option<usize>,
        auto_advance_enabled: bool,
        max_transitions: MaxTransitions,
    ) -> Self {
        Self {
            active_index,
            auto_advance_enabled,
            completed_transitions: 0,
            max_transitions,
            torn_down: false,
        }
    }

    /// Phase derived from the flags and counters.
    #[must_use]
    pub const fn phase(&self) -> CyclePhase {
        if self.torn_down {
            CyclePhase::TornDown
        } else if !self.auto_advance_enabled {
            CyclePhase::ManuallyStopped
        } else if self.max_transitions.is_exhausted(self.completed_transitions) {
            CyclePhase::LoopExhausted
        } else {
            CyclePhase::Running
        }
    }
}
