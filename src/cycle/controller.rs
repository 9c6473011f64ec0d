//! Cycle controller
//!
//! Owns the [`CycleState`] of one presenter session and runs the advancement
//! protocol: timer-driven automatic advancement, manual override and teardown.
//!
//! The controller does not sleep. It hands out a [`Scheduled`] token for the
//! next advancement and the host fires it back with [`CycleController::fire`]
//! once the interval has elapsed. A firing whose token is no longer pending is
//! stale and changes nothing.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cycle::config::CycleOptions;
use crate::cycle::state::{next_index, CyclePhase, CycleState, MaxTransitions};
use crate::error::CycleError;
use crate::sequence::SequenceModel;

/// Receives visibility requests from the controller.
///
/// `present` is fire-and-forget: the controller never waits for the fade to
/// finish before scheduling the next advancement.
pub trait Presenter {
    /// Show the panel at `panel_index` (fading in over `fade`), hide the rest,
    /// and mark the selector at `panel_index` as current.
    fn present(&mut self, sequence: &SequenceModel, panel_index: usize, fade: Duration);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, sequence: &SequenceModel, panel_index: usize, fade: Duration) {
        (**self).present(sequence, panel_index, fade);
    }
}

/// Identifies one scheduled advancement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// A pending advancement the host must fire after `after` has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    /// Token to pass back to [`CycleController::fire`]
    pub token: TimerToken,
    /// Delay before firing
    pub after: Duration,
}

/// What caused a change of the active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// The cycle timer fired
    Auto,
    /// A selector was picked
    Manual,
}

/// A change of the active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Previously active index
    pub from: usize,
    /// Newly active index
    pub to: usize,
    /// Cause of the change
    pub trigger: Trigger,
    /// Automatic advancements performed so far, including this one
    pub completed_transitions: u64,
}

/// Why automatic advancement stopped for good
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A manual selection disabled auto-advance
    ManualOverride,
    /// The loop limit was reached
    LoopExhausted,
}

/// Result of firing a scheduled advancement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    /// The active panel moved; `next` is the following advancement, if any
    Advanced {
        /// The change that was made
        transition: Transition,
        /// Next scheduled advancement (`None` once the budget is spent)
        next: Option<Scheduled>,
    },
    /// Auto-advance stopped permanently; nothing more is scheduled
    Stopped(StopReason),
    /// The token was not pending (cancelled, superseded or torn down)
    Stale,
}

/// Point-in-time view of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    /// Lifecycle phase
    pub phase: CyclePhase,
    /// Active index (`None` for an empty sequence)
    pub active_index: Option<usize>,
    /// Whether auto-advance is still enabled
    pub auto_advance_enabled: bool,
    /// Automatic advancements performed
    pub completed_transitions: u64,
    /// Ceiling on automatic advancements
    pub max_transitions: MaxTransitions,
    /// Number of panels
    pub panel_count: usize,
}

/// Runs the cycle protocol for one presenter
pub struct CycleController<P> {
    sequence: SequenceModel,
    interval: Duration,
    fade: Duration,
    state: CycleState,
    presenter: P,
    pending: Option<TimerToken>,
    last_token: u64,
}

impl<P: Presenter> CycleController<P> {
    /// Initialize a session: validate options, present the start panel and
    /// schedule the first advancement.
    pub fn start(
        sequence: SequenceModel,
        options: &CycleOptions,
        presenter: P,
    ) -> Result<Self, CycleError> {
        let panel_count = sequence.panel_count();
        options.validate(panel_count)?;

        let active_index = (panel_count > 0).then_some(options.start_index);
        let max_transitions = MaxTransitions::for_sequence(options.loop_limit, panel_count);

        let mut controller = Self {
            sequence,
            interval: options.cycle_interval(),
            fade: options.fade_duration(),
            state: CycleState::new(active_index, options.auto_advance, max_transitions),
            presenter,
            pending: None,
            last_token: 0,
        };

        if let Some(index) = active_index {
            controller.present(index);
        }
        if controller.state.phase().is_running() {
            controller.schedule();
        }

        info!(
            panels = panel_count,
            start = ?active_index,
            max_transitions = ?max_transitions,
            phase = ?controller.state.phase(),
            "cycle started"
        );

        Ok(controller)
    }

    /// The advancement currently waiting to be fired, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Scheduled> {
        self.pending.map(|token| Scheduled {
            token,
            after: self.interval,
        })
    }

    /// Fire a scheduled advancement.
    pub fn fire(&mut self, token: TimerToken) -> Firing {
        if self.state.torn_down || self.pending != Some(token) {
            debug!(?token, "ignoring stale firing");
            return Firing::Stale;
        }
        self.pending = None;

        if !self.state.auto_advance_enabled {
            info!("auto-advance stopped by manual override");
            return Firing::Stopped(StopReason::ManualOverride);
        }

        let exhausted = self
            .state
            .max_transitions
            .is_exhausted(self.state.completed_transitions);
        // Not reached through `schedule`, which stops arming once the budget
        // is spent; an empty sequence never arms either.
        let Some(from) = self.state.active_index.filter(|_| !exhausted) else {
            info!(
                completed = self.state.completed_transitions,
                "auto-advance stopped: loop limit reached"
            );
            return Firing::Stopped(StopReason::LoopExhausted);
        };

        let to = next_index(from, self.sequence.panel_count());
        self.state.active_index = Some(to);
        self.state.completed_transitions += 1;
        self.present(to);

        let transition = Transition {
            from,
            to,
            trigger: Trigger::Auto,
            completed_transitions: self.state.completed_transitions,
        };
        debug!(from, to, completed = transition.completed_transitions, "advanced");

        let next = if self.state.phase().is_running() {
            Some(self.schedule())
        } else {
            info!(
                completed = self.state.completed_transitions,
                "auto-advance stopped: loop limit reached"
            );
            None
        };

        Firing::Advanced { transition, next }
    }

    /// Jump to `target` and permanently disable auto-advance.
    pub fn select_manually(&mut self, target: usize) -> Result<Transition, CycleError> {
        if self.state.torn_down {
            return Err(CycleError::SessionClosed);
        }
        self.sequence.selector_at(target)?;

        let from = self.state.active_index.unwrap_or(target);
        self.state.auto_advance_enabled = false;
        self.state.active_index = Some(target);
        self.present(target);

        info!(from, to = target, "manual selection");

        Ok(Transition {
            from,
            to: target,
            trigger: Trigger::Manual,
            completed_transitions: self.state.completed_transitions,
        })
    }

    /// Tear the session down. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state.torn_down {
            return;
        }
        self.pending = None;
        self.state.torn_down = true;
        info!(active = ?self.state.active_index, "cycle torn down");
    }

    /// Current state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            phase: self.state.phase(),
            active_index: self.state.active_index,
            auto_advance_enabled: self.state.auto_advance_enabled,
            completed_transitions: self.state.completed_transitions,
            max_transitions: self.state.max_transitions,
            panel_count: self.sequence.panel_count(),
        }
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> CyclePhase {
        self.state.phase()
    }

    /// Currently active index.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.state.active_index
    }

    /// The sequence being cycled.
    #[must_use]
    pub const fn sequence(&self) -> &SequenceModel {
        &self.sequence
    }

    /// The presenter receiving visibility requests.
    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    fn present(&mut self, index: usize) {
        self.presenter.present(&self.sequence, index, self.fade);
    }

    fn schedule(&mut self) -> Scheduled {
        self.last_token += 1;
        let token = TimerToken(self.last_token);
        self.pending = Some(token);
        Scheduled {
            token,
            after: self.interval,
        }
    }
}
