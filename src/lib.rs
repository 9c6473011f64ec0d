//! Newslist - rotating content presenter
//!
//! Newslist shows one item of a fixed list at a time, advancing on a timer
//! until a loop limit is reached or a manual selection takes over.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod cycle;
pub mod error;
pub mod log;
pub mod sequence;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use cli::TerminalPresenter;
pub use cycle::config::{CycleOptions, DisplayConfig, LoopLimit, NewsListConfig};
pub use cycle::controller::{
    CycleController, CycleSnapshot, Firing, Presenter, StopReason, Transition, Trigger,
};
pub use cycle::driver::{spawn_session, SessionHandle};
pub use cycle::state::{CyclePhase, MaxTransitions};
pub use error::CycleError;
pub use log::{TransitionLog, TransitionRecord};
pub use sequence::{Panel, Selector, SequenceModel};
