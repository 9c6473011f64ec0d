//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use std::time::Duration;

use crate::cycle::controller::Presenter;
use crate::sequence::SequenceModel;

/// Build a sequence of `n` panels with contents `"item 1"`, `"item 2"`, ...
#[must_use]
pub fn make_sequence(n: usize) -> SequenceModel {
    SequenceModel::from_contents((1..=n).map(|i| format!("item {i}")))
}

/// Presenter that records every request instead of drawing anything.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    /// Panel indices in the order they were presented
    pub indices: Vec<usize>,
    /// Fade durations, parallel to `indices`
    pub fades: Vec<Duration>,
}

impl RecordingPresenter {
    /// Indices presented so far.
    #[must_use]
    pub fn shown(&self) -> Vec<usize> {
        self.indices.clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, sequence: &SequenceModel, panel_index: usize, fade: Duration) {
        assert!(
            sequence.contains(panel_index),
            "presented index {panel_index} outside 1..={}",
            sequence.panel_count()
        );
        self.indices.push(panel_index);
        self.fades.push(fade);
    }
}
