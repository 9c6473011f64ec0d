//! Terminal presenter
//!
//! Draws the active item and the selector row to stderr so stdout stays
//! clean for piping.

use std::time::Duration;

use colored::Colorize;

use crate::cycle::controller::{CycleSnapshot, Presenter};
use crate::cycle::state::{CyclePhase, MaxTransitions};
use crate::sequence::SequenceModel;

/// Presenter that prints each newly active item to the terminal
#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter {
    lead_zero: bool,
}

impl TerminalPresenter {
    /// Create a presenter; `lead_zero` pads selector labels 1-9.
    #[must_use]
    pub const fn new(lead_zero: bool) -> Self {
        Self { lead_zero }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, sequence: &SequenceModel, panel_index: usize, fade: Duration) {
        let Ok(panel) = sequence.panel_at(panel_index) else {
            return;
        };

        eprintln!(
            "\n{} {}",
            "===".bold().cyan(),
            format!("Item {panel_index}/{}", sequence.panel_count())
                .bold()
                .cyan()
        );
        eprintln!("{}", "─".repeat(50).dimmed());
        for line in panel.content.lines() {
            eprintln!("  {line}");
        }
        eprintln!(
            "\n  {}  {}",
            render_selector_row(sequence, panel_index, self.lead_zero),
            format!("(fade {}ms)", fade.as_millis()).dimmed()
        );
    }
}

/// Selector labels in order, paired with whether each is highlighted.
#[must_use]
pub fn selector_labels(
    sequence: &SequenceModel,
    active_index: usize,
    lead_zero: bool,
) -> Vec<(String, bool)> {
    sequence
        .selectors()
        .map(|s| (s.label(lead_zero), s.is_highlighted(Some(active_index))))
        .collect()
}

/// The selector row, current selector bracketed and bold.
#[must_use]
pub fn render_selector_row(
    sequence: &SequenceModel,
    active_index: usize,
    lead_zero: bool,
) -> String {
    selector_labels(sequence, active_index, lead_zero)
        .into_iter()
        .map(|(label, current)| {
            if current {
                format!("[{label}]").bold().to_string()
            } else {
                format!(" {label} ").dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short human-readable name for a phase.
#[must_use]
pub const fn phase_label(phase: CyclePhase) -> &'static str {
    match phase {
        CyclePhase::Running => "running",
        CyclePhase::ManuallyStopped => "stopped by selection",
        CyclePhase::LoopExhausted => "loop limit reached",
        CyclePhase::TornDown => "closed",
    }
}

/// Print the end-of-session summary to stderr.
pub fn render_summary(snapshot: &CycleSnapshot) {
    let active = snapshot
        .active_index
        .map_or_else(|| "none".to_string(), |i| i.to_string());
    let budget = match snapshot.max_transitions {
        MaxTransitions::Unbounded => "unbounded".to_string(),
        MaxTransitions::Bounded(max) => max.to_string(),
    };

    eprintln!("\n{}", "─".repeat(50).dimmed());
    eprintln!(
        "{} item {}/{} | {} automatic transitions (max {}) | {}",
        "Summary:".bold(),
        active,
        snapshot.panel_count,
        snapshot.completed_transitions,
        budget,
        phase_label(snapshot.phase)
    );
}
