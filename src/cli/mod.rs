//! CLI output formatting
//!
//! Terminal rendering of the active item, the selector row and the
//! end-of-session summary.

pub mod display;

pub use display::render_summary;
pub use display::TerminalPresenter;
