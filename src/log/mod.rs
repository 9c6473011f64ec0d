//! Logging and observability
//!
//! JSONL history of every panel transition in a session.

pub mod jsonl;

pub use jsonl::{TransitionLog, TransitionRecord};
