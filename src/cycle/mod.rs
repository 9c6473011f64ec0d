//! Cycle management
//!
//! This module handles cycle configuration, the cycle state machine and the
//! session driver that runs it on a timer.

pub mod config;
pub mod controller;
pub mod driver;
pub mod state;
