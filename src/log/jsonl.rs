//! JSONL (JSON Lines) history of panel transitions
//!
//! Provides append-only logging of transitions to `<log_dir>/history.jsonl`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::cycle::controller::{Transition, Trigger};

/// One logged change of the active panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionRecord {
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
    /// Timer firing or manual selection
    pub trigger: Trigger,
    /// Previously active index
    pub from: usize,
    /// Newly active index
    pub to: usize,
    /// Automatic advancements performed so far
    pub completed_transitions: u64,
}

impl TransitionRecord {
    /// Stamp a transition with the current time.
    #[must_use]
    pub fn now(transition: &Transition) -> Self {
        Self {
            timestamp: Utc::now(),
            trigger: transition.trigger,
            from: transition.from,
            to: transition.to,
            completed_transitions: transition.completed_transitions,
        }
    }
}

/// JSONL log of transitions
///
/// Each line is a JSON object representing a single [`TransitionRecord`].
#[derive(Debug)]
pub struct TransitionLog {
    log_path: PathBuf,
}

impl TransitionLog {
    /// Create a new transition log
    ///
    /// # Arguments
    /// * `log_dir` - Directory where history.jsonl will be stored (typically `.newslist`)
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        Ok(Self {
            log_path: log_dir.join("history.jsonl"),
        })
    }

    /// Append a record to the log
    pub fn append(&self, record: &TransitionRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;

        let json =
            serde_json::to_string(record).context("Failed to serialize transition to JSON")?;

        writeln!(file, "{json}").context("Failed to write to log file")?;

        Ok(())
    }

    /// Read all records from the log, in chronological order
    pub fn read_all(&self) -> Result<Vec<TransitionRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file: {}", self.log_path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))
            })
            .collect()
    }

    /// Get the path to the log file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
