//! Presenter configuration parser
//!
//! Parses `newslist.toml` into cycle options, display options and the
//! ordered list of items.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CycleError;
use crate::sequence::SequenceModel;

/// How many full loops auto-advance runs before stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawLoopLimit", into = "RawLoopLimit")]
pub enum LoopLimit {
    /// Loop until a manual selection or teardown
    #[default]
    Unbounded,
    /// Stop after this many full loops
    Loops(u32),
}

impl LoopLimit {
    /// Interpret a signed loop count: negative means unbounded.
    #[must_use]
    pub fn from_signed(count: i64) -> Self {
        u32::try_from(count).map_or(Self::Unbounded, Self::Loops)
    }
}

impl fmt::Display for LoopLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Loops(n) => write!(f, "{n}"),
        }
    }
}

/// On-disk form of [`LoopLimit`]: an integer or the word `"unbounded"`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawLoopLimit {
    Count(i64),
    Word(String),
}

impl TryFrom<RawLoopLimit> for LoopLimit {
    type Error = String;

    fn try_from(raw: RawLoopLimit) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawLoopLimit::Count(n) => {
                if n > i64::from(u32::MAX) {
                    Err(format!("loop_limit {n} is too large"))
                } else {
                    Ok(Self::from_signed(n))
                }
            }
            RawLoopLimit::Word(w) if w.eq_ignore_ascii_case("unbounded") => Ok(Self::Unbounded),
            RawLoopLimit::Word(w) => Err(format!(
                "invalid loop_limit '{w}': expected an integer or \"unbounded\""
            )),
        }
    }
}

impl From<LoopLimit> for RawLoopLimit {
    fn from(limit: LoopLimit) -> Self {
        match limit {
            LoopLimit::Unbounded => Self::Word("unbounded".to_string()),
            LoopLimit::Loops(n) => Self::Count(i64::from(n)),
        }
    }
}

/// Options controlling the cycle (the `[options]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOptions {
    /// Milliseconds between automatic advances (default: 10000)
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: i64,
    /// Milliseconds passed through to the presenter for the fade-in (default: 1000)
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: i64,
    /// Number of full loops before auto-advance stops (default: unbounded)
    #[serde(default)]
    pub loop_limit: LoopLimit,
    /// Index shown first (default: 1)
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    /// Whether auto-advance starts enabled (default: true)
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,
}

const fn default_cycle_interval_ms() -> i64 {
    10_000
}

const fn default_fade_duration_ms() -> i64 {
    1_000
}

const fn default_start_index() -> usize {
    1
}

const fn default_auto_advance() -> bool {
    true
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            cycle_interval_ms: default_cycle_interval_ms(),
            fade_duration_ms: default_fade_duration_ms(),
            loop_limit: LoopLimit::default(),
            start_index: default_start_index(),
            auto_advance: default_auto_advance(),
        }
    }
}

impl CycleOptions {
    /// Check the options against a sequence of `panel_count` panels.
    pub fn validate(&self, panel_count: usize) -> Result<(), CycleError> {
        if self.cycle_interval_ms < 0 {
            return Err(CycleError::invalid(format!(
                "cycle_interval_ms must not be negative (got {})",
                self.cycle_interval_ms
            )));
        }
        if self.fade_duration_ms < 0 {
            return Err(CycleError::invalid(format!(
                "fade_duration_ms must not be negative (got {})",
                self.fade_duration_ms
            )));
        }
        if panel_count > 0 && !(1..=panel_count).contains(&self.start_index) {
            return Err(CycleError::invalid(format!(
                "start_index {} is outside 1..={panel_count}",
                self.start_index
            )));
        }
        Ok(())
    }

    /// Interval between automatic advances.
    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms.max(0).unsigned_abs())
    }

    /// Fade duration handed to the presenter.
    #[must_use]
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms.max(0).unsigned_abs())
    }
}

/// Presentation options (the `[display]` table)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Pad selector labels 1-9 with a leading zero
    #[serde(default)]
    pub lead_zero: bool,
}

/// A single item definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Text shown while the item is active
    pub content: String,
}

/// Top-level configuration parsed from newslist.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsListConfig {
    /// Cycle options
    #[serde(default)]
    pub options: CycleOptions,
    /// Display options
    #[serde(default)]
    pub display: DisplayConfig,
    /// Items in display order
    #[serde(rename = "item", default)]
    pub items: Vec<ItemConfig>,
}

impl NewsListConfig {
    /// Parse and validate a newslist.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a newslist.toml file without validating it, so callers can
    /// apply overrides first and call [`Self::validate`] afterwards.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse_unchecked(&content)
    }

    /// Parse and validate newslist.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config = Self::parse_unchecked(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse newslist.toml content without validating it.
    pub fn parse_unchecked(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse newslist.toml")
    }

    /// Build the sequence model from the configured items.
    #[must_use]
    pub fn sequence(&self) -> SequenceModel {
        SequenceModel::from_contents(self.items.iter().map(|item| item.content.clone()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (i, item) in self.items.iter().enumerate() {
            if item.content.trim().is_empty() {
                bail!("Item {} has empty content", i + 1);
            }
        }

        self.options.validate(self.items.len())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
[options]
cycle_interval_ms = 5000
fade_duration_ms = 250
loop_limit = 2
start_index = 2
auto_advance = true

[display]
lead_zero = true

[[item]]
content = "News item #1."

[[item]]
content = "News item #2."

[[item]]
content = "News item #3."
"#;

    #[test]
    fn test_parse_valid_config() {
        let config = NewsListConfig::parse(VALID_CONFIG).unwrap();

        assert_eq!(config.items.len(), 3);
        assert_eq!(config.items[0].content, "News item #1.");
        assert_eq!(config.options.cycle_interval_ms, 5000);
        assert_eq!(config.options.fade_duration_ms, 250);
        assert_eq!(config.options.loop_limit, LoopLimit::Loops(2));
        assert_eq!(config.options.start_index, 2);
        assert!(config.display.lead_zero);
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let toml = r#"
[[item]]
content = "Only item"
"#;
        let config = NewsListConfig::parse(toml).unwrap();
        assert_eq!(config.options, CycleOptions::default());
        assert_eq!(config.options.cycle_interval(), Duration::from_secs(10));
        assert_eq!(config.options.fade_duration(), Duration::from_secs(1));
        assert_eq!(config.options.loop_limit, LoopLimit::Unbounded);
        assert!(config.options.auto_advance);
        assert!(!config.display.lead_zero);
    }

    #[test]
    fn test_empty_config_has_no_items() {
        let config = NewsListConfig::parse("").unwrap();
        assert!(config.items.is_empty());
        assert_eq!(config.sequence().panel_count(), 0);
    }

    #[test]
    fn test_negative_loop_limit_is_unbounded() {
        let toml = r#"
[options]
loop_limit = -1
"#;
        let config = NewsListConfig::parse(toml).unwrap();
        assert_eq!(config.options.loop_limit, LoopLimit::Unbounded);
    }

    #[test]
    fn test_unbounded_word_loop_limit() {
        let toml = r#"
[options]
loop_limit = "unbounded"
"#;
        let config = NewsListConfig::parse(toml).unwrap();
        assert_eq!(config.options.loop_limit, LoopLimit::Unbounded);
    }

    #[test]
    fn test_zero_loop_limit_is_bounded() {
        let toml = r#"
[options]
loop_limit = 0
"#;
        let config = NewsListConfig::parse(toml).unwrap();
        assert_eq!(config.options.loop_limit, LoopLimit::Loops(0));
    }

    #[test]
    fn test_reject_unknown_loop_limit_word() {
        let toml = r#"
[options]
loop_limit = "forever"
"#;
        assert!(NewsListConfig::parse(toml).is_err());
    }

    #[test]
    fn test_reject_negative_interval() {
        let toml = r#"
[options]
cycle_interval_ms = -5

[[item]]
content = "a"
"#;
        let err = NewsListConfig::parse(toml).unwrap_err();
        assert!(
            err.to_string().contains("cycle_interval_ms must not be negative"),
            "Expected interval error, got: {err}"
        );
    }

    #[test]
    fn test_reject_negative_fade() {
        let toml = r#"
[options]
fade_duration_ms = -1
"#;
        let err = NewsListConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("fade_duration_ms"));
    }

    #[test]
    fn test_zero_interval_is_valid() {
        let toml = r#"
[options]
cycle_interval_ms = 0

[[item]]
content = "a"
"#;
        let config = NewsListConfig::parse(toml).unwrap();
        assert_eq!(config.options.cycle_interval(), Duration::ZERO);
    }

    #[test]
    fn test_reject_start_index_past_end() {
        let toml = r#"
[options]
start_index = 3

[[item]]
content = "a"

[[item]]
content = "b"
"#;
        let err = NewsListConfig::parse(toml).unwrap_err();
        assert!(
            err.to_string().contains("start_index 3"),
            "Expected start_index error, got: {err}"
        );
    }

    #[test]
    fn test_reject_start_index_zero() {
        let toml = r#"
[options]
start_index = 0

[[item]]
content = "a"
"#;
        assert!(NewsListConfig::parse(toml).is_err());
    }

    #[test]
    fn test_reject_blank_item() {
        let toml = r#"
[[item]]
content = "a"

[[item]]
content = "   "
"#;
        let err = NewsListConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("Item 2 has empty content"));
    }

    #[test]
    fn test_reject_invalid_toml() {
        let err = NewsListConfig::parse("not valid toml {{{").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = NewsListConfig::from_path("/nonexistent/newslist.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_from_path_valid_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("newslist.toml");
        std::fs::write(&config_path, VALID_CONFIG).unwrap();

        let config = NewsListConfig::from_path(&config_path).unwrap();
        assert_eq!(config.items.len(), 3);
    }

    #[test]
    fn test_read_defers_validation() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("newslist.toml");
        std::fs::write(
            &config_path,
            r#"
[options]
start_index = 9

[[item]]
content = "a"
"#,
        )
        .unwrap();

        assert!(NewsListConfig::from_path(&config_path).is_err());

        let mut config = NewsListConfig::read(&config_path).unwrap();
        assert!(config.validate().is_err());
        config.options.start_index = 1;
        config.validate().unwrap();
    }

    #[test]
    fn test_read_still_rejects_malformed_toml() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("newslist.toml");
        std::fs::write(&config_path, "[[item]\n").unwrap();

        let err = NewsListConfig::read(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_sequence_follows_item_order() {
        let config = NewsListConfig::parse(VALID_CONFIG).unwrap();
        let seq = config.sequence();
        assert_eq!(seq.panel_count(), 3);
        assert_eq!(seq.panel_at(3).unwrap().content, "News item #3.");
    }

    #[test]
    fn test_loop_limit_from_signed() {
        assert_eq!(LoopLimit::from_signed(-1), LoopLimit::Unbounded);
        assert_eq!(LoopLimit::from_signed(0), LoopLimit::Loops(0));
        assert_eq!(LoopLimit::from_signed(4), LoopLimit::Loops(4));
    }

    #[test]
    fn test_loop_limit_display() {
        assert_eq!(LoopLimit::Unbounded.to_string(), "unbounded");
        assert_eq!(LoopLimit::Loops(3).to_string(), "3");
    }
}
