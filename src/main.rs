//! Newslist - rotating content presenter
//!
//! CLI entry point: cycles through the configured items in the terminal and
//! takes manual selections from stdin.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use newslist::cli::{render_summary, TerminalPresenter};
use newslist::cycle::config::{CycleOptions, LoopLimit, NewsListConfig};
use newslist::cycle::controller::CycleController;
use newslist::cycle::driver::spawn_session;
use newslist::log::TransitionLog;

/// Rotating content presenter
///
/// Shows one item at a time, advancing automatically until the loop limit
/// is reached or an item is picked by hand.
#[derive(Parser, Debug)]
#[command(name = "newslist", version, about)]
struct Cli {
    /// Path to the newslist.toml configuration file
    #[arg(long, default_value = "newslist.toml")]
    config: PathBuf,

    /// Directory for the transition history (.newslist by default)
    #[arg(long, default_value = ".newslist")]
    log_dir: PathBuf,

    /// Override the interval between automatic advances, in milliseconds
    #[arg(long, allow_hyphen_values = true)]
    interval_ms: Option<i64>,

    /// Override the number of full loops (negative = loop forever)
    #[arg(long, allow_hyphen_values = true)]
    loops: Option<i64>,

    /// Override the item shown first
    #[arg(long)]
    start: Option<usize>,
}

/// A line typed on stdin
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Select(usize),
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    line.parse()
        .map_or_else(|_| Input::Unknown(line.to_string()), Input::Select)
}

/// Apply command-line overrides on top of the file options.
fn apply_overrides(options: &mut CycleOptions, cli: &Cli) {
    if let Some(ms) = cli.interval_ms {
        options.cycle_interval_ms = ms;
    }
    if let Some(loops) = cli.loops {
        options.loop_limit = LoopLimit::from_signed(loops);
    }
    if let Some(start) = cli.start {
        options.start_index = start;
    }
}

/// Load the config file, apply command-line overrides, then validate once.
fn load_config(cli: &Cli) -> Result<NewsListConfig> {
    let mut config = NewsListConfig::read(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;
    apply_overrides(&mut config.options, cli);
    config
        .validate()
        .with_context(|| format!("Invalid configuration in '{}'", cli.config.display()))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli)?;

    let sequence = config.sequence();
    if sequence.panel_count() == 0 {
        eprintln!(
            "No items configured in '{}'; nothing to show.",
            cli.config.display()
        );
    }

    // Initialize
    let history = TransitionLog::new(&cli.log_dir).context("Failed to initialize history log")?;
    let presenter = TerminalPresenter::new(config.display.lead_zero);
    let controller = CycleController::start(sequence, &config.options, presenter)
        .context("Failed to start the cycle")?;
    let session = spawn_session(controller, Some(history));

    eprintln!(
        "{}",
        "Type an item number to select it, q to quit.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                match parse_input(&line) {
                    Input::Select(index) => {
                        if let Err(e) = session.select(index).await {
                            eprintln!("{} {e}", "Error:".red().bold());
                        }
                    }
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Unknown(text) => {
                        eprintln!("Unrecognized input '{text}': expected an item number or q");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let snapshot = session.stop().await?;
    render_summary(&snapshot);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("newslist").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_input_number() {
        assert_eq!(parse_input("3"), Input::Select(3));
        assert_eq!(parse_input("  12 \n"), Input::Select(12));
        assert_eq!(parse_input("0"), Input::Select(0));
    }

    #[test]
    fn test_parse_input_quit() {
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("QUIT"), Input::Quit);
    }

    #[test]
    fn test_parse_input_empty_and_unknown() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input("next"), Input::Unknown("next".to_string()));
        assert_eq!(parse_input("-1"), Input::Unknown("-1".to_string()));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.config, PathBuf::from("newslist.toml"));
        assert_eq!(cli.log_dir, PathBuf::from(".newslist"));
        assert!(cli.interval_ms.is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let cli = cli(&["--interval-ms", "500", "--loops", "-1", "--start", "2"]);
        let mut options = CycleOptions {
            loop_limit: LoopLimit::Loops(3),
            ..CycleOptions::default()
        };

        apply_overrides(&mut options, &cli);

        assert_eq!(options.cycle_interval_ms, 500);
        assert_eq!(options.loop_limit, LoopLimit::Unbounded);
        assert_eq!(options.start_index, 2);
    }

    fn write_config(dir: &tempfile::TempDir, options: &str) -> String {
        let path = dir.path().join("newslist.toml");
        let content = format!(
            r#"
[options]
{options}

[[item]]
content = "a"

[[item]]
content = "b"
"#
        );
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_override_replaces_invalid_start_index() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "start_index = 9");

        let config = load_config(&cli(&["--config", &path, "--start", "1"])).unwrap();
        assert_eq!(config.options.start_index, 1);

        let err = load_config(&cli(&["--config", &path])).unwrap_err();
        assert!(format!("{err:#}").contains("start_index 9"));
    }

    #[test]
    fn test_override_replaces_negative_interval() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "cycle_interval_ms = -5");

        let config = load_config(&cli(&["--config", &path, "--interval-ms", "1000"])).unwrap();
        assert_eq!(config.options.cycle_interval_ms, 1000);
    }

    #[test]
    fn test_override_can_introduce_invalid_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "");

        assert!(load_config(&cli(&["--config", &path, "--start", "3"])).is_err());
    }

    #[test]
    fn test_no_overrides_keep_file_options() {
        let cli = cli(&[]);
        let mut options = CycleOptions::default();
        apply_overrides(&mut options, &cli);
        assert_eq!(options, CycleOptions::default());
    }
}
