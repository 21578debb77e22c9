//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nowmeeting_core::OutputFormat;

/// nowmeeting - Meetings happening right now
#[derive(Debug, Parser)]
#[command(name = "nowmeeting")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "NOWMEETING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Output format flags ---
    /// Output in JSON format
    #[arg(long, group = "output_format")]
    pub json: bool,

    /// Output an HTML fragment
    #[arg(long, group = "output_format")]
    pub html: bool,

    // --- Input options ---
    /// Path to the meetings snapshot (overrides [data] path)
    #[arg(long, env = "NOWMEETING_DATA")]
    pub data: Option<PathBuf>,

    /// IANA timezone for the civil clock (overrides `timezone`)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Evaluate at this RFC 3339 instant instead of now
    #[arg(long, value_parser = parse_instant, conflicts_with = "watch")]
    pub at: Option<DateTime<Utc>>,

    // --- Display options ---
    /// Maximum title length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,

    /// Disable OSC8 hyperlinks in terminal output
    #[arg(long)]
    pub no_hyperlinks: bool,

    /// Keep running and re-render at every refresh boundary
    #[arg(long)]
    pub watch: bool,

    // --- Action flags ---
    /// Open the first current meeting's link in the default browser
    #[arg(long, conflicts_with = "watch")]
    pub open_link: bool,

    /// Copy the first current meeting's link to the clipboard
    #[arg(long, conflicts_with = "watch")]
    pub copy_link: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.html {
            OutputFormat::Html
        } else {
            OutputFormat::Tty
        }
    }

    /// Returns whether any action flag is set.
    pub fn has_action(&self) -> bool {
        self.open_link || self.copy_link
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download virtual meetings from BMLT into the snapshot
    #[cfg(feature = "bmlt")]
    Fetch {
        /// Where to write the snapshot (defaults to the data path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// BMLT root server to query (can be repeated, overrides [fetch] roots)
        #[arg(long, action = clap::ArgAction::Append)]
        root: Vec<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration and the meetings snapshot
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 instant like 2025-02-05T01:00:00Z: {}", e))
}
