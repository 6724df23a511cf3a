//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "opportunity-scout",
    version,
    about = "Search for opportunities and follow the search as it streams",
    long_about = "Search for opportunities against an Opportunity Scout backend.\n\n\
                  Progress steps stream in as the search runs; results can then be\n\
                  selected, saved, opened in the browser and exported as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides the config file).
    #[arg(long, env = "SCOUT_SERVER_URL", value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Read settings from this file instead of the platform config directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stream one search to completion, then act on its results.
    Search(SearchArgs),

    /// Interactive session: search repeatedly, select, save and export.
    Shell,

    /// Run one search without streaming and print the report.
    Once(OnceArgs),

    /// Check that the backend is reachable.
    Health,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search text. Multiple words are joined with spaces.
    #[arg(value_name = "QUERY", required = true)]
    pub query: Vec<String>,

    /// Select rows by number once the search settles (1-based, repeatable).
    #[arg(long = "select", value_name = "N", value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Select every result once the search settles.
    #[arg(long = "select-all", conflicts_with = "select")]
    pub select_all: bool,

    /// Add the selected results to the saved set.
    #[arg(long)]
    pub save: bool,

    /// Show and export only saved results.
    #[arg(long = "saved-only")]
    pub saved_only: bool,

    /// Open the selected sources in the browser.
    #[arg(long)]
    pub open: bool,

    /// Write the listed rows as CSV (default path from the config file).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Print the final report after the results.
    #[arg(long)]
    pub markdown: bool,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args)]
pub struct OnceArgs {
    /// Search text. Multiple words are joined with spaces.
    #[arg(value_name = "QUERY", required = true)]
    pub query: Vec<String>,

    /// Print the results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
