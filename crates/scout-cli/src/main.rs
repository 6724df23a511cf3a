//! Opportunity Scout command-line client.

use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::{ColorChoice, Parser};
use scout_cli::config::ScoutConfig;
use scout_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_health, run_once, run_search, run_shell};

/// How long pending browser launches may keep the process alive on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = load_config(&cli);
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start async runtime: {error}");
            std::process::exit(1);
        }
    };
    let result = runtime.block_on(async {
        match &cli.command {
            Command::Search(args) => run_search(args, &config).await,
            Command::Shell => run_shell(&config).await.map(|()| 0),
            Command::Once(args) => run_once(args, &config).await.map(|()| 0),
            Command::Health => run_health(&config).await,
        }
    });
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Config file settings, then `SCOUT_SERVER_URL`, then `--server`.
fn load_config(cli: &Cli) -> ScoutConfig {
    let config = match &cli.config {
        Some(path) => ScoutConfig::load_from(path),
        None => ScoutConfig::load(),
    };
    config.with_server_override(cli.server.clone())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
