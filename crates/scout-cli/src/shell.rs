//! Line commands of the interactive shell.
//!
//! Every command maps onto one session operation. Row numbers are 1-based
//! and refer to the rows currently listed, after filtering.

use std::path::PathBuf;

use scout_core::FilterMode;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  search <query>     start a new search (alias: s)
  list               show the results table (alias: ls)
  log                show the step log of the current search
  select <n>...      toggle selection of the listed rows
  all                toggle select-all over every result
  none               clear the selection
  open               open the selected sources in the browser
  save               add the selected results to the saved set
  export [path]      write the listed rows as CSV
  filter [all|saved] switch between all and saved results (toggles without argument)
  markdown           print the report of the last completed search (alias: md)
  help               show this help
  quit               leave the shell (alias: exit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    List,
    Log,
    /// Zero-based row indices to toggle.
    Toggle(Vec<usize>),
    ToggleAll,
    ClearSelection,
    Open,
    Save,
    Export(Option<PathBuf>),
    /// `None` toggles the current filter.
    Filter(Option<FilterMode>),
    Markdown,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("`{0}` is not a row number")]
    InvalidRow(String),
    #[error("unknown filter `{0}`; use `all` or `saved`")]
    InvalidFilter(String),
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing what is wrong with the line.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "search",
                    what: "a query",
                });
            }
            ShellCommand::Search(rest.to_string())
        }
        "list" | "ls" => ShellCommand::List,
        "log" => ShellCommand::Log,
        "select" | "sel" => ShellCommand::Toggle(parse_rows(rest)?),
        "all" | "select-all" => ShellCommand::ToggleAll,
        "none" | "clear" => ShellCommand::ClearSelection,
        "open" => ShellCommand::Open,
        "save" => ShellCommand::Save,
        "export" => ShellCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "filter" => ShellCommand::Filter(parse_filter(rest)?),
        "markdown" | "md" => ShellCommand::Markdown,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => return Err(ParseError::UnknownCommand(word.to_string())),
    };
    Ok(Some(command))
}

fn parse_rows(rest: &str) -> Result<Vec<usize>, ParseError> {
    let rows = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<usize>() {
            Ok(row) if row > 0 => Ok(row - 1),
            _ => Err(ParseError::InvalidRow(token.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Err(ParseError::MissingArgument {
            command: "select",
            what: "one or more row numbers",
        });
    }
    Ok(rows)
}

fn parse_filter(rest: &str) -> Result<Option<FilterMode>, ParseError> {
    match rest.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "all" => Ok(Some(FilterMode::All)),
        "saved" => Ok(Some(FilterMode::SavedOnly)),
        other => Err(ParseError::InvalidFilter(other.to_string())),
    }
}
