//! Library side of the `opportunity-scout` command: configuration, logging,
//! terminal rendering and the shell command parser.

pub mod config;
pub mod logging;
pub mod render;
pub mod shell;
