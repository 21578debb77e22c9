//! CLI, config, watch mode, actions
//!
//! This crate provides the `nowmeeting` command-line interface.

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod watch;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
