//! CLI layer: argument parsing, rendering and command dispatch

pub mod args;
pub mod canvas;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};
