//! CLI module - argument parsing and the score subcommand

mod args;
pub mod score;

pub use args::{Cli, Commands};
