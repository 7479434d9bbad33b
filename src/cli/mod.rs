//! CLI module for vibeos - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
