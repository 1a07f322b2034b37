//! Command-line interface for the `decorable` binary.

pub mod args;
pub mod commands;
