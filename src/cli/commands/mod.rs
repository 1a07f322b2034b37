//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod demo;
pub mod stringify;
pub mod token;

use crate::cli::args::{Cli, Commands};
use crate::error::DecorableError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), DecorableError> {
    match cli.command {
        Commands::Demo(args) => demo::run(&args).await,
        Commands::Token(args) => token::run(&args),
        Commands::Stringify(args) => stringify::run(&args),
    }
}
