//! `token` command: prints correlation tokens.

use std::io::Write;

use crate::cli::args::TokenArgs;
use crate::error::DecorableError;
use crate::utils::generate_random_token;

/// Print `count` tokens of `length` characters, one per line.
///
/// # Errors
///
/// Returns [`DecorableError::Io`] if stdout cannot be written.
pub fn run(args: &TokenArgs) -> Result<(), DecorableError> {
    let mut out = std::io::stdout().lock();
    for _ in 0..args.count {
        writeln!(out, "{}", generate_random_token(args.length))?;
    }
    out.flush()?;
    Ok(())
}
