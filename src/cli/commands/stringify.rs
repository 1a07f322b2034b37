//! `stringify` command: renders a JSON value the way log lines do.

use crate::cli::args::StringifyArgs;
use crate::error::DecorableError;
use crate::utils::stringify;

/// Parse `args.json` and print its log rendering.
///
/// # Errors
///
/// Returns [`DecorableError::Usage`] if the argument is not valid JSON.
pub fn run(args: &StringifyArgs) -> Result<(), DecorableError> {
    let value: serde_json::Value = serde_json::from_str(&args.json)
        .map_err(|e| DecorableError::Usage(format!("invalid JSON argument: {e}")))?;
    println!("{}", stringify(&value));
    Ok(())
}
