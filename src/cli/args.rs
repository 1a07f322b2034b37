//! CLI argument definitions
//!
//! All Clap derive structs for `decorable` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::loggable::SinkKind;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Call logging and execution monitoring for methods.
#[derive(Parser, Debug)]
#[command(name = "decorable", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress diagnostic logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Diagnostic log format.
    #[arg(
        long,
        value_enum,
        default_value = "human",
        global = true,
        env = "DECORABLE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a sample calculator with logged and monitored methods.
    Demo(DemoArgs),

    /// Print random correlation tokens.
    Token(TokenArgs),

    /// Print the log rendering of a JSON value.
    Stringify(StringifyArgs),
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for `demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Path to a YAML instrumentation config.
    #[arg(short, long, env = "DECORABLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default monitor timeout (e.g. `250ms`, `2s`).
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// How long the slow method sleeps.
    #[arg(long, default_value = "50ms", value_parser = humantime::parse_duration)]
    pub delay: Duration,

    /// Where call/result/error lines go.
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,
}

/// Arguments for `token`.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Token length.
    #[arg(short, long, default_value_t = crate::utils::DEFAULT_TOKEN_LENGTH)]
    pub length: usize,

    /// Number of tokens to print.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

/// Arguments for `stringify`.
#[derive(Args, Debug)]
pub struct StringifyArgs {
    /// JSON value to render.
    pub json: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_demo_durations() {
        let cli = Cli::try_parse_from([
            "decorable", "demo", "--timeout", "20ms", "--delay", "1s", "--sink", "tracing",
        ])
        .unwrap();
        let Commands::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(args.timeout, Some(Duration::from_millis(20)));
        assert_eq!(args.delay, Duration::from_secs(1));
        assert_eq!(args.sink, Some(SinkKind::Tracing));
    }

    #[test]
    fn parse_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["decorable", "demo", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn parse_token_defaults_and_global_flags() {
        let cli = Cli::try_parse_from(["decorable", "token", "-vv", "-q"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        let Commands::Token(args) = cli.command else {
            panic!("expected token");
        };
        assert_eq!(args.length, 8);
        assert_eq!(args.count, 1);
    }
}
