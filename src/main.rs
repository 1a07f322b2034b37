//! `decorable` - call logging and execution monitoring for methods

use clap::Parser;

use decorable::cli::args::Cli;
use decorable::cli::commands;
use decorable::error::ExitCode;
use decorable::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
