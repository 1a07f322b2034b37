//! Shared integration-test harness for running the `decorable` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs the `decorable` binary to completion.
pub struct DecorableProcess;

impl DecorableProcess {
    /// Runs the binary with `args` and a clean `DECORABLE_*` environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn run(args: &[&str]) -> Output {
        Self::run_with_env(args, &[])
    }

    /// Runs the binary with `args` and extra environment variables.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_decorable"));
        command.args(args);
        for var in [
            "DECORABLE_CONFIG",
            "DECORABLE_TIMEOUT",
            "DECORABLE_LOG_LEVEL",
            "DECORABLE_LOG_FORMAT",
        ] {
            command.env_remove(var);
        }
        command.envs(env.iter().copied());
        command.output().expect("failed to run decorable")
    }

    /// Absolute path of a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}

/// Parses every non-empty stdout line as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}
