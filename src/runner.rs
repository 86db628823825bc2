//! Process runner - executes the external HTTP client and captures its output
//!
//! Execution is synchronous: the caller blocks until the client exits.
//! There is no timeout and no cancellation.

use std::io;
use std::process::{Command, ExitStatus, Output};

use crate::constants::STDERR_MARKER;
use crate::curl::CurlCommand;
use crate::models::RawResult;

/// Anything that can turn a built command into a [`RawResult`]
pub trait CommandRunner {
    fn run(&self, command: &CurlCommand) -> RawResult;
}

/// Runs commands as real child processes
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        ProcessRunner
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CurlCommand) -> RawResult {
        let display_command = command.display.clone();

        let Some((program, args)) = command.argv.split_first() else {
            return RawResult {
                display_command,
                raw_output: "Empty command, nothing to run.".to_string(),
                exit_code: 1,
            };
        };

        tracing::info!(program = %program, args = args.len(), "Launching client");
        match Command::new(program).args(args).output() {
            Ok(output) => {
                let exit_code = exit_code(output.status);
                tracing::info!(exit_code, "Client finished");
                RawResult {
                    display_command,
                    raw_output: combine_output(&output),
                    exit_code,
                }
            }
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Client could not be launched");
                RawResult {
                    display_command,
                    raw_output: launch_failure_message(program, &e),
                    exit_code: 1,
                }
            }
        }
    }
}

/// stdout, then stderr after [`STDERR_MARKER`] when stderr is not empty
fn combine_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        text.push_str(STDERR_MARKER);
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    text
}

fn launch_failure_message(program: &str, error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::NotFound => format!("{} not found on this system.", program),
        _ => format!("Failed to launch {}: {}", program, error),
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // killed by a signal: report it negated
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
