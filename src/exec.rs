//! Child-process helpers: plain commands and `PowerShell` scripts.
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::error::PlatformError;

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

fn spawn_failed(program: &str, err: &std::io::Error) -> PlatformError {
    PlatformError::Command {
        program: program.to_string(),
        exit_code: -1,
        stderr: format!("failed to execute: {err}"),
    }
}

/// Run a command and return its output. Fails if the command exits non-zero.
///
/// # Errors
///
/// Returns [`PlatformError::Command`] if the program cannot be started or
/// exits unsuccessfully.
pub fn run(program: &str, args: &[&str]) -> Result<ExecResult, PlatformError> {
    let result = run_unchecked(program, args)?;
    if !result.success {
        return Err(PlatformError::Command {
            program: program.to_string(),
            exit_code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        });
    }
    Ok(result)
}

/// Run a command, allowing failure (returns result without bailing).
///
/// # Errors
///
/// Returns [`PlatformError::Command`] only if the program cannot be started.
pub fn run_unchecked(program: &str, args: &[&str]) -> Result<ExecResult, PlatformError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| spawn_failed(program, &e))?;
    Ok(ExecResult::from(output))
}

/// Locate a program on `PATH`.
#[must_use]
pub fn which(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Locate a PowerShell host, preferring `pwsh` over Windows `PowerShell`.
#[must_use]
pub fn powershell_host() -> Option<PathBuf> {
    which("pwsh").or_else(|| which("powershell"))
}

/// Run a `PowerShell` script non-interactively and return its output.
///
/// # Errors
///
/// Returns [`PlatformError::Command`] if no `PowerShell` host is installed or
/// the script fails.
pub fn powershell(script: &str) -> Result<ExecResult, PlatformError> {
    let host = powershell_host().ok_or_else(|| PlatformError::Command {
        program: "powershell".to_string(),
        exit_code: -1,
        stderr: "no PowerShell host found on PATH".to_string(),
    })?;
    let program = host.to_string_lossy();
    tracing::debug!("running PowerShell script via {program}");
    run(
        &program,
        &["-NoProfile", "-NonInteractive", "-Command", script],
    )
}

/// Quote `value` as a single-quoted `PowerShell` string literal.
///
/// # Examples
///
/// ```
/// use instmon_cli::exec::ps_quote;
///
/// assert_eq!(ps_quote("C:\\Acme"), "'C:\\Acme'");
/// assert_eq!(ps_quote("it's"), "'it''s'");
/// ```
#[must_use]
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
