//! Domain-specific error types for the installer utility.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`FsError`], [`OptionsError`])
//! while the command dispatcher converts them to [`anyhow::Error`] via the
//! standard `?` operator and attaches the user-facing context.
//!
//! # Error hierarchy
//!
//! ```text
//! InstmonError
//! ├── Options(OptionsError)     — options file I/O, missing or invalid flag values
//! ├── Fs(FsError)               — single directory/file mutation failures
//! ├── Aggregate(AggregateError) — one or more batch targets failed
//! ├── Wait(WaitError)           — process wait exceeded its bound
//! └── Platform(PlatformError)   — registry, shortcut and shell integration
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the installer utility.
#[derive(Error, Debug)]
pub enum InstmonError {
    /// Option resolution failed.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// A filesystem mutation failed.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// At least one target of a batch deletion failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// Waiting for a process timed out.
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// A platform service failed or is unavailable.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Errors that arise while resolving command options.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The options file could not be opened or read.
    #[error("Failed to read options file: {}.", path.display())]
    Io {
        /// Path of the options file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A flag that requires a value was the last token.
    #[error("{0} option requires an argument.")]
    MissingArgument(String),

    /// A flag value could not be interpreted.
    #[error("Invalid value '{value}' for {flag}: {reason}")]
    InvalidValue {
        /// Flag whose value was rejected.
        flag: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors that arise from a single filesystem mutation.
#[derive(Error, Debug)]
pub enum FsError {
    /// A directory could not be opened for enumeration.
    #[error("cannot open directory {}: {source}", path.display())]
    Open {
        /// Directory that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An empty-only removal found a non-directory entry.
    #[error("directory not empty: {}", path.display())]
    NotEmpty {
        /// Directory that still holds entries.
        path: PathBuf,
    },

    /// A file, symlink or special entry could not be unlinked.
    #[error("failed to delete file {}: {source}", path.display())]
    Unlink {
        /// Entry that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A directory could not be removed after its entries were cleared.
    #[error("failed to remove directory {}: {source}", path.display())]
    RemoveDir {
        /// Directory that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// One or more members of a batch deletion failed.
///
/// Every target is attempted; this error lists the ones that did not
/// succeed, in the order they were attempted.
#[derive(Error, Debug)]
pub struct AggregateError {
    /// Number of targets that were attempted.
    pub attempted: usize,
    /// Targets that failed, paired with the reason.
    pub failures: Vec<(PathBuf, FsError)>,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} targets failed",
            self.failures.len(),
            self.attempted
        )?;
        for (path, err) in &self.failures {
            write!(f, "; {}: {err}", path.display())?;
        }
        Ok(())
    }
}

/// Errors that arise while waiting for a process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WaitError {
    /// The process was still running after the allowed number of polls.
    #[error("Timed out waiting for process {pid} to terminate after {seconds}s.")]
    Timeout {
        /// Process that was waited on.
        pid: i64,
        /// Bound that was exceeded.
        seconds: u64,
    },
}

/// Errors that arise from platform services (registry, shortcuts, shell).
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The requested operation is not available on this platform.
    #[error("{operation} is only supported on Windows.")]
    Unsupported {
        /// Flag or operation name (e.g., `"-regSetValue"`).
        operation: String,
    },

    /// A registry key path or value type was rejected before any access.
    #[error("invalid registry request: {0}")]
    InvalidRegistry(String),

    /// A registry call failed.
    #[error("registry {operation} failed for {key}: {source}")]
    Registry {
        /// Operation that failed (e.g., `"open"`, `"set"`).
        operation: &'static str,
        /// Fully qualified key path.
        key: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A shortcut could not be written.
    #[error("failed to create shortcut {}: {reason}", path.display())]
    Shortcut {
        /// Path of the link that could not be created.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },

    /// A helper program failed.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    Command {
        /// Program that was invoked.
        program: String,
        /// Exit code, or -1 when terminated by a signal.
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// A special folder name is not recognised.
    #[error("unknown special folder: {0}")]
    UnknownFolder(String),
}
