//! `-pid`/`-wait`, `-removeDir` and `-removeEmptyDir`.
use anyhow::{Context as _, Result};

use crate::cli::Flag;
use crate::config::Options;
use crate::platform::{FileSystem, ProcessTable};
use crate::resources::process::{WaitLimit, parse_pid, wait_for_exit};
use crate::resources::tree::{RemoveMode, remove_trees};

/// Wait for the `-pid` process, bounded by `-wait` when given.
///
/// # Errors
///
/// Returns an error if either value is malformed or the wait times out.
pub fn wait(options: &Options, pid: &str, pt: &dyn ProcessTable) -> Result<()> {
    let pid = parse_pid(pid)?;
    let limit = options
        .value(Flag::Wait)?
        .map(|value| WaitLimit::parse(&value))
        .transpose()?
        .unwrap_or(WaitLimit::Unbounded);
    wait_for_exit(pt, pid, limit).context("Timed out waiting for process to terminate.")?;
    tracing::info!("-pid {pid}");
    Ok(())
}

/// Remove a Directory-Delete Target List.
///
/// # Errors
///
/// Returns an error naming the list if any target could not be removed.
pub fn remove(flag: Flag, list: &str, fs: &dyn FileSystem) -> Result<()> {
    let (mode, message) = if flag == Flag::RemoveEmptyDir {
        (RemoveMode::EmptyOnly, "Failed to delete empty directories")
    } else {
        (RemoveMode::All, "Failed to delete directories")
    };
    remove_trees(fs, list, mode).with_context(|| format!("{message}: {list}"))?;
    tracing::info!("{} {list}", flag.name());
    Ok(())
}
