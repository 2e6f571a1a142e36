//! Directory tree removal.
//!
//! A single target is walked depth-first in the order the OS enumerates it.
//! Entries are classified without following symlinks, so a link to a
//! directory outside the tree is unlinked rather than descended into.  The
//! walk stops at the first failure; anything already removed stays removed.
//!
//! A batch removes a comma-separated list of targets left to right and
//! attempts every one of them, whatever happened to the earlier ones.
use std::path::{Path, PathBuf};

use crate::config::Fields;
use crate::error::{AggregateError, FsError};
use crate::platform::{EntryKind, FileSystem};

/// What a removal is allowed to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveMode {
    /// Delete files, symlinks and directories.
    All,
    /// Delete directories only; any other entry aborts the target.
    EmptyOnly,
}

impl RemoveMode {
    /// Build a mode from the `emptyOnly` switch.
    #[must_use]
    pub const fn from_empty_only(empty_only: bool) -> Self {
        if empty_only { Self::EmptyOnly } else { Self::All }
    }
}

/// Split a Directory-Delete Target List into paths.
///
/// Fields are trimmed of quote and whitespace padding; empty fields are
/// dropped.  Order and duplicates are preserved.
///
/// # Examples
///
/// ```
/// use instmon_cli::resources::tree::parse_targets;
/// use std::path::PathBuf;
///
/// let targets = parse_targets("/opt/a, \"/opt/b\",,/opt/a");
/// assert_eq!(
///     targets,
///     [PathBuf::from("/opt/a"), PathBuf::from("/opt/b"), PathBuf::from("/opt/a")]
/// );
/// ```
#[must_use]
pub fn parse_targets(list: &str) -> Vec<PathBuf> {
    Fields::start(list)
        .filter(|field| !field.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Remove one directory tree.
///
/// A target that does not exist is treated as already removed.
///
/// # Errors
///
/// Returns the first [`FsError`] encountered: the directory cannot be
/// opened, a non-directory entry is found in [`RemoveMode::EmptyOnly`], an
/// entry cannot be unlinked, or a directory cannot be removed.
pub fn remove_tree(fs: &dyn FileSystem, target: &Path, mode: RemoveMode) -> Result<(), FsError> {
    if !fs.exists(target) {
        tracing::debug!("[remove_tree] nothing to remove: {}", target.display());
        return Ok(());
    }
    remove_dir_recursive(fs, target, mode)
}

fn remove_dir_recursive(fs: &dyn FileSystem, dir: &Path, mode: RemoveMode) -> Result<(), FsError> {
    let entries = fs.read_dir(dir).map_err(|source| FsError::Open {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let kind = match fs.entry_kind(&entry) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!("[remove_tree] skipping {}: {e}", entry.display());
                continue;
            }
        };

        match (kind, mode) {
            (EntryKind::Directory, _) => remove_dir_recursive(fs, &entry, mode)?,
            (_, RemoveMode::EmptyOnly) => {
                tracing::info!("[remove_tree] Directory not empty: {}", dir.display());
                return Err(FsError::NotEmpty {
                    path: dir.to_path_buf(),
                });
            }
            (_, RemoveMode::All) => {
                fs.remove_file(&entry).map_err(|source| {
                    tracing::info!("[remove_tree] Failed to delete file: {}", entry.display());
                    FsError::Unlink {
                        path: entry.clone(),
                        source,
                    }
                })?;
            }
        }
    }

    fs.remove_dir(dir).map_err(|source| FsError::RemoveDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Remove every target of a comma-separated list.
///
/// Failures are recorded and logged; they never stop the remaining targets
/// from being attempted.
///
/// # Errors
///
/// Returns an [`AggregateError`] listing every target that failed.
pub fn remove_trees(fs: &dyn FileSystem, list: &str, mode: RemoveMode) -> Result<(), AggregateError> {
    remove_all(fs, &parse_targets(list), mode)
}

/// Remove every target in `targets`, in order.
///
/// # Errors
///
/// Returns an [`AggregateError`] listing every target that failed.
pub fn remove_all(
    fs: &dyn FileSystem,
    targets: &[PathBuf],
    mode: RemoveMode,
) -> Result<(), AggregateError> {
    let mut failures = Vec::new();
    for target in targets {
        match remove_tree(fs, target, mode) {
            Ok(()) => tracing::debug!("removed {}", target.display()),
            Err(e) => {
                tracing::info!("[remove_trees] {}: {e}", target.display());
                failures.push((target.clone(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AggregateError {
            attempted: targets.len(),
            failures,
        })
    }
}
