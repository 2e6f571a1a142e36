// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed install tree and a fluent builder
// so each integration test can lay out an isolated "installed product"
// without repeating filesystem boilerplate, then drive the dispatcher
// against it.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use instmon_cli::commands::{self, Outcome};
use instmon_cli::platform::Host;

/// Result of one dispatcher run.
pub struct RunOutput {
    /// Dispatcher result.
    pub result: anyhow::Result<Outcome>,
    /// Everything written to standard output.
    pub stdout: String,
}

/// Run the dispatcher with `args` (program name is prepended).
pub fn run(args: &[&str]) -> RunOutput {
    let mut argv = vec!["instmon".to_string()];
    argv.extend(args.iter().map(ToString::to_string));
    let mut out = Vec::new();
    let result = commands::run(argv, &Host, &mut out);
    RunOutput {
        result,
        stdout: String::from_utf8(out).expect("stdout is utf-8"),
    }
}

/// An isolated install tree backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct InstallTree {
    /// Temporary directory holding the tree.
    pub root: tempfile::TempDir,
}

impl InstallTree {
    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Absolute path of `rel` as a `String`, for use in argument lists.
    pub fn arg(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    /// Comma-separated list of absolute paths.
    pub fn list(&self, rels: &[&str]) -> String {
        rels.iter()
            .map(|rel| self.arg(rel))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether anything exists at `rel` (dangling symlinks included).
    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).symlink_metadata().is_ok()
    }

    /// Root of the tree.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}

/// Fluent builder for [`InstallTree`].
pub struct InstallTreeBuilder {
    tree: InstallTree,
}

impl InstallTreeBuilder {
    /// Begin building an empty tree.
    pub fn new() -> Self {
        Self {
            tree: InstallTree {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Create directory `rel` and all of its parents.
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.tree.path(rel)).expect("create dir");
        self
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.tree.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Create a symlink at `rel` pointing to the absolute `target`.
    #[cfg(unix)]
    pub fn with_symlink(self, rel: &str, target: &Path) -> Self {
        std::os::unix::fs::symlink(target, self.tree.path(rel)).expect("create symlink");
        self
    }

    /// Finish building and return the tree.
    pub fn build(self) -> InstallTree {
        self.tree
    }
}
