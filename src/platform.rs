//! Platform capabilities consumed by the system-mutation engine.
//!
//! The eraser, path materializer and process waiter never call `std::fs` or
//! OS process APIs directly.  They go through [`FileSystem`] and
//! [`ProcessTable`], implemented for the running host by [`Host`].  This is
//! the only module that branches on the target OS for those primitives.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Classification of a directory entry, made without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A real directory.
    Directory,
    /// A regular file.
    File,
    /// A symbolic link (to anything, including a directory).
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

/// Opaque platform process identifier.
///
/// `-1` is the "no process" sentinel: waiting on it succeeds immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(i64);

impl ProcessId {
    /// The "no process" sentinel.
    pub const NONE: Self = Self(-1);

    /// Wrap a raw process identifier.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whether this is the "no process" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filesystem primitives needed for tree removal and path creation.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// List the entries of `dir` (excluding `.` and `..`), as full paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or read.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Classify `path` without following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be stat'ed.
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Unlink a file, symlink or special entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory whose entries have already been cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Create a single directory; its parent must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Whether anything (including a dangling symlink) exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Process-table queries needed to wait for another process.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessTable {
    /// Whether the process is still running.
    fn is_alive(&self, pid: ProcessId) -> bool;

    /// Block the calling thread between polls.
    fn sleep(&self, duration: Duration);
}

/// Capabilities of the machine the binary runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Host;

impl FileSystem for Host {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        let file_type = std::fs::symlink_metadata(path)?.file_type();
        Ok(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        #[cfg(windows)]
        {
            // Directory symlinks and junctions are removed as directories.
            std::fs::remove_file(path).or_else(|_| std::fs::remove_dir(path))
        }
        #[cfg(not(windows))]
        {
            std::fs::remove_file(path)
        }
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        #[cfg(windows)]
        {
            // Recursive primitive: also clears read-only leftovers the
            // entry walk could not unlink.
            std::fs::remove_dir_all(path)
        }
        #[cfg(not(windows))]
        {
            std::fs::remove_dir(path)
        }
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }
}

impl ProcessTable for Host {
    fn is_alive(&self, pid: ProcessId) -> bool {
        #[cfg(unix)]
        {
            let Ok(raw) = libc::pid_t::try_from(pid.raw()) else {
                return false;
            };
            // SAFETY: `kill` with signal 0 performs only the existence and
            // permission check; no signal is delivered and no memory is shared.
            #[allow(unsafe_code)]
            let rc = unsafe { libc::kill(raw, 0) };
            // EPERM means the process exists but belongs to someone else.
            rc == 0 || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
        }
        #[cfg(windows)]
        {
            crate::exec::run_unchecked(
                "tasklist",
                &["/FI", &format!("PID eq {pid}"), "/NH", "/FO", "CSV"],
            )
            .is_ok_and(|result| result.success && result.stdout.contains(&format!("\"{pid}\"")))
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            false
        }
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
