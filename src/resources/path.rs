//! Directory path materialization.
use std::path::{Component, Path, PathBuf};

use crate::error::FsError;
use crate::platform::FileSystem;

/// Ensure every directory component of `path` exists.
///
/// Components are created outermost first.  Components that already exist
/// are left alone; the root and any drive prefix are never created.  The
/// first creation failure stops the walk and directories created before it
/// are kept.
///
/// # Errors
///
/// Returns [`FsError::CreateDir`] naming the component that could not be
/// created.
pub fn ensure_path(fs: &dyn FileSystem, path: &Path) -> Result<(), FsError> {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        let structural = matches!(
            component,
            Component::Prefix(_) | Component::RootDir | Component::CurDir
        );
        if structural || fs.exists(&current) {
            continue;
        }
        fs.create_dir(&current).map_err(|source| FsError::CreateDir {
            path: current.clone(),
            source,
        })?;
        tracing::debug!("created directory {}", current.display());
    }
    Ok(())
}
