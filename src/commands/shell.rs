//! `-runAdmin`, `-createShortcut`, `-getSpecialFolder`, `-getOsProperty`.
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::cli::Flag;
use crate::config::Fields;
use crate::platform::FileSystem;
use crate::resources::shell::{self as sh, Elevated};
use crate::resources::shortcut::Shortcut;

use super::{platform_context, require_windows};

/// Handle `-runAdmin "<path>,<args>"`.
///
/// # Errors
///
/// Returns an error if the program cannot be launched.
pub fn run_admin(record: &str) -> Result<()> {
    require_windows(Flag::RunAdmin)?;
    let request = Elevated::parse(record);
    platform_context(sh::run_admin(&request), || "Failed to run program.".to_string())?;
    tracing::info!("-runAdmin {},{}", request.program, request.arguments);
    Ok(())
}

/// Handle `-createShortcut "<9 fields>"`.
///
/// # Errors
///
/// Returns an error if the record is malformed or the shortcut cannot be
/// written.
pub fn create_shortcut(record: &str, fs: &dyn FileSystem) -> Result<()> {
    let shortcut = Shortcut::parse(record)?;
    shortcut.create(fs).context("Failed to create shortcut.")?;
    tracing::info!("-createShortcut {record}");
    Ok(())
}

/// Handle `-getSpecialFolder "<CSIDL name>"`, printing the path.
///
/// # Errors
///
/// Returns an error if the folder is unknown or cannot be resolved.
pub fn special_folder(record: &str, out: &mut dyn Write) -> Result<()> {
    require_windows(Flag::GetSpecialFolder)?;
    let name = Fields::start(record).next().unwrap_or_default();
    let path = platform_context(sh::special_folder(&name), || {
        format!("Failed to get special folder: {name}")
    })?;
    writeln!(out, "{path}")?;
    Ok(())
}

/// Handle `-getOsProperty <name>`, printing the value if there is one.
///
/// # Errors
///
/// Returns an error if the property query fails.
pub fn os_property(record: &str, out: &mut dyn Write) -> Result<()> {
    let name = Fields::start(record).next().unwrap_or_default();
    if let Some(value) = platform_context(sh::os_property(&name), || {
        format!("Failed to get OS property: {name}")
    })? {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::Host;

    #[test]
    fn malformed_shortcut_is_rejected_before_any_change() {
        let err = create_shortcut("only-a-folder", &Host).unwrap_err();
        assert!(err.to_string().contains("-createShortcut"));
    }

    #[cfg(unix)]
    #[test]
    fn shortcut_folder_is_created() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("a/b");
        let record = format!("{},Tool,/usr/bin/env", folder.display());
        create_shortcut(&record, &Host).unwrap();
        assert!(folder.join("Tool").symlink_metadata().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn shortcut_failure_gets_context() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("Tool"), "").unwrap();
        let record = format!("{},Tool,/usr/bin/env", root.path().display());
        let err = create_shortcut(&record, &Host).unwrap_err();
        assert_eq!(err.to_string(), "Failed to create shortcut.");
    }

    #[cfg(not(windows))]
    #[test]
    fn windows_only_actions_fail_off_windows() {
        let mut out = Vec::new();
        assert_eq!(
            run_admin("setup.exe,/S").unwrap_err().to_string(),
            "-runAdmin is only supported on Windows."
        );
        assert_eq!(
            special_folder("CSIDL_APPDATA", &mut out)
                .unwrap_err()
                .to_string(),
            "-getSpecialFolder is only supported on Windows."
        );
        assert!(out.is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn os_property_prints_nothing_off_windows() {
        let mut out = Vec::new();
        os_property("WIN_MAJOR_VERSION", &mut out).unwrap();
        os_property("SOMETHING_ELSE", &mut out).unwrap();
        assert!(out.is_empty());
    }
}
