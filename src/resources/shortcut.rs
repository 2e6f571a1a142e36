//! Program shortcuts.
//!
//! On Windows a `.lnk` file is written through the `WScript.Shell` COM
//! object.  Elsewhere the shortcut is a symlink `<folder>/<linkName>`
//! pointing at the target; the Windows-only fields are ignored.
use std::path::{Path, PathBuf};

use crate::config::Fields;
use crate::error::{InstmonError, OptionsError, PlatformError};
use crate::platform::FileSystem;

use super::path::ensure_path;

/// A `-createShortcut` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Folder the shortcut is placed in; created if missing.
    pub folder: PathBuf,
    /// File name of the shortcut, without extension.
    pub link_name: String,
    /// File the shortcut points to.
    pub target: PathBuf,
    /// Command-line arguments (Windows only).
    pub arguments: String,
    /// Tooltip text (Windows only).
    pub description: String,
    /// Window show mode (Windows only); `0` leaves the default.
    pub show_mode: i32,
    /// Start-in directory (Windows only).
    pub working_directory: String,
    /// File holding the icon (Windows only).
    pub icon_file: String,
    /// Index of the icon within `icon_file` (Windows only).
    pub icon_index: i32,
}

impl Shortcut {
    /// Parse the nine-field record
    /// `path,linkName,targetFile,args,description,showMode,workingDirectory,iconFile,iconIndex`.
    ///
    /// Missing trailing fields are empty; empty numeric fields mean `0`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidValue`] if a numeric field is not an
    /// integer, or if the folder, link name or target is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use instmon_cli::resources::shortcut::Shortcut;
    ///
    /// let s = Shortcut::parse("/usr/share/acme,Acme,/opt/acme/bin/acme").unwrap();
    /// assert_eq!(s.link_name, "Acme");
    /// assert_eq!(s.show_mode, 0);
    /// ```
    pub fn parse(record: &str) -> Result<Self, OptionsError> {
        let [
            folder,
            link_name,
            target,
            arguments,
            description,
            show_mode,
            working_directory,
            icon_file,
            icon_index,
        ] = Fields::start(record).take_padded();

        let invalid = |reason: &str| OptionsError::InvalidValue {
            flag: "-createShortcut".to_string(),
            value: record.to_string(),
            reason: reason.to_string(),
        };
        if folder.is_empty() || link_name.is_empty() || target.is_empty() {
            return Err(invalid("path, linkName and targetFile are required"));
        }
        let number = |field: &str, name: &str| -> Result<i32, OptionsError> {
            if field.is_empty() {
                return Ok(0);
            }
            field
                .parse()
                .map_err(|_| invalid(&format!("{name} is not an integer")))
        };

        Ok(Self {
            folder: PathBuf::from(folder),
            link_name,
            target: PathBuf::from(target),
            arguments,
            description,
            show_mode: number(&show_mode, "showMode")?,
            working_directory,
            icon_file,
            icon_index: number(&icon_index, "iconIndex")?,
        })
    }

    /// Path of the file the shortcut is written to.
    #[must_use]
    pub fn link_path(&self) -> PathBuf {
        if cfg!(windows) {
            self.folder.join(format!("{}.lnk", self.link_name))
        } else {
            self.folder.join(&self.link_name)
        }
    }

    /// Create the folder and the shortcut.
    ///
    /// # Errors
    ///
    /// Returns [`InstmonError::Fs`] if the folder cannot be created, or
    /// [`InstmonError::Platform`] if the shortcut cannot be written.
    pub fn create(&self, fs: &dyn FileSystem) -> Result<PathBuf, InstmonError> {
        ensure_path(fs, &self.folder)?;
        let link = self.link_path();
        self.write_link(&link).map_err(|reason| {
            tracing::info!("[create_shortcut] {reason}");
            PlatformError::Shortcut {
                path: link.clone(),
                reason,
            }
        })?;
        tracing::debug!("created shortcut {}", link.display());
        Ok(link)
    }

    #[cfg(unix)]
    fn write_link(&self, link: &Path) -> Result<(), String> {
        std::os::unix::fs::symlink(&self.target, link).map_err(|e| e.to_string())
    }

    #[cfg(windows)]
    fn write_link(&self, link: &Path) -> Result<(), String> {
        crate::exec::powershell(&self.script(link))
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    #[cfg(not(any(unix, windows)))]
    fn write_link(&self, _link: &Path) -> Result<(), String> {
        Err("shortcuts are not supported on this platform".to_string())
    }

    /// `PowerShell` script that writes this shortcut to `link`.
    #[must_use]
    pub fn script(&self, link: &Path) -> String {
        use crate::exec::ps_quote;
        use std::fmt::Write as _;

        let mut script = format!(
            "$s = (New-Object -ComObject WScript.Shell).CreateShortcut({})\n",
            ps_quote(&link.to_string_lossy())
        );
        let _ = writeln!(
            script,
            "$s.TargetPath = {}",
            ps_quote(&self.target.to_string_lossy())
        );
        let _ = writeln!(script, "$s.Arguments = {}", ps_quote(&self.arguments));
        if !self.description.is_empty() {
            let _ = writeln!(script, "$s.Description = {}", ps_quote(&self.description));
        }
        if self.show_mode > 0 {
            let _ = writeln!(script, "$s.WindowStyle = {}", self.show_mode);
        }
        if !self.working_directory.is_empty() {
            let _ = writeln!(
                script,
                "$s.WorkingDirectory = {}",
                ps_quote(&self.working_directory)
            );
        }
        if !self.icon_file.is_empty() {
            let location = format!("{},{}", self.icon_file, self.icon_index);
            let _ = writeln!(script, "$s.IconLocation = {}", ps_quote(&location));
        }
        script.push_str("$s.Save()");
        script
    }
}
