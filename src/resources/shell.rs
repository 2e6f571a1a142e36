//! Shell-level helpers: elevated launch, special folders, OS properties.
//!
//! All three are Windows services reached through `PowerShell`.  Inputs
//! are validated on every platform so that a malformed request fails the
//! same way everywhere.
use crate::config::Fields;
use crate::error::PlatformError;

/// A `-runAdmin` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elevated {
    /// Program to launch.
    pub program: String,
    /// Argument string, with `'` already turned into `"`.
    pub arguments: String,
}

impl Elevated {
    /// Parse a `<path>,<args>` record.
    ///
    /// Single quotes in the arguments stand in for double quotes, which
    /// cannot survive option trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use instmon_cli::resources::shell::Elevated;
    ///
    /// let e = Elevated::parse("C:\\setup.exe,/dir='C:\\Program Files\\Acme'");
    /// assert_eq!(e.arguments, "/dir=\"C:\\Program Files\\Acme\"");
    /// ```
    #[must_use]
    pub fn parse(record: &str) -> Self {
        let [program, arguments] = Fields::start(record).take_padded();
        Self {
            program,
            arguments: arguments.replace('\'', "\""),
        }
    }

    /// `PowerShell` command that starts the program elevated.
    #[must_use]
    pub fn script(&self) -> String {
        use crate::exec::ps_quote;
        let mut script = format!(
            "Start-Process -FilePath {} -Verb RunAs",
            ps_quote(&self.program)
        );
        if !self.arguments.is_empty() {
            script.push_str(" -ArgumentList ");
            script.push_str(&ps_quote(&self.arguments));
        }
        script
    }
}

/// Launch a program with elevated rights.
///
/// # Errors
///
/// Returns [`PlatformError::Command`] if the launch fails, or
/// [`PlatformError::Unsupported`] outside Windows.
pub fn run_admin(request: &Elevated) -> Result<(), PlatformError> {
    if request.program.is_empty() {
        return Err(PlatformError::Command {
            program: String::new(),
            exit_code: -1,
            stderr: "no program given".to_string(),
        });
    }
    if cfg!(windows) {
        tracing::debug!("launching {} elevated", request.program);
        crate::exec::powershell(&request.script()).map(|_| ())
    } else {
        Err(PlatformError::Unsupported {
            operation: "-runAdmin".to_string(),
        })
    }
}

/// CSIDL names and the `Environment.SpecialFolder` members they map to.
const SPECIAL_FOLDERS: &[(&str, &str)] = &[
    ("CSIDL_ADMINTOOLS", "AdminTools"),
    ("CSIDL_APPDATA", "ApplicationData"),
    ("CSIDL_CDBURN_AREA", "CDBurning"),
    ("CSIDL_COMMON_ADMINTOOLS", "CommonAdminTools"),
    ("CSIDL_COMMON_APPDATA", "CommonApplicationData"),
    ("CSIDL_COMMON_DESKTOPDIRECTORY", "CommonDesktopDirectory"),
    ("CSIDL_COMMON_DOCUMENTS", "CommonDocuments"),
    ("CSIDL_COMMON_MUSIC", "CommonMusic"),
    ("CSIDL_COMMON_OEM_LINKS", "CommonOemLinks"),
    ("CSIDL_COMMON_PICTURES", "CommonPictures"),
    ("CSIDL_COMMON_PROGRAMS", "CommonPrograms"),
    ("CSIDL_COMMON_STARTMENU", "CommonStartMenu"),
    ("CSIDL_COMMON_STARTUP", "CommonStartup"),
    ("CSIDL_COMMON_TEMPLATES", "CommonTemplates"),
    ("CSIDL_COMMON_VIDEO", "CommonVideos"),
    ("CSIDL_COOKIES", "Cookies"),
    ("CSIDL_DESKTOP", "Desktop"),
    ("CSIDL_DESKTOPDIRECTORY", "DesktopDirectory"),
    ("CSIDL_DRIVES", "MyComputer"),
    ("CSIDL_FAVORITES", "Favorites"),
    ("CSIDL_FONTS", "Fonts"),
    ("CSIDL_HISTORY", "History"),
    ("CSIDL_INTERNET_CACHE", "InternetCache"),
    ("CSIDL_LOCAL_APPDATA", "LocalApplicationData"),
    ("CSIDL_MYMUSIC", "MyMusic"),
    ("CSIDL_MYPICTURES", "MyPictures"),
    ("CSIDL_MYVIDEO", "MyVideos"),
    ("CSIDL_NETHOOD", "NetworkShortcuts"),
    ("CSIDL_PERSONAL", "Personal"),
    ("CSIDL_PRINTHOOD", "PrinterShortcuts"),
    ("CSIDL_PROFILE", "UserProfile"),
    ("CSIDL_PROGRAM_FILES", "ProgramFiles"),
    ("CSIDL_PROGRAM_FILESX86", "ProgramFilesX86"),
    ("CSIDL_PROGRAM_FILES_COMMON", "CommonProgramFiles"),
    ("CSIDL_PROGRAM_FILES_COMMONX86", "CommonProgramFilesX86"),
    ("CSIDL_PROGRAMS", "Programs"),
    ("CSIDL_RECENT", "Recent"),
    ("CSIDL_RESOURCES", "Resources"),
    ("CSIDL_RESOURCES_LOCALIZED", "LocalizedResources"),
    ("CSIDL_SENDTO", "SendTo"),
    ("CSIDL_STARTMENU", "StartMenu"),
    ("CSIDL_STARTUP", "Startup"),
    ("CSIDL_SYSTEM", "System"),
    ("CSIDL_SYSTEMX86", "SystemX86"),
    ("CSIDL_TEMPLATES", "Templates"),
    ("CSIDL_WINDOWS", "Windows"),
];

/// Map a CSIDL name to its `Environment.SpecialFolder` member.
///
/// # Errors
///
/// Returns [`PlatformError::UnknownFolder`] for names without a mapping.
pub fn special_folder_member(csidl: &str) -> Result<&'static str, PlatformError> {
    SPECIAL_FOLDERS
        .iter()
        .find(|(name, _)| *name == csidl)
        .map(|(_, member)| *member)
        .ok_or_else(|| PlatformError::UnknownFolder(csidl.to_string()))
}

/// Resolve the path of a special folder.
///
/// # Errors
///
/// Returns [`PlatformError::UnknownFolder`] for an unknown name or a folder
/// with no path on this machine, [`PlatformError::Command`] if the lookup
/// fails, or [`PlatformError::Unsupported`] outside Windows.
pub fn special_folder(csidl: &str) -> Result<String, PlatformError> {
    let member = special_folder_member(csidl)?;
    if !cfg!(windows) {
        return Err(PlatformError::Unsupported {
            operation: "-getSpecialFolder".to_string(),
        });
    }
    let result = crate::exec::powershell(&format!("[Environment]::GetFolderPath('{member}')"))?;
    let path = result.stdout.trim();
    if path.is_empty() {
        return Err(PlatformError::UnknownFolder(csidl.to_string()));
    }
    Ok(path.to_string())
}

/// Operating-system properties that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsProperty {
    /// `WIN_MAJOR_VERSION`
    WinMajorVersion,
    /// `WIN_MINOR_VERSION`
    WinMinorVersion,
}

impl OsProperty {
    /// Look up a property by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "WIN_MAJOR_VERSION" => Some(Self::WinMajorVersion),
            "WIN_MINOR_VERSION" => Some(Self::WinMinorVersion),
            _ => None,
        }
    }

    const fn version_field(self) -> &'static str {
        match self {
            Self::WinMajorVersion => "Major",
            Self::WinMinorVersion => "Minor",
        }
    }
}

/// Query an operating-system property.
///
/// Returns `None` for unknown names and for Windows properties queried on
/// other systems; neither is an error.
///
/// # Errors
///
/// Returns [`PlatformError::Command`] if the Windows version query fails.
pub fn os_property(name: &str) -> Result<Option<String>, PlatformError> {
    let Some(property) = OsProperty::from_name(name) else {
        tracing::debug!("unknown OS property: {name}");
        return Ok(None);
    };
    if !cfg!(windows) {
        return Ok(None);
    }
    let result = crate::exec::powershell(&format!(
        "[Environment]::OSVersion.Version.{}",
        property.version_field()
    ))?;
    Ok(Some(result.stdout.trim().to_string()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Elevated
    // -----------------------------------------------------------------------

    #[test]
    fn elevated_replaces_single_quotes() {
        let e = Elevated::parse("setup.exe,/S /D='C:\\My Apps'");
        assert_eq!(e.program, "setup.exe");
        assert_eq!(e.arguments, "/S /D=\"C:\\My Apps\"");
    }

    #[test]
    fn elevated_without_arguments() {
        let e = Elevated::parse("\"C:\\setup.exe\"");
        assert_eq!(e.program, "C:\\setup.exe");
        assert!(e.arguments.is_empty());
        assert_eq!(e.script(), "Start-Process -FilePath 'C:\\setup.exe' -Verb RunAs");
    }

    #[test]
    fn elevated_script_passes_arguments() {
        let e = Elevated::parse("setup.exe,/S");
        assert_eq!(
            e.script(),
            "Start-Process -FilePath 'setup.exe' -Verb RunAs -ArgumentList '/S'"
        );
    }

    #[test]
    fn run_admin_requires_program() {
        let err = run_admin(&Elevated::parse("")).unwrap_err();
        assert!(matches!(err, PlatformError::Command { .. }));
    }

    #[cfg(not(windows))]
    #[test]
    fn run_admin_is_unsupported_off_windows() {
        let err = run_admin(&Elevated::parse("setup.exe")).unwrap_err();
        assert_eq!(err.to_string(), "-runAdmin is only supported on Windows.");
    }

    // -----------------------------------------------------------------------
    // Special folders
    // -----------------------------------------------------------------------

    #[test]
    fn maps_known_csidl_names() {
        assert_eq!(special_folder_member("CSIDL_APPDATA").unwrap(), "ApplicationData");
        assert_eq!(special_folder_member("CSIDL_PROFILE").unwrap(), "UserProfile");
        assert_eq!(special_folder_member("CSIDL_WINDOWS").unwrap(), "Windows");
    }

    #[test]
    fn csidl_names_are_unique() {
        let mut names: Vec<&str> = SPECIAL_FOLDERS.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn unknown_folder_is_error_everywhere() {
        let err = special_folder("CSIDL_NOPE").unwrap_err();
        assert!(matches!(err, PlatformError::UnknownFolder(ref n) if n == "CSIDL_NOPE"));
    }

    #[cfg(not(windows))]
    #[test]
    fn known_folder_is_unsupported_off_windows() {
        let err = special_folder("CSIDL_APPDATA").unwrap_err();
        assert!(matches!(err, PlatformError::Unsupported { .. }));
    }

    // -----------------------------------------------------------------------
    // OS properties
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_property_is_silent() {
        assert_eq!(os_property("LINUX_KERNEL").unwrap(), None);
    }

    #[test]
    fn property_names() {
        assert_eq!(
            OsProperty::from_name("WIN_MAJOR_VERSION"),
            Some(OsProperty::WinMajorVersion)
        );
        assert_eq!(
            OsProperty::from_name("WIN_MINOR_VERSION"),
            Some(OsProperty::WinMinorVersion)
        );
        assert_eq!(OsProperty::from_name("win_major_version"), None);
    }

    #[cfg(not(windows))]
    #[test]
    fn windows_property_prints_nothing_elsewhere() {
        assert_eq!(os_property("WIN_MAJOR_VERSION").unwrap(), None);
    }
}
