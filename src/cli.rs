//! Flag table and usage text for the `instmon` command.
//!
//! Flags are single-dash, case-sensitive tokens looked up by exact match
//! (see [`crate::config::resolver`]).  They are not parsed positionally, so
//! the order they appear in on the command line is irrelevant; the
//! dispatcher runs them in the order of [`Flag::ALL`].
use std::fmt::Write as _;

/// Every flag the dispatcher recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Print usage and exit.
    Help,
    /// Load additional options from a file.
    File,
    /// Append log output to a file.
    Log,
    /// Process to wait for before removing directories.
    Pid,
    /// Bound, in seconds, for the `-pid` wait.
    Wait,
    /// Remove directory trees.
    RemoveDir,
    /// Remove directory trees only if they hold no files.
    RemoveEmptyDir,
    /// Set a registry value.
    RegSetValue,
    /// Print a registry value.
    RegGetValue,
    /// Delete a registry value.
    RegDeleteValue,
    /// Delete a registry key.
    RegDeleteKey,
    /// Run a program with elevated rights.
    RunAdmin,
    /// Create a shortcut.
    CreateShortcut,
    /// Print the path of a special folder.
    GetSpecialFolder,
    /// Print an operating-system property.
    GetOsProperty,
}

impl Flag {
    /// All flags in dispatch order.
    pub const ALL: [Self; 15] = [
        Self::Help,
        Self::File,
        Self::Log,
        Self::Pid,
        Self::Wait,
        Self::RemoveDir,
        Self::RemoveEmptyDir,
        Self::RegSetValue,
        Self::RegGetValue,
        Self::RegDeleteValue,
        Self::RegDeleteKey,
        Self::RunAdmin,
        Self::CreateShortcut,
        Self::GetSpecialFolder,
        Self::GetOsProperty,
    ];

    /// Tokens that select this flag.
    #[must_use]
    pub const fn names(self) -> &'static [&'static str] {
        match self {
            Self::Help => &["-h", "--help"],
            Self::File => &["-file"],
            Self::Log => &["-log"],
            Self::Pid => &["-pid"],
            Self::Wait => &["-wait"],
            Self::RemoveDir => &["-removeDir"],
            Self::RemoveEmptyDir => &["-removeEmptyDir"],
            Self::RegSetValue => &["-regSetValue"],
            Self::RegGetValue => &["-regGetValue"],
            Self::RegDeleteValue => &["-regDeleteValue"],
            Self::RegDeleteKey => &["-regDeleteKey"],
            Self::RunAdmin => &["-runAdmin"],
            Self::CreateShortcut => &["-createShortcut"],
            Self::GetSpecialFolder => &["-getSpecialFolder"],
            Self::GetOsProperty => &["-getOsProperty"],
        }
    }

    /// Primary token, used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.names() {
            [first, ..] => *first,
            [] => "",
        }
    }

    /// Whether the token following the flag is its value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Help)
    }

    /// Value placeholder shown in the usage text.
    const fn placeholder(self) -> &'static str {
        match self {
            Self::Help => "",
            Self::File | Self::Log => "<file>",
            Self::Pid => "<pid>",
            Self::Wait => "<seconds>",
            Self::RemoveDir | Self::RemoveEmptyDir => "<paths>",
            Self::RegSetValue => "\"<key>,<name>,<value>,<type>\"",
            Self::RegGetValue | Self::RegDeleteValue => "\"<key>,<name>\"",
            Self::RegDeleteKey => "\"<key>\"",
            Self::RunAdmin => "\"<path>,<args>\"",
            Self::CreateShortcut => {
                "\"<path>,<linkName>,<targetFile>,<args>,<description>,\
                 <showMode>,<workingDirectory>,<iconFile>,<iconIndex>\""
            }
            Self::GetSpecialFolder => "\"<csidl>\"",
            Self::GetOsProperty => "<property>",
        }
    }

    /// Help lines shown under the flag in the usage text.
    const fn help(self) -> &'static [&'static str] {
        match self {
            Self::Help => &["Print this message, and exit."],
            Self::File => &[
                "Loads options from a file. The file should contain",
                "one option and its argument (if required) per line.",
            ],
            Self::Log => &["Output errors and actions to a log file."],
            Self::Pid => &["PID of process to wait for termination before removing directories."],
            Self::Wait => &["Maximum number of seconds to wait for process to terminate (-1 = no limit)."],
            Self::RemoveDir => &["Comma separated list of directories to remove."],
            Self::RemoveEmptyDir => &[
                "Comma separated list of directories to remove only if they contain no files.",
            ],
            Self::RegSetValue => &[
                "Sets a Windows registry value. <key> is the fully qualified key path,",
                "<type> is string or dword.",
            ],
            Self::RegGetValue => &["Prints a Windows registry value."],
            Self::RegDeleteValue => &["Deletes a named registry value."],
            Self::RegDeleteKey => &["Deletes a registry key."],
            Self::RunAdmin => &[
                "Runs a program with elevated rights. Use ' to quote arguments.",
            ],
            Self::CreateShortcut => &[
                "Creates a short-cut. Only <path>, <linkName> and <targetFile> are",
                "used outside Windows.",
            ],
            Self::GetSpecialFolder => &["Prints the path to a special folder (CSIDL name)."],
            Self::GetOsProperty => &[
                "Prints an operating system property: WIN_MAJOR_VERSION, WIN_MINOR_VERSION.",
            ],
        }
    }
}

/// Render the usage text printed for `-h` / `--help`.
#[must_use]
pub fn usage() -> String {
    let mut out = String::from("\nUsage: instmon <option(s)>\n Installer support utility\n Options are:\n");
    for flag in Flag::ALL {
        let names = flag.names().join(" ");
        let _ = writeln!(out, "  {names} {}", flag.placeholder());
        for line in flag.help() {
            let _ = writeln!(out, "        {line}");
        }
    }
    out
}
