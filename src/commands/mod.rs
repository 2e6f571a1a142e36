//! Top-level dispatcher.
//!
//! One invocation runs every recognised action at most once, in the order
//! of [`Flag::ALL`], and stops at the first failure.  Errors are reported
//! here, through the log file when `-log` is given and on standard error
//! otherwise, so callers only need to map the result to an exit status.
pub mod cleanup;
pub mod registry;
pub mod shell;

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::dispatcher::DefaultGuard;

use crate::cli::{self, Flag};
use crate::config::{Options, options_file};
use crate::error::{OptionsError, PlatformError};
use crate::logging;
use crate::platform::{FileSystem, ProcessTable};

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Usage was printed; nothing else ran.
    Help,
    /// Every requested action succeeded.
    Completed,
}

/// Run one invocation.
///
/// `argv` is the full process argument vector, program name first.  Query
/// results and usage are written to `out`.
///
/// # Errors
///
/// Returns the first failure.  It has already been logged.
pub fn run<P>(argv: Vec<String>, platform: &P, out: &mut dyn Write) -> Result<Outcome>
where
    P: FileSystem + ProcessTable,
{
    let mut options = Options::new(argv);
    let guard = match start(&mut options) {
        Ok(Some(guard)) => guard,
        Ok(None) => {
            out.write_all(cli::usage().as_bytes())?;
            return Ok(Outcome::Help);
        }
        Err(err) => {
            logging::fatal(&err);
            return Err(err);
        }
    };

    let result = dispatch(&options, platform, out);
    if let Err(err) = &result {
        logging::report(err);
    }
    drop(guard);
    result.map(|()| Outcome::Completed)
}

/// Convert the process argument vector to UTF-8.
///
/// # Errors
///
/// Returns [`OptionsError::InvalidValue`] for the first argument that is not
/// valid Unicode, naming the flag token before it.
pub fn collect_args<I>(args: I) -> Result<Vec<String>, OptionsError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut argv: Vec<String> = Vec::new();
    for arg in args {
        match arg.into_string() {
            Ok(arg) => argv.push(arg),
            Err(raw) => {
                let flag = argv
                    .last()
                    .filter(|prev| argv.len() > 1 && prev.starts_with('-'))
                    .map_or_else(|| "argument".to_string(), Clone::clone);
                return Err(OptionsError::InvalidValue {
                    flag,
                    value: raw.to_string_lossy().into_owned(),
                    reason: "not valid Unicode".to_string(),
                });
            }
        }
    }
    Ok(argv)
}

/// Handle the flags that configure the run itself.  Returns `None` when
/// only usage should be printed.
fn start(options: &mut Options) -> Result<Option<DefaultGuard>> {
    if options.is_present(Flag::Help)? {
        return Ok(None);
    }
    if let Some(file) = options.value(Flag::File)? {
        let args = options_file::load(Path::new(&file))?;
        options.set_file_args(args);
    }
    let log_file = options.value(Flag::Log)?;
    logging::init_subscriber(log_file.as_deref().map(Path::new)).map(Some)
}

fn dispatch<P>(options: &Options, platform: &P, out: &mut dyn Write) -> Result<()>
where
    P: FileSystem + ProcessTable,
{
    for flag in Flag::ALL {
        // Configuration flags; -wait is read by the -pid action.
        if matches!(flag, Flag::Help | Flag::File | Flag::Log | Flag::Wait) {
            continue;
        }
        let Some(value) = options.value(flag)? else {
            continue;
        };
        match flag {
            Flag::Pid => cleanup::wait(options, &value, platform)?,
            Flag::RemoveDir | Flag::RemoveEmptyDir => cleanup::remove(flag, &value, platform)?,
            Flag::RegSetValue => registry::set(&value)?,
            Flag::RegGetValue => registry::get(&value, out)?,
            Flag::RegDeleteValue => registry::delete_value(&value)?,
            Flag::RegDeleteKey => registry::delete_key(&value)?,
            Flag::RunAdmin => shell::run_admin(&value)?,
            Flag::CreateShortcut => shell::create_shortcut(&value, platform)?,
            Flag::GetSpecialFolder => shell::special_folder(&value, out)?,
            Flag::GetOsProperty => shell::os_property(&value, out)?,
            Flag::Help | Flag::File | Flag::Log | Flag::Wait => {}
        }
    }
    Ok(())
}

/// Fail with [`PlatformError::Unsupported`] for `flag` outside Windows.
fn require_windows(flag: Flag) -> Result<(), PlatformError> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(PlatformError::Unsupported {
            operation: flag.name().to_string(),
        })
    }
}

/// Attach a user-facing message to a platform failure.  `Unsupported`
/// already reads as a complete message and is passed through unchanged.
fn platform_context<T>(
    result: Result<T, PlatformError>,
    message: impl FnOnce() -> String,
) -> Result<T> {
    result.map_err(|err| match err {
        PlatformError::Unsupported { .. } => anyhow::Error::from(err),
        other => anyhow::Error::from(other).context(message()),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::Host;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn run_captured(items: &[&str]) -> (Result<Outcome>, String) {
        let mut out = Vec::new();
        let result = run(argv(items), &Host, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn help_prints_usage_and_nothing_else() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("keep");
        std::fs::create_dir(&target).unwrap();
        let dir = target.to_string_lossy().into_owned();

        let (result, out) = run_captured(&["instmon", "--help", "-removeDir", &dir]);
        assert_eq!(result.unwrap(), Outcome::Help);
        assert!(out.contains("Usage: instmon"));
        assert!(target.exists());
    }

    #[test]
    fn no_flags_is_success() {
        let (result, out) = run_captured(&["instmon"]);
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_options_file_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("nope.txt");
        let (result, _) = run_captured(&["instmon", "-file", &file.to_string_lossy()]);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read options file: "));
    }

    #[test]
    fn missing_value_is_fatal() {
        let (result, _) = run_captured(&["instmon", "-removeDir"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "-removeDir option requires an argument."
        );
    }

    #[test]
    fn dangling_wait_without_pid_is_ignored() {
        let (result, _) = run_captured(&["instmon", "-wait"]);
        assert_eq!(result.unwrap(), Outcome::Completed);
    }

    #[test]
    fn unknown_os_property_prints_nothing() {
        let (result, out) = run_captured(&["instmon", "-getOsProperty", "NOPE"]);
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert!(out.is_empty());
    }

    #[test]
    fn unsupported_passes_through_unchanged() {
        let err = platform_context::<()>(
            Err(PlatformError::Unsupported {
                operation: "-regDeleteKey".to_string(),
            }),
            || "Failed to delete registry key.".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "-regDeleteKey is only supported on Windows.");
    }

    #[test]
    fn other_platform_errors_get_context() {
        let err = platform_context::<()>(
            Err(PlatformError::UnknownFolder("CSIDL_X".to_string())),
            || "Failed to get special folder: CSIDL_X".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to get special folder: CSIDL_X");
        assert_eq!(err.chain().count(), 2);
    }

    #[test]
    fn collect_args_keeps_unicode() {
        let args = collect_args(["instmon", "-removeDir", "/opt/café"].map(OsString::from)).unwrap();
        assert_eq!(args, ["instmon", "-removeDir", "/opt/café"]);
    }

    #[cfg(unix)]
    #[test]
    fn collect_args_rejects_non_unicode_value() {
        use std::os::unix::ffi::OsStringExt as _;
        let args = vec![
            OsString::from("instmon"),
            OsString::from("-removeDir"),
            OsString::from_vec(b"/opt/caf\xE9".to_vec()),
        ];
        let err = collect_args(args).unwrap_err();
        assert!(matches!(
            err,
            OptionsError::InvalidValue { ref flag, ref reason, .. }
                if flag == "-removeDir" && reason == "not valid Unicode"
        ));
        assert!(err.to_string().starts_with("Invalid value '/opt/caf"));
    }

    #[cfg(not(windows))]
    #[test]
    fn registry_flags_fail_off_windows() {
        let (result, _) = run_captured(&["instmon", "-regDeleteKey", r"HKEY_CURRENT_USER\Software\Acme"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "-regDeleteKey is only supported on Windows."
        );
    }
}
