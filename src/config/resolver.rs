//! Option resolution across the command line and the options file.
//!
//! The command line always wins: a flag is looked up in the process
//! arguments first (skipping the program name at index 0) and only when it
//! is absent there is the options file consulted.
use crate::cli::Flag;
use crate::error::OptionsError;

use super::fields::trim_argument;

/// Outcome of looking up one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The flag occurs in neither source.
    Absent,
    /// A value-less flag is present.
    Present,
    /// A value-taking flag is present with this (trimmed) value.
    Value(String),
}

/// The two layered argument sources of one invocation.
///
/// # Examples
///
/// ```
/// use instmon_cli::cli::Flag;
/// use instmon_cli::config::resolver::{Lookup, Options};
///
/// let cli = vec!["instmon".to_string(), "-log".to_string(), "override.txt".to_string()];
/// let file = vec!["-log".to_string(), "out.txt".to_string()];
/// let options = Options::new(cli).with_file_args(file);
/// assert_eq!(options.resolve(Flag::Log).unwrap(), Lookup::Value("override.txt".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    cli: Vec<String>,
    file: Vec<String>,
}

impl Options {
    /// Wrap the process argument vector (program name at index 0).
    #[must_use]
    pub const fn new(cli: Vec<String>) -> Self {
        Self {
            cli,
            file: Vec::new(),
        }
    }

    /// Layer an options-file vector beneath the command line.
    #[must_use]
    pub fn with_file_args(mut self, file: Vec<String>) -> Self {
        self.file = file;
        self
    }

    /// Replace the options-file vector in place.
    pub fn set_file_args(&mut self, file: Vec<String>) {
        self.file = file;
    }

    /// Look up `flag` under each of its names.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MissingArgument`] if a value-taking flag is
    /// the last token of the source it was found in.
    pub fn resolve(&self, flag: Flag) -> Result<Lookup, OptionsError> {
        for name in flag.names() {
            let found = resolve(&self.cli, &self.file, name, flag.takes_value())?;
            if found != Lookup::Absent {
                return Ok(found);
            }
        }
        Ok(Lookup::Absent)
    }

    /// Value of a value-taking flag, or `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MissingArgument`] if the flag has no
    /// following token.
    pub fn value(&self, flag: Flag) -> Result<Option<String>, OptionsError> {
        Ok(match self.resolve(flag)? {
            Lookup::Value(value) => Some(value),
            Lookup::Absent | Lookup::Present => None,
        })
    }

    /// Whether a flag occurs in either source.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MissingArgument`] for a value-taking flag
    /// without a following token.
    pub fn is_present(&self, flag: Flag) -> Result<bool, OptionsError> {
        Ok(self.resolve(flag)? != Lookup::Absent)
    }
}

/// Resolve `name` from the command line, falling back to the options file.
///
/// `cli` carries the program name at index 0; `file` has none.
///
/// # Errors
///
/// Returns [`OptionsError::MissingArgument`] if `takes_value` is set and the
/// matching token is the last one of its source.
pub fn resolve(
    cli: &[String],
    file: &[String],
    name: &str,
    takes_value: bool,
) -> Result<Lookup, OptionsError> {
    match scan(cli.get(1..).unwrap_or_default(), name, takes_value)? {
        Lookup::Absent => scan(file, name, takes_value),
        found => Ok(found),
    }
}

/// Find the first exact occurrence of `name` in `args`.
fn scan(args: &[String], name: &str, takes_value: bool) -> Result<Lookup, OptionsError> {
    let Some(index) = args.iter().position(|arg| arg == name) else {
        return Ok(Lookup::Absent);
    };
    if !takes_value {
        return Ok(Lookup::Present);
    }
    args.get(index + 1).map_or_else(
        || Err(OptionsError::MissingArgument(name.to_string())),
        |value| Ok(Lookup::Value(trim_argument(value).to_string())),
    )
}
