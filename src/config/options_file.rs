//! Options file: additional flags layered beneath the command line.
//!
//! Format, one option per line:
//!
//! ```text
//! -log /var/log/acme-uninstall.log
//! -removeDir "/opt/acme,/var/lib/acme"
//! -removeEmptyDir /opt
//! ```
//!
//! Each line is split at its first run of spaces or tabs.  The text before
//! becomes a flag token, the text after (if any) becomes the flag's value.
//! Lines are not trimmed first, so an indented line yields an empty token
//! followed by the whole option.  Blank lines contribute nothing.
use std::fs;
use std::path::Path;

use crate::error::OptionsError;

/// Load an options file into a synthetic argument vector.
///
/// Unlike the process argument vector there is no leading program name:
/// index 0 is the first flag of the file.
///
/// # Errors
///
/// Returns [`OptionsError::Io`] if the file cannot be opened or read.
pub fn load(path: &Path) -> Result<Vec<String>, OptionsError> {
    let content = fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let args = parse_from_str(&content);
    tracing::debug!("loaded {} option tokens from {}", args.len(), path.display());
    Ok(args)
}

/// Parse options-file content into an argument vector.
///
/// # Examples
///
/// ```
/// use instmon_cli::config::options_file::parse_from_str;
///
/// let args = parse_from_str("-pid 1234\n-removeDir /opt/acme\n");
/// assert_eq!(args, ["-pid", "1234", "-removeDir", "/opt/acme"]);
/// ```
#[must_use]
pub fn parse_from_str(content: &str) -> Vec<String> {
    let mut args = Vec::new();
    for line in content.lines() {
        if line.trim_matches(is_blank).is_empty() {
            continue;
        }
        match line.split_once(is_blank) {
            Some((flag, rest)) => {
                args.push(flag.to_string());
                let value = rest.trim_matches(is_blank);
                if !value.is_empty() {
                    args.push(value.to_string());
                }
            }
            None => args.push(line.to_string()),
        }
    }
    args
}

/// Spaces and tabs separate a flag from its value; `\r` is dropped so files
/// written with CRLF line endings parse the same way.
const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}
