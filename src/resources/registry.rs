//! Windows registry access.
//!
//! Key paths are fully qualified (`HKEY_CURRENT_USER\Software\Acme`).  Path
//! parsing and record splitting work everywhere; reading and writing use
//! the `winreg` crate and are only available on Windows.  Elsewhere every
//! access fails with [`PlatformError::Unsupported`].
use std::fmt;

use crate::config::Fields;
use crate::error::PlatformError;

/// Separator between the hive and the components of a key path.
const KEY_SEPARATOR: char = '\\';

/// Root key of a registry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    /// `HKEY_CLASSES_ROOT`
    ClassesRoot,
    /// `HKEY_CURRENT_CONFIG`
    CurrentConfig,
    /// `HKEY_CURRENT_USER`
    CurrentUser,
    /// `HKEY_LOCAL_MACHINE`
    LocalMachine,
    /// `HKEY_USERS`
    Users,
}

impl Hive {
    const ALL: [Self; 5] = [
        Self::ClassesRoot,
        Self::CurrentConfig,
        Self::CurrentUser,
        Self::LocalMachine,
        Self::Users,
    ];

    /// Canonical hive name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClassesRoot => "HKEY_CLASSES_ROOT",
            Self::CurrentConfig => "HKEY_CURRENT_CONFIG",
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::Users => "HKEY_USERS",
        }
    }

    /// Look up a hive by its exact canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|hive| hive.name() == name)
    }

    #[cfg(windows)]
    fn open(self) -> winreg::RegKey {
        use winreg::enums::{
            HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
            HKEY_USERS,
        };
        winreg::RegKey::predef(match self {
            Self::ClassesRoot => HKEY_CLASSES_ROOT,
            Self::CurrentConfig => HKEY_CURRENT_CONFIG,
            Self::CurrentUser => HKEY_CURRENT_USER,
            Self::LocalMachine => HKEY_LOCAL_MACHINE,
            Self::Users => HKEY_USERS,
        })
    }
}

/// A parsed, fully qualified registry key path.
///
/// # Examples
///
/// ```
/// use instmon_cli::resources::registry::{Hive, KeyPath};
///
/// let key = KeyPath::parse(r"HKEY_LOCAL_MACHINE\\SOFTWARE\Acme").unwrap();
/// assert_eq!(key.hive(), Hive::LocalMachine);
/// assert_eq!(key.subkey(), r"SOFTWARE\Acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    hive: Hive,
    subkey: String,
}

impl KeyPath {
    /// Split `path` into hive and subkey.  Repeated separators after the
    /// hive are skipped; a bare hive name addresses the hive itself.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRegistry`] if the hive is unknown.
    pub fn parse(path: &str) -> Result<Self, PlatformError> {
        let (hive_name, subkey) = path
            .split_once(KEY_SEPARATOR)
            .map_or((path, ""), |(hive, rest)| {
                (hive, rest.trim_start_matches(KEY_SEPARATOR))
            });
        let hive = Hive::from_name(hive_name).ok_or_else(|| {
            tracing::info!("[registry] Unknown key: {path}");
            PlatformError::InvalidRegistry(format!("unknown registry hive in '{path}'"))
        })?;
        Ok(Self {
            hive,
            subkey: subkey.to_string(),
        })
    }

    /// Root hive.
    #[must_use]
    pub const fn hive(&self) -> Hive {
        self.hive
    }

    /// Path below the hive (may be empty).
    #[must_use]
    pub fn subkey(&self) -> &str {
        &self.subkey
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subkey.is_empty() {
            f.write_str(self.hive.name())
        } else {
            write!(f, "{}{KEY_SEPARATOR}{}", self.hive.name(), self.subkey)
        }
    }
}

/// Data written by `-regSetValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueData {
    /// `REG_SZ`
    String(String),
    /// `REG_DWORD`
    Dword(u32),
}

impl ValueData {
    /// Interpret `value` according to the `string` / `dword` type name.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRegistry`] for an unknown type or a
    /// `dword` that is not a decimal 32-bit number.
    pub fn parse(value: &str, kind: &str) -> Result<Self, PlatformError> {
        match kind {
            "string" => Ok(Self::String(value.to_string())),
            "dword" => value.parse().map(Self::Dword).map_err(|_| {
                PlatformError::InvalidRegistry(format!("'{value}' is not a valid dword"))
            }),
            other => {
                tracing::info!("[registry] Unknown value type: {other}");
                Err(PlatformError::InvalidRegistry(format!(
                    "unknown value type '{other}'"
                )))
            }
        }
    }
}

/// A `<key>,<name>,<value>,<type>` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetValue {
    /// Key to create or open.
    pub key: KeyPath,
    /// Value name.
    pub name: String,
    /// Typed data.
    pub data: ValueData,
}

impl SetValue {
    /// Parse a `-regSetValue` record.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRegistry`] if the key or the typed
    /// value is malformed.
    pub fn parse(record: &str) -> Result<Self, PlatformError> {
        let [key, name, value, kind] = Fields::start(record).take_padded();
        Ok(Self {
            key: KeyPath::parse(&key)?,
            name,
            data: ValueData::parse(&value, &kind)?,
        })
    }
}

/// Parse a `<key>,<name>` record.
///
/// # Errors
///
/// Returns [`PlatformError::InvalidRegistry`] if the key is malformed.
pub fn parse_key_and_name(record: &str) -> Result<(KeyPath, String), PlatformError> {
    let [key, name] = Fields::start(record).take_padded();
    Ok((KeyPath::parse(&key)?, name))
}

/// Create the key if needed and write the value.
///
/// # Errors
///
/// Returns [`PlatformError::Registry`] on failure, or
/// [`PlatformError::Unsupported`] outside Windows.
pub fn set_value(request: &SetValue) -> Result<(), PlatformError> {
    #[cfg(windows)]
    {
        let (key, _) = request
            .key
            .hive()
            .open()
            .create_subkey(request.key.subkey())
            .map_err(|source| registry_error("create", &request.key, source))?;
        let result = match &request.data {
            ValueData::String(s) => key.set_value(&request.name, s),
            ValueData::Dword(d) => key.set_value(&request.name, d),
        };
        result.map_err(|source| registry_error("set", &request.key, source))?;
        tracing::debug!("set {}\\{}", request.key, request.name);
        Ok(())
    }
    #[cfg(not(windows))]
    {
        let _ = request;
        Err(unsupported("-regSetValue"))
    }
}

/// Read a value; DWORDs are rendered in decimal, strings verbatim.
///
/// # Errors
///
/// Returns [`PlatformError::Registry`] if the key or value cannot be read,
/// [`PlatformError::InvalidRegistry`] for other value types, or
/// [`PlatformError::Unsupported`] outside Windows.
pub fn get_value(key: &KeyPath, name: &str) -> Result<String, PlatformError> {
    #[cfg(windows)]
    {
        use winreg::enums::{KEY_READ, RegType};
        let handle = key
            .hive()
            .open()
            .open_subkey_with_flags(key.subkey(), KEY_READ)
            .map_err(|source| registry_error("open", key, source))?;
        let raw = handle
            .get_raw_value(name)
            .map_err(|source| registry_error("query", key, source))?;
        match raw.vtype {
            RegType::REG_DWORD => handle
                .get_value::<u32, _>(name)
                .map(|d| d.to_string())
                .map_err(|source| registry_error("query", key, source)),
            RegType::REG_SZ | RegType::REG_EXPAND_SZ => handle
                .get_value::<String, _>(name)
                .map_err(|source| registry_error("query", key, source)),
            other => Err(PlatformError::InvalidRegistry(format!(
                "value {name} has unsupported type {other:?}"
            ))),
        }
    }
    #[cfg(not(windows))]
    {
        let _ = (key, name);
        Err(unsupported("-regGetValue"))
    }
}

/// Delete a named value.
///
/// # Errors
///
/// Returns [`PlatformError::Registry`] on failure, or
/// [`PlatformError::Unsupported`] outside Windows.
pub fn delete_value(key: &KeyPath, name: &str) -> Result<(), PlatformError> {
    #[cfg(windows)]
    {
        use winreg::enums::KEY_ALL_ACCESS;
        let handle = key
            .hive()
            .open()
            .open_subkey_with_flags(key.subkey(), KEY_ALL_ACCESS)
            .map_err(|source| {
                tracing::info!("[registry] Failed to open key: {key}");
                registry_error("open", key, source)
            })?;
        handle.delete_value(name).map_err(|source| {
            tracing::info!("[registry] Failed to delete value: {key}, {name}");
            registry_error("delete value", key, source)
        })
    }
    #[cfg(not(windows))]
    {
        let _ = (key, name);
        Err(unsupported("-regDeleteValue"))
    }
}

/// Delete a key that has no subkeys.
///
/// # Errors
///
/// Returns [`PlatformError::Registry`] on failure, or
/// [`PlatformError::Unsupported`] outside Windows.
pub fn delete_key(key: &KeyPath) -> Result<(), PlatformError> {
    #[cfg(windows)]
    {
        key.hive().open().delete_subkey(key.subkey()).map_err(|source| {
            tracing::info!("[registry] Failed to delete key: {key}");
            registry_error("delete key", key, source)
        })
    }
    #[cfg(not(windows))]
    {
        let _ = key;
        Err(unsupported("-regDeleteKey"))
    }
}

#[cfg(windows)]
fn registry_error(operation: &'static str, key: &KeyPath, source: std::io::Error) -> PlatformError {
    PlatformError::Registry {
        operation,
        key: key.to_string(),
        source,
    }
}

#[cfg(not(windows))]
fn unsupported(operation: &str) -> PlatformError {
    PlatformError::Unsupported {
        operation: operation.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // KeyPath
    // -----------------------------------------------------------------------

    #[test]
    fn parses_every_hive() {
        for hive in Hive::ALL {
            let key = KeyPath::parse(&format!(r"{}\Software", hive.name())).unwrap();
            assert_eq!(key.hive(), hive);
            assert_eq!(key.subkey(), "Software");
        }
    }

    #[test]
    fn repeated_separators_are_skipped() {
        let key = KeyPath::parse(r"HKEY_CURRENT_USER\\\Software\Acme").unwrap();
        assert_eq!(key.subkey(), r"Software\Acme");
        assert_eq!(key.to_string(), r"HKEY_CURRENT_USER\Software\Acme");
    }

    #[test]
    fn bare_hive_has_empty_subkey() {
        let key = KeyPath::parse("HKEY_USERS").unwrap();
        assert_eq!(key.hive(), Hive::Users);
        assert_eq!(key.subkey(), "");
        assert_eq!(key.to_string(), "HKEY_USERS");
    }

    #[test]
    fn unknown_hive_is_rejected() {
        for bad in [r"HKCU\Software", r"hkey_current_user\Software", ""] {
            let err = KeyPath::parse(bad).unwrap_err();
            assert!(matches!(err, PlatformError::InvalidRegistry(_)), "{bad}");
        }
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    #[test]
    fn set_value_record_string() {
        let req = SetValue::parse(r#""HKEY_CURRENT_USER\Software\Acme", "InstallDir", "C:\Acme", string"#)
            .unwrap();
        assert_eq!(req.key.subkey(), r"Software\Acme");
        assert_eq!(req.name, "InstallDir");
        assert_eq!(req.data, ValueData::String(r"C:\Acme".into()));
    }

    #[test]
    fn set_value_record_dword() {
        let req = SetValue::parse(r"HKEY_LOCAL_MACHINE\SOFTWARE\Acme,Version,42,dword").unwrap();
        assert_eq!(req.data, ValueData::Dword(42));
    }

    #[test]
    fn set_value_rejects_bad_type_and_data() {
        assert!(SetValue::parse(r"HKEY_USERS\x,n,1,qword").is_err());
        assert!(SetValue::parse(r"HKEY_USERS\x,n,abc,dword").is_err());
        assert!(SetValue::parse(r"HKEY_USERS\x,n,-1,dword").is_err());
        assert!(SetValue::parse(r"HKEY_USERS\x,n").is_err());
    }

    #[test]
    fn key_and_name_record() {
        let (key, name) = parse_key_and_name(r"HKEY_CURRENT_USER\Software\Acme,Path").unwrap();
        assert_eq!(key.hive(), Hive::CurrentUser);
        assert_eq!(name, "Path");

        let (_, missing) = parse_key_and_name(r"HKEY_CURRENT_USER\Software\Acme").unwrap();
        assert_eq!(missing, "");
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    #[cfg(not(windows))]
    #[test]
    fn access_is_unsupported_off_windows() {
        let key = KeyPath::parse(r"HKEY_CURRENT_USER\Software\Acme").unwrap();
        let err = delete_key(&key).unwrap_err();
        assert_eq!(err.to_string(), "-regDeleteKey is only supported on Windows.");
        assert!(get_value(&key, "x").is_err());
        assert!(delete_value(&key, "x").is_err());
        let req = SetValue::parse(r"HKEY_CURRENT_USER\Software\Acme,n,v,string").unwrap();
        assert!(matches!(
            set_value(&req).unwrap_err(),
            PlatformError::Unsupported { .. }
        ));
    }

    #[cfg(windows)]
    #[test]
    fn round_trip_under_current_user() {
        let path = format!(
            r"HKEY_CURRENT_USER\Software\instmon-test-{}",
            std::process::id()
        );
        let key = KeyPath::parse(&path).unwrap();
        set_value(&SetValue::parse(&format!("{path},Count,7,dword")).unwrap()).unwrap();
        set_value(&SetValue::parse(&format!("{path},Name,acme,string")).unwrap()).unwrap();
        assert_eq!(get_value(&key, "Count").unwrap(), "7");
        assert_eq!(get_value(&key, "Name").unwrap(), "acme");
        delete_value(&key, "Name").unwrap();
        assert!(get_value(&key, "Name").is_err());
        delete_key(&key).unwrap();
    }
}
