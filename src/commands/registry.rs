//! `-regSetValue`, `-regGetValue`, `-regDeleteValue`, `-regDeleteKey`.
use std::io::Write;

use anyhow::Result;

use crate::cli::Flag;
use crate::resources::registry::{self as reg, KeyPath, SetValue};

use super::{platform_context, require_windows};

/// Handle `-regSetValue "<key>,<name>,<value>,<type>"`.
///
/// # Errors
///
/// Returns an error if the request is malformed or the value cannot be set.
pub fn set(record: &str) -> Result<()> {
    require_windows(Flag::RegSetValue)?;
    let request = SetValue::parse(record);
    platform_context(request.and_then(|r| reg::set_value(&r)), || {
        "Failed to set registry value.".to_string()
    })?;
    tracing::info!("-regSetValue {record}");
    Ok(())
}

/// Handle `-regGetValue "<key>,<name>"`, printing the value.
///
/// # Errors
///
/// Returns an error if the value cannot be read or printed.
pub fn get(record: &str, out: &mut dyn Write) -> Result<()> {
    require_windows(Flag::RegGetValue)?;
    let value = platform_context(
        reg::parse_key_and_name(record).and_then(|(key, name)| reg::get_value(&key, &name)),
        || format!("Failed to get registry value {record}."),
    )?;
    writeln!(out, "{value}")?;
    Ok(())
}

/// Handle `-regDeleteValue "<key>,<name>"`.
///
/// # Errors
///
/// Returns an error if the value cannot be deleted.
pub fn delete_value(record: &str) -> Result<()> {
    require_windows(Flag::RegDeleteValue)?;
    platform_context(
        reg::parse_key_and_name(record).and_then(|(key, name)| reg::delete_value(&key, &name)),
        || "Failed to delete registry value.".to_string(),
    )?;
    tracing::info!("-regDeleteValue {record}");
    Ok(())
}

/// Handle `-regDeleteKey "<key>"`.
///
/// # Errors
///
/// Returns an error if the key cannot be deleted.
pub fn delete_key(key: &str) -> Result<()> {
    require_windows(Flag::RegDeleteKey)?;
    platform_context(KeyPath::parse(key).and_then(|k| reg::delete_key(&k)), || {
        "Failed to delete registry key.".to_string()
    })?;
    tracing::info!("-regDeleteKey {key}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn every_action_names_its_flag_off_windows() {
        let key = r"HKEY_CURRENT_USER\Software\Acme";
        let mut out = Vec::new();
        let cases = [
            (set(&format!("{key},n,v,string")), "-regSetValue"),
            (get(&format!("{key},n"), &mut out), "-regGetValue"),
            (delete_value(&format!("{key},n")), "-regDeleteValue"),
            (delete_key(key), "-regDeleteKey"),
        ];
        for (result, flag) in cases {
            assert_eq!(
                result.unwrap_err().to_string(),
                format!("{flag} is only supported on Windows.")
            );
        }
        assert!(out.is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn malformed_request_is_still_unsupported_off_windows() {
        let err = set("HKCU,n,v,qword").unwrap_err();
        assert_eq!(err.to_string(), "-regSetValue is only supported on Windows.");
    }

    #[cfg(windows)]
    #[test]
    fn malformed_request_gets_context() {
        let err = set(r"HKEY_CURRENT_USER\Software\Acme,n,v,qword").unwrap_err();
        assert_eq!(err.to_string(), "Failed to set registry value.");
    }
}
