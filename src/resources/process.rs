//! Waiting for another process to terminate.
use std::time::Duration;

use crate::error::{OptionsError, WaitError};
use crate::platform::{ProcessId, ProcessTable};

/// Interval between liveness polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait for a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitLimit {
    /// Poll until the process is gone.
    Unbounded,
    /// Give up after this many polls (one per second).
    Seconds(u64),
}

impl WaitLimit {
    /// Parse a `-wait` value: `-1` means unbounded, other values must be
    /// non-negative integers.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidValue`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use instmon_cli::resources::process::WaitLimit;
    ///
    /// assert_eq!(WaitLimit::parse("-1").unwrap(), WaitLimit::Unbounded);
    /// assert_eq!(WaitLimit::parse("30").unwrap(), WaitLimit::Seconds(30));
    /// assert!(WaitLimit::parse("-5").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, OptionsError> {
        let invalid = |reason: &str| OptionsError::InvalidValue {
            flag: "-wait".to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let seconds: i64 = value.trim().parse().map_err(|_| invalid("not an integer"))?;
        match seconds {
            -1 => Ok(Self::Unbounded),
            s if s < 0 => Err(invalid("must be -1 or a non-negative number of seconds")),
            s => u64::try_from(s)
                .map(Self::Seconds)
                .map_err(|_| invalid("out of range")),
        }
    }
}

/// Parse a `-pid` value.
///
/// `-1` is the "no process" sentinel.  Zero and other negative values name
/// process groups rather than a single process and are rejected.
///
/// # Errors
///
/// Returns [`OptionsError::InvalidValue`] if the value is not an integer,
/// is zero, or is below `-1`.
pub fn parse_pid(value: &str) -> Result<ProcessId, OptionsError> {
    let invalid = |reason: &str| OptionsError::InvalidValue {
        flag: "-pid".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let raw: i64 = value.trim().parse().map_err(|_| invalid("not an integer"))?;
    match raw {
        -1 => Ok(ProcessId::NONE),
        r if r < 1 => Err(invalid("must be -1 or a positive process id")),
        r => Ok(ProcessId::from_raw(r)),
    }
}

/// Block until `pid` is no longer alive or `limit` polls have elapsed.
///
/// The "no process" sentinel returns immediately.  Liveness is checked
/// before every sleep, so a process that is already gone never causes a
/// sleep.
///
/// # Errors
///
/// Returns [`WaitError::Timeout`] if the process is still alive once the
/// bound is reached.
pub fn wait_for_exit(pt: &dyn ProcessTable, pid: ProcessId, limit: WaitLimit) -> Result<(), WaitError> {
    if pid.is_none() {
        return Ok(());
    }

    let mut polls: u64 = 0;
    loop {
        if !pt.is_alive(pid) {
            tracing::debug!("process {pid} terminated after {polls}s");
            return Ok(());
        }
        if let WaitLimit::Seconds(max) = limit
            && polls >= max
        {
            tracing::info!("[wait] timed out waiting for process {pid}");
            return Err(WaitError::Timeout {
                pid: pid.raw(),
                seconds: max,
            });
        }
        pt.sleep(POLL_INTERVAL);
        polls += 1;
    }
}
