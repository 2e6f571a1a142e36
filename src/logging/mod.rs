//! Logging: the optional `-log` file and the `ERROR:` channel.
//!
//! Core code emits plain [`tracing`] events.  Where they end up is decided
//! once per run by [`init_subscriber`].

mod subscriber;
mod utils;

pub use subscriber::{LOG_ENV, fatal, init_subscriber, report};
