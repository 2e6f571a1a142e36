//! Installer support engine.
//!
//! Helper invoked by installers and uninstallers to tidy up after
//! themselves: wait for a process to exit, remove directory trees, create
//! shortcuts, and (on Windows) touch the registry and query the shell.
//! Every action is selected by a single-dash flag, either on the command
//! line or in an options file.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — compound-record tokenizer, options file, flag resolution
//! - **[`platform`]** — filesystem and process-table capabilities
//! - **[`resources`]** — tree removal, path creation, process waits, platform services
//! - **[`commands`]** — the dispatcher that runs the requested actions in order
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
