//! System mutations and platform services driven by the dispatcher.
//!
//! The filesystem and process primitives ([`tree`], [`path`], [`process`])
//! work against the [`crate::platform`] capability traits.  The Windows
//! services ([`registry`], [`shortcut`], [`shell`]) validate their input on
//! every platform and report [`crate::error::PlatformError::Unsupported`]
//! where the service does not exist.
pub mod path;
pub mod process;
pub mod registry;
pub mod shell;
pub mod shortcut;
pub mod tree;
