//! Option sources: command-line resolution, the options file, and compound
//! argument records.
pub mod fields;
pub mod options_file;
pub mod resolver;

pub use fields::{Fields, trim_argument};
pub use resolver::{Lookup, Options};
