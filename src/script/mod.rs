//! Generated-script parsing, validation, and safety scanning.
//!
//! The model responds with a JSON object carrying the script and its
//! metadata. This module turns that text into a [`GeneratedScript`]:
//! parse (with greedy brace recovery), check the required fields, then
//! scan the script body for disallowed imports.

mod parsing;
mod safety;
mod types;

pub use parsing::{parse_generation, REQUIRED_FIELDS};
pub use safety::{ImportScanner, DISALLOWED_MODULES};
pub use types::{GeneratedScript, ScriptStep};

/// Default file name for the generated script.
pub const SCRIPT_FILE_NAME: &str = "pycture_script.py";
