//! Generated-script data types.

use serde::{Deserialize, Serialize};

/// A validated script generation result.
///
/// All four fields are required in the model response; extra fields are
/// ignored during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedScript {
    /// The complete Python script.
    pub script: String,
    /// Per-step breakdown of what the script does.
    pub steps: Vec<ScriptStep>,
    /// Files the script reads.
    pub input_files: Vec<String>,
    /// Files the script writes.
    pub output_files: Vec<String>,
}

/// One step of the generated script.
///
/// Models sometimes omit one of the two fields per step, so both default
/// to empty rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Human-readable description of the step.
    #[serde(default)]
    pub description: String,
    /// The code fragment for the step.
    #[serde(default)]
    pub code: String,
}
