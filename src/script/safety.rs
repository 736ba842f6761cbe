//! Disallowed-import scanning over generated scripts.

use regex::Regex;

use crate::error::GuardError;
use crate::guard::compile_pattern;

/// Python modules a generated script must not import.
pub const DISALLOWED_MODULES: &[&str] = &[
    "os",
    "subprocess",
    "sys",
    "eval",
    "exec",
    "__import__",
    "pickle",
    "shelve",
];

/// Scans generated script text for disallowed module imports.
///
/// Each module is matched as `import <module>` or `from <module>`,
/// case-insensitive, anywhere in the script. This is a textual check on
/// model output, not a Python parser; obfuscated imports can slip past
/// it, so it reduces rather than eliminates the risk.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    patterns: Vec<(Regex, &'static str)>,
}

impl ImportScanner {
    /// Compile one pattern per disallowed module.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GuardError> {
        let patterns = DISALLOWED_MODULES
            .iter()
            .map(|&module| {
                let pattern = format!(r"(?i)\b(?:import|from)\s+{}\b", regex::escape(module));
                Ok((compile_pattern(&pattern)?, module))
            })
            .collect::<Result<Vec<_>, GuardError>>()?;
        Ok(Self { patterns })
    }

    /// Scan a script; `Some(module)` names the first disallowed module hit,
    /// in [`DISALLOWED_MODULES`] order.
    #[must_use]
    pub fn scan(&self, script: &str) -> Option<&'static str> {
        for (regex, module) in &self.patterns {
            if regex.is_match(script) {
                tracing::warn!(
                    module = %module,
                    "Generated script references a disallowed module"
                );
                return Some(module);
            }
        }
        None
    }
}
