//! Best-effort stripping of HTML/script fragments from free text.

use regex::Regex;

use crate::error::GuardError;

use super::compile_pattern;

/// Pattern for `<script>...</script>` blocks, including the tag content.
const SCRIPT_BLOCK_PATTERN: &str = r"(?is)<\s*script\b[^>]*>.*?</\s*script\s*>";

/// Pattern for `javascript:` URI scheme prefixes.
const JAVASCRIPT_SCHEME_PATTERN: &str = r"(?i)\bjavascript\s*:";

/// Pattern for inline event-handler attributes (`onload=`, `onerror=`, ...).
const EVENT_HANDLER_PATTERN: &str = r"(?i)\bon\w+\s*=";

/// Strips script-shaped fragments from user text.
///
/// This is a best-effort, defense-in-depth strip of the classic XSS shapes,
/// not a full HTML sanitizer. The requirement text feeds a prompt rather
/// than a browser, so stripping beats parsing here.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    script_block: Regex,
    javascript_scheme: Regex,
    event_handler: Regex,
}

impl Sanitizer {
    /// Compile the strip patterns.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GuardError> {
        Ok(Self {
            script_block: compile_pattern(SCRIPT_BLOCK_PATTERN)?,
            javascript_scheme: compile_pattern(JAVASCRIPT_SCHEME_PATTERN)?,
            event_handler: compile_pattern(EVENT_HANDLER_PATTERN)?,
        })
    }

    /// Strip matched fragments and trim surrounding whitespace.
    #[must_use]
    pub fn sanitize(&self, input: &str) -> String {
        let stripped = self.script_block.replace_all(input, "");
        let stripped = self.javascript_scheme.replace_all(&stripped, "");
        let stripped = self.event_handler.replace_all(&stripped, "");
        stripped.trim().to_string()
    }
}
