//! Phrase and code pattern scanning for prompt injection attempts.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::GuardError;

use super::compile_pattern;

/// Zero-width characters stripped before phrase matching.
const ZERO_WIDTH_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// HTML whitespace entities decoded to a plain space before phrase matching.
const WHITESPACE_ENTITIES: &[&str] = &[
    "&nbsp;", "&#160;", "&#xa0;", "&ensp;", "&emsp;", "&thinsp;",
];

/// Phrase patterns matched against normalized input, with the category
/// reported on rejection.
///
/// The first pattern tolerates common letter substitutions of "ignore"
/// (`1gn0re`, `ignor3`, ...) and an intervening all/any/the.
const PHRASE_PATTERNS: &[(&str, &str)] = &[
    (
        r"[i1!|l][g9q]n[o0]r[e3]\s+(?:(?:all|any|the)\s+)?(?:previous|prior|above)\s+(?:instructions?|prompts?|rules?)",
        "instruction override",
    ),
    (r"you\s+are\s+now|act\s+as|pretend\s+to\s+be", "role manipulation"),
    (r"system\s+(?:override|prompt|mode|instruction)", "system probe"),
    (r"forget\s+(?:everything|all|previous|prior)", "memory reset"),
    (r"(?:new|different|updated)\s+instructions", "instruction injection"),
    (
        r"disregard\s+(?:[a-z]+\s+){0,3}(?:above|prior|previous)",
        "context disregard",
    ),
    (r"instead,?\s+(?:output|generate|create|write)", "output redirection"),
    (
        r"(?:override|bypass|disable)\s+(?:safety|security|filter)",
        "safety bypass",
    ),
    (r"reveal\s+your\s+(?:prompt|instructions|system)", "prompt extraction"),
];

/// Code patterns matched against the input as given.
///
/// Normalization would mangle what a pasted snippet actually says, so
/// these run on the unnormalized text.
const CODE_PATTERNS: &[(&str, &str)] = &[
    (r"import\s+(?:os|subprocess|sys|eval|exec)\b", "python import"),
    (r"__import__", "dynamic import"),
    (r"exec\s*\(", "code execution"),
    (r"eval\s*\(", "code execution"),
];

/// Scans free-text input for prompt injection attempts.
///
/// Matching is two-tiered: phrase patterns run over a normalized copy of
/// the input (decomposed Unicode, whitespace entities flattened, zero-width
/// characters stripped, lowercased), while code patterns run over the
/// original text. Pattern matching reduces injection risk; it does not
/// eliminate it.
#[derive(Debug, Clone)]
pub struct InjectionDetector {
    phrase_patterns: Vec<(Regex, &'static str)>,
    code_patterns: Vec<(Regex, &'static str)>,
}

impl InjectionDetector {
    /// Compile the phrase and code pattern tables.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GuardError> {
        Ok(Self {
            phrase_patterns: compile_table(PHRASE_PATTERNS)?,
            code_patterns: compile_table(CODE_PATTERNS)?,
        })
    }

    /// Scan input; `Some(category)` names the first matched pattern family.
    #[must_use]
    pub fn scan(&self, input: &str) -> Option<&'static str> {
        let normalized = normalize(input);
        for (regex, category) in &self.phrase_patterns {
            if regex.is_match(&normalized) {
                tracing::warn!(
                    category = %category,
                    "Input matched an injection phrase pattern"
                );
                return Some(category);
            }
        }

        for (regex, category) in &self.code_patterns {
            if regex.is_match(input) {
                tracing::warn!(category = %category, "Input matched a code pattern");
                return Some(category);
            }
        }

        None
    }
}

/// Compile a pattern table, keeping each category label.
fn compile_table(
    table: &[(&str, &'static str)],
) -> Result<Vec<(Regex, &'static str)>, GuardError> {
    table
        .iter()
        .map(|&(pattern, category)| Ok((compile_pattern(pattern)?, category)))
        .collect()
}

/// Flatten the tricks that hide a phrase from a regex: decomposed Unicode,
/// whitespace entities, non-breaking and zero-width characters, mixed case.
fn normalize(input: &str) -> String {
    let decomposed: String = input.nfd().collect();
    let mut lowered = decomposed.to_lowercase();
    for entity in WHITESPACE_ENTITIES {
        lowered = lowered.replace(entity, " ");
    }
    lowered
        .chars()
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .filter(|c| !ZERO_WIDTH_CHARS.contains(c))
        .collect()
}
