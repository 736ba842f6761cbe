//! Model-response parsing into a [`GeneratedScript`].

use serde_json::Value;

use crate::error::ScriptError;

use super::types::GeneratedScript;

/// Field names that must all be present in the model response.
pub const REQUIRED_FIELDS: &[&str] = &["script", "steps", "input_files", "output_files"];

/// Parse model output into a [`GeneratedScript`].
///
/// The content is parsed as JSON directly; if that fails, the substring
/// from the first `{` through the last `}` is parsed instead, recovering
/// from prose or code fences the model wrapped around the object. The
/// response must contain every field in [`REQUIRED_FIELDS`]; extra fields
/// are ignored.
///
/// Raw model content is logged at debug level on failure and never
/// carried in the returned error.
///
/// # Errors
///
/// Returns [`ScriptError::JsonParseFailed`] when no parseable JSON object
/// is found, or [`ScriptError::MissingField`] naming the first absent
/// required field.
pub fn parse_generation(content: &str) -> Result<GeneratedScript, ScriptError> {
    let trimmed = content.trim();
    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) => recover_embedded_object(trimmed)?,
    };

    let Some(object) = value.as_object() else {
        tracing::debug!(raw = trimmed, "Model output parsed but was not an object");
        return Err(ScriptError::JsonParseFailed {
            message: "response was not a JSON object".to_string(),
        });
    };
    for field in REQUIRED_FIELDS {
        if !object.contains_key(*field) {
            return Err(ScriptError::MissingField {
                field: (*field).to_string(),
            });
        }
    }

    serde_json::from_value(value).map_err(|e| ScriptError::JsonParseFailed {
        message: e.to_string(),
    })
}

/// Greedy recovery: first `{` through last `}`.
fn recover_embedded_object(content: &str) -> Result<Value, ScriptError> {
    let candidate = content.find('{').and_then(|start| {
        content[start..]
            .rfind('}')
            .map(|end| &content[start..=start + end])
    });
    let Some(candidate) = candidate else {
        tracing::debug!(raw = content, "Model output contained no JSON object");
        return Err(ScriptError::JsonParseFailed {
            message: "no JSON object found in model output".to_string(),
        });
    };

    serde_json::from_str(candidate).map_err(|e| {
        tracing::debug!(raw = content, "Recovered JSON candidate failed to parse");
        ScriptError::JsonParseFailed {
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn full_response() -> String {
        serde_json::json!({
            "script": "import pandas as pd\ndf = pd.read_csv('sales.csv')",
            "steps": [
                {"description": "Load sales data", "code": "pd.read_csv('sales.csv')"}
            ],
            "input_files": ["sales.csv"],
            "output_files": ["filtered.csv"],
        })
        .to_string()
    }

    #[test]
    fn test_parses_direct_json() {
        let script = parse_generation(&full_response()).unwrap();
        assert_eq!(script.input_files, vec!["sales.csv"]);
        assert_eq!(script.output_files, vec!["filtered.csv"]);
        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].description, "Load sales data");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let content = serde_json::json!({
            "script": "df = 1",
            "steps": [],
            "input_files": [],
            "output_files": [],
            "confidence": 0.9,
            "notes": "extra commentary",
        })
        .to_string();
        let script = parse_generation(&content).unwrap();
        assert_eq!(script.script, "df = 1");
    }

    #[test_case("script")]
    #[test_case("steps")]
    #[test_case("input_files")]
    #[test_case("output_files")]
    fn test_missing_field_is_named(field: &str) {
        let mut value = serde_json::from_str::<Value>(&full_response()).unwrap();
        value.as_object_mut().unwrap().remove(field);

        let result = parse_generation(&value.to_string());
        assert_eq!(
            result,
            Err(ScriptError::MissingField {
                field: field.to_string(),
            })
        );
    }

    #[test]
    fn test_recovers_object_wrapped_in_prose() {
        let content = format!(
            "Here is the generated script:\n\n{}\n\nLet me know if you need changes!",
            full_response()
        );
        let script = parse_generation(&content).unwrap();
        assert_eq!(script.input_files, vec!["sales.csv"]);
    }

    #[test]
    fn test_recovers_object_inside_code_fence() {
        let content = format!("```json\n{}\n```", full_response());
        let script = parse_generation(&content).unwrap();
        assert_eq!(script.output_files, vec!["filtered.csv"]);
    }

    #[test]
    fn test_braces_inside_script_string_survive_recovery() {
        let content = format!(
            "Sure:\n{}",
            serde_json::json!({
                "script": "mapping = {'a': 1}\nprint(mapping)",
                "steps": [],
                "input_files": [],
                "output_files": [],
            })
        );
        let script = parse_generation(&content).unwrap();
        assert!(script.script.contains("{'a': 1}"));
    }

    #[test]
    fn test_no_object_at_all() {
        let result = parse_generation("I could not generate a script for that request.");
        assert_eq!(
            result,
            Err(ScriptError::JsonParseFailed {
                message: "no JSON object found in model output".to_string(),
            })
        );
    }

    #[test]
    fn test_unparseable_candidate_reports_serde_error() {
        let result = parse_generation("prefix {\"script\": oops} suffix");
        assert!(matches!(result, Err(ScriptError::JsonParseFailed { .. })));
    }

    #[test]
    fn test_non_object_json_rejected() {
        let result = parse_generation("[1, 2, 3]");
        assert_eq!(
            result,
            Err(ScriptError::JsonParseFailed {
                message: "response was not a JSON object".to_string(),
            })
        );
    }

    #[test]
    fn test_wrong_field_type_reports_parse_failure() {
        let content = serde_json::json!({
            "script": "df = 1",
            "steps": "not a list",
            "input_files": [],
            "output_files": [],
        })
        .to_string();
        let result = parse_generation(&content);
        assert!(matches!(result, Err(ScriptError::JsonParseFailed { .. })));
    }

    #[test]
    fn test_step_without_code_still_parses() {
        let content = serde_json::json!({
            "script": "df = 1",
            "steps": [{"description": "Assign"}],
            "input_files": [],
            "output_files": [],
        })
        .to_string();
        let script = parse_generation(&content).unwrap();
        assert_eq!(script.steps[0].code, "");
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let content = format!("\n\n  {}  \n", full_response());
        assert!(parse_generation(&content).is_ok());
    }
}
