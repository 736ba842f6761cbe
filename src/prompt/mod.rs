//! Outbound prompt assembly.
//!
//! One prompt shape: a fixed knowledge-base preamble describing the
//! Alteryx-to-pandas conversion conventions, a rendered block of staged
//! file summaries, the user's requirement, and a fixed instruction block
//! pinning the JSON response format.

#![allow(clippy::missing_const_for_fn)]

use crate::files::FileMetadata;

/// Maximum column names rendered per file before eliding the rest.
pub const MAX_PROMPT_COLUMNS: usize = 40;

/// Knowledge-base preamble describing the conversion conventions.
#[must_use]
pub fn knowledge_base_prompt() -> &'static str {
    r#"You are an expert at converting Alteryx workflow descriptions into Python pandas scripts.

Conversion conventions:
- Input Data tool -> pd.read_csv / pd.read_excel
- Filter tool -> boolean indexing, e.g. df[df["amount"] > 1000]
- Summarize tool -> groupby with agg
- Join tool -> pd.merge on the stated key columns
- Select tool -> column selection and renaming
- Formula tool -> column assignment or assign
- Sort tool -> sort_values
- Union tool -> pd.concat
- Unique tool -> drop_duplicates
- Output Data tool -> to_csv / to_excel

The generated script must:
1. Use only pandas and numpy
2. Read the listed input files by their given names
3. Mark each step with a comment naming the Alteryx tool it replaces
4. Write results to clearly named output files"#
}

/// Instruction block demanding the strict four-field JSON response.
#[must_use]
pub fn response_format_prompt() -> &'static str {
    r#"Respond with a JSON object in this exact format:
{
  "script": "The complete Python script as a single string",
  "steps": [
    {
      "description": "What this step does",
      "code": "The code fragment for this step"
    }
  ],
  "input_files": ["Files the script reads"],
  "output_files": ["Files the script writes"]
}

Important:
- Respond with the JSON object only, no surrounding prose
- The script must be complete and runnable as-is
- Import nothing beyond pandas and numpy"#
}

/// Assemble the single outbound prompt for one generation request.
///
/// Layout is fixed: preamble, staged-file summaries (`None` when no files
/// were supplied), the sanitized requirement, then the response-format
/// instruction block.
#[must_use]
pub fn build_prompt(requirement: &str, files: &[FileMetadata]) -> String {
    format!(
        "{}\n\nInput files:\n{}\n\nUser requirement:\n{}\n\n{}",
        knowledge_base_prompt(),
        render_file_summaries(files),
        requirement,
        response_format_prompt()
    )
}

fn render_file_summaries(files: &[FileMetadata]) -> String {
    if files.is_empty() {
        return "None".to_string();
    }
    files
        .iter()
        .map(render_file_summary)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_file_summary(meta: &FileMetadata) -> String {
    let mut summary = format!("- {} ({} rows)", meta.file_name, meta.row_count);
    summary.push_str("\n  Columns: ");
    summary.push_str(&render_columns(&meta.columns));
    if !meta.sample_rows.is_empty() {
        summary.push_str("\n  Sample rows:");
        for row in &meta.sample_rows {
            summary.push_str("\n    ");
            summary.push_str(&row.join(", "));
        }
    }
    summary
}

fn render_columns(columns: &[String]) -> String {
    if columns.is_empty() {
        return "(none)".to_string();
    }
    if columns.len() > MAX_PROMPT_COLUMNS {
        let shown = columns[..MAX_PROMPT_COLUMNS].join(", ");
        format!("{shown} (+{} more)", columns.len() - MAX_PROMPT_COLUMNS)
    } else {
        columns.join(", ")
    }
}
