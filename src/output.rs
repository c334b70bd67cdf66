//! @ai:module:intent Format diagnostics and parsed functions for text or JSON output
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_diagnostic, format_diagnostics, format_functions
//! @ai:module:depends_on diagnostic, model
//! @ai:module:stateless true

use crate::diagnostic::{Diagnostic, Severity, EXCERPT_WIDTH};
use crate::model::Function;
use colored::Colorize;
use std::path::Path;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Render one diagnostic with a caret under the offending column
/// @ai:example (ignorable at line 4, column 2) -> "PARSE ERROR | At line 4 -- ...\n(ignorable) | <source>\n            |   ^\n"
/// @ai:effects pure
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let tag = match diag.severity {
        Severity::Critical => "CRITICAL :(".red().bold(),
        Severity::Ignorable => "(ignorable)".yellow(),
    };
    let (excerpt, column) = diag.excerpt(EXCERPT_WIDTH);

    format!(
        "{} | At line {} -- {}\n{} | {}\n{} | {}^\n",
        "PARSE ERROR".bold(),
        diag.line,
        diag.message,
        tag,
        excerpt,
        " ".repeat(11),
        " ".repeat(column)
    )
}

/// @ai:intent Format the diagnostics raised for one outline
/// @ai:effects pure
pub fn format_diagnostics(path: &Path, diagnostics: &[Diagnostic], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(diagnostics).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(diagnostics).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = String::new();
            if !diagnostics.is_empty() {
                output.push_str(&format!("{}\n", path.display().to_string().bold()));
            }
            for diag in diagnostics {
                output.push_str(&format_diagnostic(diag));
            }
            output
        }
    }
}

/// @ai:intent Format a summary of the functions parsed from one outline
/// @ai:effects pure
pub fn format_functions(path: &Path, functions: &[Function], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(functions).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(functions).unwrap_or_default(),
        OutputFormat::Text => format_functions_text(path, functions),
    }
}

fn format_functions_text(path: &Path, functions: &[Function]) -> String {
    let mut output = format!("{}\n", path.display().to_string().bold());
    output.push_str(&format!("  Functions ({}):\n", functions.len()));

    for func in functions {
        let status = if func.is_complete() {
            "complete".green()
        } else {
            "incomplete".yellow()
        };
        output.push_str(&format!(
            "    {}({}) -> {} [{}]\n",
            func.name.cyan(),
            func.parameter_names().join(", "),
            func.return_type,
            status
        ));
        output.push_str(&format!(
            "      examples: {}, outline steps: {}\n",
            func.examples.len(),
            func.outline.len()
        ));

        let missing = func.validate_completion();
        if !missing.is_empty() {
            let fields: Vec<String> = missing.iter().map(ToString::to_string).collect();
            output.push_str(&format!("      {} {}\n", "missing:".dimmed(), fields.join(", ")));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_diagnostic_places_caret() {
        plain();
        let diag = Diagnostic::ignorable(4, 11, "Unclosed '[' - ']' added", "EXAMPLE  | [1 2 -> 3");
        let text = format_diagnostic(&diag);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PARSE ERROR | At line 4 -- Unclosed '[' - ']' added");
        assert_eq!(lines[1], "(ignorable) | EXAMPLE  | [1 2 -> 3");
        assert_eq!(lines[2], format!("{} | {}^", " ".repeat(11), " ".repeat(11)));
    }

    #[test]
    fn test_format_critical_diagnostic() {
        plain();
        let diag = Diagnostic::critical(2, 0, "Arrow (->) is expected in CONTRACT", "CONTRACT | foo");
        assert!(format_diagnostic(&diag).contains("CRITICAL :( | CONTRACT | foo"));
    }

    #[test]
    fn test_format_functions_text() {
        plain();
        let func = Function::new("getFuel", vec!["None".to_string()], "int");
        let text = format_functions(Path::new("lander.oln.py"), &[func], OutputFormat::Text);

        assert!(text.contains("Functions (1):"));
        assert!(text.contains("getFuel() -> int [incomplete]"));
        assert!(text.contains("purpose, body outline"));
    }

    #[test]
    fn test_format_diagnostics_json() {
        let diag = Diagnostic::ignorable(1, 0, "oops", "x");
        let json = format_diagnostics(Path::new("f.oln.py"), &[diag], OutputFormat::Json);
        assert!(json.contains("\"severity\":\"ignorable\""));
        assert!(json.contains("\"line\":1"));
    }
}
