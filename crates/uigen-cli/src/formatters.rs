//! Output formatters for CLI commands.
//!
//! Every command builds a serializable report and hands it to
//! [`format_output`], so the three output modes carry the same fields.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use uigen_core::cli::OutputFormat;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use uigen_cli::formatters::format_output;
/// use uigen_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Report {
///     state: String,
///     files: usize,
/// }
///
/// let report = Report { state: "ready".to_string(), files: 2 };
///
/// let output = format_output(&report, OutputFormat::Json)?;
/// assert!(output.contains("\"state\": \"ready\""));
///
/// let output = format_output(&report, OutputFormat::Text)?;
/// assert!(output.lines().any(|line| line == "state: ready"));
/// assert!(output.lines().any(|line| line == "files: 2"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => {
            let value = serde_json::to_value(data)?;
            Ok(render(&value, &Plain, 0))
        }
        OutputFormat::Pretty => {
            let value = serde_json::to_value(data)?;
            Ok(render(&value, &Colored, 0))
        }
    }
}

/// A status line: a check mark or a cross, then the message.
#[must_use]
pub fn status_line(ok: bool, message: &str, format: OutputFormat) -> String {
    match (format, ok) {
        (OutputFormat::Pretty, true) => format!("{} {message}", "✓".green().bold()),
        (OutputFormat::Pretty, false) => format!("{} {message}", "✗".red().bold()),
        (_, true) => format!("ok: {message}"),
        (_, false) => format!("error: {message}"),
    }
}

trait Style {
    fn key(&self, key: &str) -> String;
    fn scalar(&self, value: &serde_json::Value) -> String;
}

struct Plain;

impl Style for Plain {
    fn key(&self, key: &str) -> String {
        key.to_string()
    }

    fn scalar(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

struct Colored;

impl Style for Colored {
    fn key(&self, key: &str) -> String {
        key.blue().bold().to_string()
    }

    fn scalar(&self, value: &serde_json::Value) -> String {
        use serde_json::Value;
        match value {
            Value::Null => "-".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            other => other.to_string(),
        }
    }
}

/// Renders a value as indented `key: value` lines.
fn render(value: &serde_json::Value, style: &dyn Style, indent: usize) -> String {
    use serde_json::Value;

    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, val)| match val {
                Value::Object(inner) if !inner.is_empty() => {
                    format!("{pad}{}:\n{}", style.key(key), render(val, style, indent + 1))
                }
                Value::Array(items) if !items.is_empty() => {
                    format!("{pad}{}:\n{}", style.key(key), render(val, style, indent + 1))
                }
                Value::Array(_) => format!("{pad}{}: []", style.key(key)),
                _ => format!("{pad}{}: {}", style.key(key), style.scalar(val)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) | Value::Array(_) => {
                    let body = render(item, style, indent + 1);
                    format!("{pad}-\n{body}")
                }
                _ => format!("{pad}- {}", style.scalar(item)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        scalar => format!("{pad}{}", style.scalar(scalar)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Report {
        state: String,
        generation: u64,
        kept_previous: bool,
        diagnostics: Vec<Problem>,
    }

    #[derive(Serialize)]
    struct Problem {
        kind: String,
        message: String,
    }

    fn report() -> Report {
        Report {
            state: "ready".to_string(),
            generation: 3,
            kept_previous: false,
            diagnostics: vec![Problem {
                kind: "unresolved_import".to_string(),
                message: "Cannot resolve import '@/X'".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_format() {
        let output = format_output(&report(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["generation"], 3);
        assert_eq!(parsed["diagnostics"][0]["kind"], "unresolved_import");
    }

    #[test]
    fn test_text_format() {
        let output = format_output(&report(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.contains(&"state: ready"));
        assert!(lines.contains(&"generation: 3"));
        assert!(lines.contains(&"kept_previous: false"));

        let list = lines.iter().position(|l| *l == "diagnostics:").unwrap();
        assert_eq!(lines[list + 1], "  -");
        assert!(lines[list + 2..list + 4].contains(&"    kind: unresolved_import"));
    }

    #[test]
    fn test_text_format_empty_list() {
        let empty = Report {
            diagnostics: vec![],
            ..report()
        };
        let output = format_output(&empty, OutputFormat::Text).unwrap();
        assert!(output.lines().any(|line| line == "diagnostics: []"));
    }

    #[test]
    fn test_pretty_format() {
        let output = format_output(&report(), OutputFormat::Pretty).unwrap();
        assert!(output.contains("state"));
        assert!(output.contains("ready"));
        assert!(output.contains("unresolved_import"));
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(true, "done", OutputFormat::Text), "ok: done");
        assert_eq!(status_line(false, "failed", OutputFormat::Json), "error: failed");
        assert!(status_line(true, "done", OutputFormat::Pretty).contains("done"));
    }
}
