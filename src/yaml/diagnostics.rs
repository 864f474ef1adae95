//! Input file diagnostics with source spans

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Syntax or shape error in an input file, pointing at the offending spot
#[derive(Debug, Error, Diagnostic)]
#[error("invalid input file: {message}")]
#[diagnostic(code(dm329::input::syntax))]
pub struct InputSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl InputSyntaxError {
    /// Error at a 1-based line/column
    pub fn at(
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = offset_of(source, line, column);
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help: hint_for(&message),
            message,
        }
    }

    pub fn from_yaml(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        Self::at(err.to_string(), source, filename, line, column)
    }

    pub fn from_json(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at(
            err.to_string(),
            source,
            filename,
            err.line().max(1),
            err.column().max(1),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] InputSyntaxError),

    #[error("unsupported input format: {}", path.display())]
    #[diagnostic(
        code(dm329::input::format),
        help("use a .yaml, .yml or .json file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot read input file: {0}")]
    #[diagnostic(code(dm329::input::io))]
    Io(#[from] std::io::Error),
}

/// Byte offset of a 1-based line/column, clamped to the source
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    if line_start >= source.len() {
        return source.len().saturating_sub(1);
    }

    source[line_start..]
        .char_indices()
        .take_while(|(_, c)| *c != '\n')
        .nth(column.saturating_sub(1))
        .map(|(i, _)| line_start + i)
        .unwrap_or(line_start)
}

/// Suggestion for the usual data sheet mistakes
fn hint_for(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("missing field `company_name`") {
        return Some("every input needs `customer: { company_name: ... }`".to_string());
    }
    if msg.contains("missing field `code`") {
        return Some("each equipment item needs its position code, e.g. `code: S1`".to_string());
    }
    if msg.contains("unknown variant") {
        return Some(
            "check the spelling of enumerated values (e.g. `fixed`/`variable`, `manual`/`automatic`)"
                .to_string(),
        );
    }
    if msg.contains("invalid type") && msg.contains("f64") {
        return Some("numbers must be written without units, e.g. `volume_liters: 500`".to_string());
    }
    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("a space may be missing after ':' or the indentation is off".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let source = "ab\ncde\nf";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 1), 3);
        assert_eq!(offset_of(source, 2, 3), 5);
        assert_eq!(offset_of(source, 3, 1), 7);
        assert_eq!(offset_of(source, 9, 1), 7);
    }

    #[test]
    fn test_hints() {
        assert!(hint_for("missing field `company_name`").is_some());
        assert!(hint_for("unknown variant `sometimes`, expected `fixed` or `variable`").is_some());
        assert!(hint_for("something else").is_none());
    }

    #[test]
    fn test_from_json_points_at_line() {
        let source = "{\n  \"customer\": }";
        let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
        let diag = InputSyntaxError::from_json(&err, source, "input.json");
        assert!(diag.to_string().starts_with("invalid input file"));
    }
}
