//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Report dates are written the Italian way
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date (clap value parser)
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date '{}', expected DD-MM-YYYY", s))
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write a generated file and announce it
pub fn write_file(bytes: &[u8], path: &Path, quiet: bool) -> Result<()> {
    let file = File::create(path).into_diagnostic()?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).into_diagnostic()?;
    writer.flush().into_diagnostic()?;

    if !quiet {
        println!(
            "{} Report written to {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }
    Ok(())
}
