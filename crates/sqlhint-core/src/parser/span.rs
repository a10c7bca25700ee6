//! Conversion between sqlparser spans and [`SourceRange`]s.

use sqlparser::tokenizer::{Location, Span};

use crate::types::{SourceLocation, SourceRange};

/// Calculates the byte offset for a 1-based line and character column.
///
/// A column one past the last character of the line maps to the line end, so
/// exclusive span ends convert cleanly.
pub fn line_col_to_offset(sql: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let bytes = sql.as_bytes();
    let mut offset = 0;
    for _ in 1..line {
        let newline_pos = bytes.get(offset..)?.iter().position(|&b| b == b'\n')?;
        offset += newline_pos + 1;
    }

    let line_start = offset;
    let remaining = bytes.get(line_start..)?;
    let line_len = remaining
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(remaining.len());
    let line_end = line_start + line_len;

    // Columns count characters, not bytes.
    let mut chars = sql[line_start..line_end].char_indices();
    match chars.nth(column - 1) {
        Some((rel_offset, _)) => Some(line_start + rel_offset),
        None if column - 1 == sql[line_start..line_end].chars().count() => Some(line_end),
        None => None,
    }
}

pub(crate) fn source_location(sql: &str, location: Location) -> SourceLocation {
    let line = location.line as usize;
    let column = location.column as usize;
    let offset = line_col_to_offset(sql, line, column).unwrap_or(sql.len());
    SourceLocation::new(offset, line, column)
}

pub(crate) fn source_range(sql: &str, span: Span) -> SourceRange {
    if span == Span::empty() {
        return SourceRange::default();
    }
    SourceRange::new(
        source_location(sql, span.start),
        source_location(sql, span.end),
    )
}

/// Location just past the last character of `sql`.
pub(crate) fn end_location(sql: &str) -> SourceLocation {
    let line = sql.matches('\n').count() + 1;
    let last_line = sql.rsplit('\n').next().unwrap_or_default();
    SourceLocation::new(sql.len(), line, last_line.chars().count() + 1)
}
