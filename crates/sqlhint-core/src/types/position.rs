//! Cursor positions and parser source locations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Editor cursor position. Both fields are 0-based; `column` counts characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A location reported by the parser. `line` and `column` are 1-based, `offset` is a
/// byte offset into the parsed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// A source range with an exclusive end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Returns true when the cursor touches this range.
    ///
    /// Parser lines are 1-based while cursor lines are 0-based, so the cursor line is
    /// shifted by one. Columns are compared as reported: a node starting at parser
    /// column `c` contains every cursor column from `c` up to its end column, which
    /// places a cursor sitting right after the last character inside the node.
    pub fn contains(&self, pos: Position) -> bool {
        let cursor = (pos.line + 1, pos.column);
        (self.start.line, self.start.column) <= cursor && cursor <= (self.end.line, self.end.column)
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &SourceRange) -> SourceRange {
        let start = if (other.start.line, other.start.column) < (self.start.line, self.start.column)
        {
            other.start
        } else {
            self.start
        };
        let end = if (other.end.line, other.end.column) > (self.end.line, self.end.column) {
            other.end
        } else {
            self.end
        };
        SourceRange { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(line: usize, start: usize, end: usize) -> SourceRange {
        SourceRange::new(
            SourceLocation::new(start - 1, line, start),
            SourceLocation::new(end - 1, line, end),
        )
    }

    #[test]
    fn test_contains_translates_lines() {
        // `T` in "SELECT * FROM T" spans parser columns 15..16 on line 1.
        let table = range(1, 15, 16);
        assert!(table.contains(Position::new(0, 15)));
        assert!(table.contains(Position::new(0, 16)));
        assert!(!table.contains(Position::new(0, 14)));
        assert!(!table.contains(Position::new(1, 15)));
    }

    #[test]
    fn test_contains_multi_line_range() {
        let range = SourceRange::new(SourceLocation::new(10, 1, 11), SourceLocation::new(30, 3, 4));
        assert!(range.contains(Position::new(1, 0)));
        assert!(range.contains(Position::new(0, 20)));
        assert!(range.contains(Position::new(2, 4)));
        assert!(!range.contains(Position::new(2, 5)));
        assert!(!range.contains(Position::new(0, 10)));
    }

    #[test]
    fn test_union_spans_both_ranges() {
        let merged = range(1, 8, 14).union(&range(1, 15, 18));
        assert_eq!(merged.start.column, 8);
        assert_eq!(merged.end.column, 18);
    }
}
