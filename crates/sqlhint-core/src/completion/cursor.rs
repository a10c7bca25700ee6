//! Text up to the cursor and the partial token being typed.

use crate::types::Position;

/// Returns `text` with everything after `pos` removed.
///
/// Lines before `pos.line` are kept whole; the cursor line is cut after
/// `pos.column` characters. Positions past the end clamp instead of failing.
pub fn truncate_to_cursor(text: &str, pos: Position) -> String {
    let mut lines: Vec<&str> = text.split('\n').take(pos.line + 1).collect();
    if lines.len() == pos.line + 1 {
        if let Some(last) = lines.last_mut() {
            let end = last
                .char_indices()
                .nth(pos.column)
                .map_or(last.len(), |(idx, _)| idx);
            *last = &last[..end];
        }
    }
    lines.join("\n")
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '[' | '\\' | ']' | '^' | '_' | '`')
}

/// The trailing run of identifier-like characters, including a trailing dot.
pub fn last_token(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_token_char(c))
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SELECT * FROM t", Position::new(0, 8), "SELECT *")]
    #[case("SELECT *\nFROM t\nWHERE", Position::new(1, 2), "SELECT *\nFR")]
    #[case("SELECT", Position::new(0, 100), "SELECT")]
    #[case("SELECT\nFROM", Position::new(5, 0), "SELECT\nFROM")]
    #[case("SELECT μx", Position::new(0, 8), "SELECT μ")]
    #[case("", Position::new(0, 0), "")]
    fn test_truncate_to_cursor(#[case] text: &str, #[case] pos: Position, #[case] expected: &str) {
        assert_eq!(truncate_to_cursor(text, pos), expected);
    }

    #[rstest]
    #[case("SELECT TABLE1.C", "TABLE1.C")]
    #[case("SELECT e.", "e.")]
    #[case("SELECT ", "")]
    #[case("S", "S")]
    #[case("TO_CHAR(empl", "empl")]
    #[case("SELECT a::b", "a::b")]
    #[case("SELECT `x`", "`x`")]
    #[case("", "")]
    fn test_last_token(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(last_token(text), expected);
    }
}
