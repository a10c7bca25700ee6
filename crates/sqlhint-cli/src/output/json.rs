//! JSON output formatting.

use sqlhint_core::CompletionResult;

/// Format the completion result as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(result: &CompletionResult, compact: bool) -> String {
    if compact {
        serde_json::to_string(result).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(result).expect("serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlhint_core::{complete, Column, Position, Schema, Table};

    fn result() -> CompletionResult {
        let schema = Schema::new(
            vec![Table::new("users", vec![Column::new("id", "")])],
            Vec::new(),
        );
        complete("SELECT u.i FROM users u", Position::new(0, 10), &schema).unwrap()
    }

    #[test]
    fn test_json_pretty() {
        let json = format_json(&result(), false);
        assert!(json.contains('\n'));
        assert!(json.contains("\"scopedColumnName\": \"u.id\""));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_json_compact() {
        let json = format_json(&result(), true);
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"candidates\":["));
    }
}
