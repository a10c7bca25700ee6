//! Error types for SQL completion.
//!
//! # Error Handling Strategy
//!
//! Completion runs on every keystroke against text that is usually incomplete, so a
//! syntax error is the normal case rather than a failure:
//!
//! - Syntax errors reported by the parser drive fallback candidate generation and are
//!   surfaced as a non-fatal [`crate::types::ErrorDescriptor`] next to the candidates.
//!
//! - [`CompletionError`]: conditions the resolver cannot recover from. Non-syntax
//!   parser failures, oversized input and excessive subquery nesting are returned as
//!   `Err` and must be treated as fatal for that request.

use thiserror::Error;

/// Fatal completion failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The parser failed for a reason other than a syntax error.
    #[error("parser failure: {0}")]
    Parser(String),

    /// Incomplete subqueries were nested deeper than the configured limit.
    #[error("unsupported nesting depth: more than {limit} incomplete subqueries")]
    SubqueryDepthExceeded { limit: usize },

    /// The document exceeds the maximum accepted size.
    #[error("SQL input of {len} bytes exceeds the maximum of {max} bytes")]
    InputTooLarge { len: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_depth_exceeded() {
        let err = CompletionError::SubqueryDepthExceeded { limit: 4 };
        assert_eq!(
            err.to_string(),
            "unsupported nesting depth: more than 4 incomplete subqueries"
        );
    }

    #[test]
    fn test_display_parser_failure() {
        let err = CompletionError::Parser("recursion limit exceeded".to_string());
        assert_eq!(err.to_string(), "parser failure: recursion limit exceeded");
    }

    #[test]
    fn test_error_trait() {
        let err = CompletionError::InputTooLarge { len: 11, max: 10 };
        let _: &dyn std::error::Error = &err;
    }
}
