//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlhint_core::{CompletionItem, CompletionResult};
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CandidateRow {
    label: String,
    kind: &'static str,
    detail: String,
    insert: String,
}

impl From<&CompletionItem> for CandidateRow {
    fn from(item: &CompletionItem) -> Self {
        Self {
            label: item.label.clone(),
            kind: item.kind.as_str(),
            detail: item.detail.clone().unwrap_or_default(),
            insert: item.insert_text.clone().unwrap_or_default(),
        }
    }
}

/// Format the completion result as a candidate table with optional colors.
pub fn format_table(result: &CompletionResult, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    let summary = match result.candidates.len() {
        1 => "1 candidate".to_string(),
        n => format!("{n} candidates"),
    };
    if colored {
        writeln!(out, "{}", summary.bold()).unwrap();
    } else {
        writeln!(out, "{summary}").unwrap();
    }

    if !result.candidates.is_empty() {
        let rows: Vec<CandidateRow> = result.candidates.iter().map(CandidateRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::psql());
        writeln!(out, "{table}").unwrap();
    }

    if let Some(error) = &result.error {
        let location = format!("line {}, offset {}", error.line, error.offset);
        if colored {
            writeln!(
                out,
                "{} {} {}",
                error.label.yellow(),
                error.detail,
                location.dimmed()
            )
            .unwrap();
        } else {
            writeln!(out, "{} {} ({location})", error.label, error.detail).unwrap();
        }
    }

    out
}
