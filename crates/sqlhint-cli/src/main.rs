//! sqlhint CLI - SQL completion at a cursor position

use sqlhint_cli::cli;
use sqlhint_cli::input;
use sqlhint_cli::output;

use anyhow::Result;
use clap::Parser;
use sqlhint_core::{Completer, SqlparserBackend};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};
use output::{format_json, format_table};

/// The resolver could not produce a result.
const EXIT_FAILURE: u8 = 1;
/// Unreadable input or schema file.
const EXIT_CONFIG_ERROR: u8 = 66;

const DEFAULT_LOG_FILTER: &str = "sqlhint=debug,sqlhint_core=debug";

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        init_tracing();
    }

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("sqlhint: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a single completion. Returns `Ok(true)` when the resolver failed.
fn run(args: Args) -> Result<bool> {
    let sql = input::read_sql(args.file.as_deref())?;
    let schema = input::load_schema(args.schema.as_deref())?;

    let options = args.options();
    let completer = Completer::new(SqlparserBackend::new(options.dialect), options);

    tracing::debug!(
        line = args.line,
        column = args.column,
        tables = schema.tables.len(),
        "Completing"
    );

    let result = match completer.complete(&sql, args.position(), &schema) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("sqlhint: completion failed: {e}");
            return Ok(true);
        }
    };

    let rendered = match args.format {
        OutputFormat::Json => format_json(&result, args.compact),
        OutputFormat::Table => format_table(&result, true),
    };
    print!("{rendered}");
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(false)
}
