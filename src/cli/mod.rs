//! CLI support for csv-plotter
//!
//! Every subcommand is a plain options struct plus an `execute_*` function,
//! so the binary stays a thin argument parser and other tools can embed the
//! same operations.

mod check;
mod docs;
mod eval;
mod headers;
mod metrics;
mod transform;

pub use check::{CheckOptions, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use eval::{EvalOptions, execute_eval, parse_column_binding};
pub use headers::{execute_headers, format_headers};
pub use metrics::{MetricsOptions, execute_metrics, metrics_to_json};
pub use transform::{TransformOptions, execute_transform, read_expression_file};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("{0}")]
    Derive(#[from] crate::DeriveError),

    #[error("Invalid range: {0}")]
    Range(#[from] crate::range::RangeError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// `NAME=VALUE` binding for `eval --col` is malformed
    #[error("Invalid column binding {0:?}, expected NAME=VALUE")]
    InvalidBinding(String),

    /// Neither an input CSV nor a row count was given
    #[error("No input provided. Pass a CSV file, pipe one to stdin, or use --rows.")]
    NoInput,

    /// No usable column expression is left after dropping malformed ones
    #[error("No valid column expressions given")]
    NoExpressions,

    #[error("Unknown category: '{0}'\nRun 'csvplot docs' to see available categories.")]
    UnknownCategory(String),
}
