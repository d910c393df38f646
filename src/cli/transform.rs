//! Derive new columns for a CSV file

use std::{fs, io, path::Path};

use tracing::info;

use crate::{ColumnDeriver, DeriveOptions, DeriveSummary};

use super::CliError;

/// Options for the transform command
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Column expressions of the form `name = expression`, in output order
    pub expressions: Vec<String>,
    /// Generate this many rows without an input file
    pub rows: Option<usize>,
    /// Row selection and output layout
    pub derive: DeriveOptions,
}

/// Reads one expression per line, skipping blank lines.
pub fn read_expression_file(path: &Path) -> Result<Vec<String>, CliError> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Runs a derivation from `input` (or from `options.rows` generated rows) into `output`.
pub fn execute_transform<R: io::Read, W: io::Write>(
    input: Option<R>,
    output: W,
    options: &TransformOptions,
) -> Result<DeriveSummary, CliError> {
    let deriver = ColumnDeriver::new(options.expressions.as_slice())?;
    if deriver.columns().is_empty() {
        return Err(CliError::NoExpressions);
    }
    info!(
        columns = deriver.columns().len(),
        dropped = deriver.dropped().len(),
        "prepared column expressions"
    );

    let summary = match (input, options.rows) {
        (Some(input), _) => deriver.transform(input, output, &options.derive)?,
        (None, Some(rows)) => deriver.generate(rows, output)?,
        (None, None) => return Err(CliError::NoInput),
    };
    Ok(summary)
}
