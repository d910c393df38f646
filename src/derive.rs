//! Column derivation: evaluates a list of `name = expression` strings for
//! every row of a CSV stream and appends the results as new columns.

use std::io;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    ast::Expr,
    csv_io,
    evaluator::{self, EvalContext, EvalError, RowValues},
    parser::{self, ParseError},
    range::SampleRange,
};

const PROGRESS_INTERVAL: usize = 1_000_000;

/// Why an expression was left out of a derivation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropReason {
    #[error("failed to parse: {0}")]
    Parse(#[from] ParseError),

    #[error("no target column name (expected `name = expression`)")]
    MissingTarget,
}

/// An expression string that was skipped, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedExpression {
    pub source: String,
    pub reason: DropReason,
}

#[derive(Debug, Error)]
pub enum DeriveError {
    /// Folding an expression without row context failed, e.g. `foo(1)`
    #[error("failed to evaluate column expression \"{source_text}\": {error}")]
    Prefold {
        source_text: String,
        #[source]
        error: EvalError,
    },

    #[error("row {row}, column \"{column}\": {error}")]
    Row {
        row: usize,
        column: String,
        #[source]
        error: EvalError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One output column: its name and its pre-folded expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    pub name: String,
    pub source: String,
    pub expr: Expr,
}

/// Options for a CSV derivation run
#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    /// Which input rows to process
    pub range: SampleRange,
    /// Only write the derived columns, not the original cells
    pub derived_only: bool,
}

/// Counters reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveSummary {
    pub rows_read: usize,
    pub rows_written: usize,
}

/// Parsed and pre-folded column expressions, ready to be evaluated per row.
#[derive(Debug, Clone, Default)]
pub struct ColumnDeriver {
    columns: Vec<DerivedColumn>,
    dropped: Vec<DroppedExpression>,
}

impl ColumnDeriver {
    /// Parses every expression and folds what does not depend on a row.
    ///
    /// Expressions that fail to parse or lack a `name =` prefix are dropped
    /// with a warning; the rest keep their declaration order. Folding errors
    /// are fatal since the expression could never produce a value.
    pub fn new<S: AsRef<str>>(expressions: &[S]) -> Result<Self, DeriveError> {
        let mut deriver = ColumnDeriver::default();

        for source in expressions.iter().map(AsRef::as_ref) {
            let assignment = match parser::parse(source) {
                Ok(col_expr) => col_expr.into_assignment().ok_or(DropReason::MissingTarget),
                Err(err) => Err(DropReason::Parse(err)),
            };

            let assignment = match assignment {
                Ok(assignment) => assignment,
                Err(reason) => {
                    warn!(expression = source, %reason, "dropping column expression");
                    deriver.dropped.push(DroppedExpression {
                        source: source.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            let expr = evaluator::simplify(&assignment.value, &EvalContext::empty()).map_err(
                |error| DeriveError::Prefold {
                    source_text: source.to_string(),
                    error,
                },
            )?;
            debug!(column = %assignment.target, folded = %expr, "registered column expression");

            deriver.columns.push(DerivedColumn {
                name: assignment.target,
                source: source.to_string(),
                expr,
            });
        }

        Ok(deriver)
    }

    pub fn columns(&self) -> &[DerivedColumn] {
        &self.columns
    }

    pub fn dropped(&self) -> &[DroppedExpression] {
        &self.dropped
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Evaluates every column for one row, in declaration order.
    pub fn derive_row(&self, row_index: usize, row_values: &RowValues) -> Result<Vec<f64>, DeriveError> {
        self.columns
            .iter()
            .map(|column| {
                evaluator::evaluate(&column.expr, row_index, row_values).map_err(|error| {
                    DeriveError::Row {
                        row: row_index,
                        column: column.name.clone(),
                        error,
                    }
                })
            })
            .collect()
    }

    /// Streams `input` to `output`, appending the derived columns to each selected row.
    pub fn transform<R: io::Read, W: io::Write>(
        &self,
        input: R,
        output: W,
        options: &DeriveOptions,
    ) -> Result<DeriveSummary, DeriveError> {
        let mut rdr = csv_io::reader(input);
        let mut wtr = csv_io::writer(output);
        let mut summary = DeriveSummary::default();

        let headers = rdr.headers()?.clone();
        let mut header_row: Vec<&str> = Vec::new();
        if !options.derived_only {
            header_row.extend(headers.iter());
        }
        header_row.extend(self.column_names());
        wtr.write_record(&header_row)?;

        for (index, record) in rdr.records().enumerate() {
            let record = record?;
            summary.rows_read += 1;

            if index % PROGRESS_INTERVAL == 0 && index != 0 {
                info!("{index} samples read");
            }
            if options.range.is_past_end(index) {
                break;
            }
            if !options.range.contains(index) {
                continue;
            }

            let values = csv_io::row_values(&headers, &record);
            let derived = self.derive_row(index, &values)?;

            let mut out: Vec<String> = Vec::with_capacity(record.len() + derived.len());
            if !options.derived_only {
                out.extend(record.iter().map(str::to_string));
            }
            out.extend(derived.into_iter().map(csv_io::format_value));
            wtr.write_record(&out)?;
            summary.rows_written += 1;
        }

        wtr.flush()?;
        info!(
            rows_read = summary.rows_read,
            rows_written = summary.rows_written,
            "finished deriving columns"
        );
        Ok(summary)
    }

    /// Writes `row_count` rows computed without any input columns.
    ///
    /// Only `#`, constants and literals are usable in this mode.
    pub fn generate<W: io::Write>(&self, row_count: usize, output: W) -> Result<DeriveSummary, DeriveError> {
        // Fail before writing anything if some column needs input cells
        if let Some((column, name)) = self
            .columns
            .iter()
            .find_map(|c| c.expr.column_refs().first().map(|name| (c, name.to_string())))
        {
            return Err(DeriveError::Row {
                row: 0,
                column: column.name.clone(),
                error: EvalError::ColumnNotFound(name),
            });
        }

        let mut wtr = csv_io::writer(output);
        wtr.write_record(self.column_names())?;

        let empty = RowValues::new();
        for index in 0..row_count {
            let derived = self.derive_row(index, &empty)?;
            wtr.write_record(derived.into_iter().map(csv_io::format_value))?;
        }

        wtr.flush()?;
        info!(rows_written = row_count, "finished generating rows");
        Ok(DeriveSummary {
            rows_read: 0,
            rows_written: row_count,
        })
    }
}
