//! Evaluate a single column expression against a hand-written row

use crate::{EvalContext, Expr, Parser, RowValues, csv_io, simplify};

use super::CliError;

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The column expression to evaluate
    pub expression: String,
    /// Value of `#`, left unresolved if not given
    pub row: Option<usize>,
    /// Column values as `NAME=VALUE` pairs
    pub columns: Vec<String>,
}

/// Splits `NAME=VALUE` at the last `=`; the value follows the CSV cell rules.
pub fn parse_column_binding(binding: &str) -> Result<(String, f64), CliError> {
    let (name, value) = binding
        .rsplit_once('=')
        .ok_or_else(|| CliError::InvalidBinding(binding.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidBinding(binding.to_string()));
    }
    Ok((name.to_string(), csv_io::number_or_nan(value)))
}

/// Simplifies the expression with whatever context was given.
///
/// Returns the folded expression; a number when everything resolved.
pub fn execute_eval(options: &EvalOptions) -> Result<Expr, CliError> {
    let col_expr = Parser::new(&options.expression).parse()?;

    let values = options
        .columns
        .iter()
        .map(|binding| parse_column_binding(binding))
        .collect::<Result<RowValues, _>>()?;

    let mut ctx = EvalContext::empty();
    if let Some(row) = options.row {
        ctx = ctx.with_row_index(row);
    }
    if !options.columns.is_empty() {
        ctx = ctx.with_row_values(&values);
    }

    Ok(simplify(col_expr.value(), &ctx)?)
}
