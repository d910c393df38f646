pub mod ast;
pub mod cli;
pub mod csv_io;
pub mod derive;
pub mod evaluator;
pub mod lexer;
pub mod metrics;
pub mod parser;
pub mod range;
pub mod symbols;

pub use ast::{Assignment, ColumnExpr, Expr};
pub use derive::{ColumnDeriver, DeriveError, DeriveOptions, DeriveSummary};
pub use evaluator::{EvalContext, EvalError, RowValues, evaluate, simplify, simplify_column_expr};
pub use lexer::Cursor;
pub use parser::{ParseError, ParseErrorKind, Parser, parse};
pub use range::SampleRange;

/// Errors from parsing and then folding an expression in one go.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses `text` and folds it without any row context.
///
/// ```
/// use csv_plotter::{parse_and_simplify, ColumnExpr, Expr};
///
/// let folded = parse_and_simplify("1 + 2 * 3").unwrap();
/// assert_eq!(folded, ColumnExpr::Value(Expr::Literal(7.0)));
/// ```
pub fn parse_and_simplify(text: &str) -> Result<ColumnExpr, ExprError> {
    let col_expr = parse(text)?;
    Ok(simplify_column_expr(&col_expr, &EvalContext::empty())?)
}
