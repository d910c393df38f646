use std::collections::HashMap;

use thiserror::Error;

use crate::{
    ast::{Assignment, ColumnExpr, Expr},
    symbols,
};

/// Column name to value mapping of the current row.
pub type RowValues = HashMap<String, f64>;

/// Which table an unresolved name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Operator,
    Function,
    Constant,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Operator => write!(f, "operator"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Constant => write!(f, "constant"),
        }
    }
}

/// Errors that can occur during simplification or evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// `$name$` is not a column of the current row
    #[error("unable to resolve column with name \"{0}\"")]
    ColumnNotFound(String),

    /// Name missing from the operator, function or constant table
    #[error("unknown {kind} \"{name}\"")]
    UnknownSymbol { kind: SymbolKind, name: String },

    /// Full evaluation did not reduce the expression to a single number
    ///
    /// With both the row index and the row values bound every leaf either
    /// resolves or fails on its own, so `evaluate` only reports this if a
    /// new node kind is added without a folding rule.
    #[error("expression could not be resolved to a number: {0}")]
    UnresolvedExpression(String),
}

/// Runtime information available while simplifying.
///
/// Each piece is optional: references whose information is missing are left
/// in the tree untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext<'a> {
    /// Zero-based data row index (what `#` refers to)
    pub row_index: Option<usize>,
    /// Values of the current row (what `$name$` refers to)
    pub row_values: Option<&'a RowValues>,
}

impl<'a> EvalContext<'a> {
    /// No row information: only literals, constants and known symbols fold.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn full(row_index: usize, row_values: &'a RowValues) -> Self {
        EvalContext {
            row_index: Some(row_index),
            row_values: Some(row_values),
        }
    }

    pub fn with_row_index(self, row_index: usize) -> Self {
        EvalContext {
            row_index: Some(row_index),
            ..self
        }
    }

    pub fn with_row_values(self, row_values: &'a RowValues) -> Self {
        EvalContext {
            row_values: Some(row_values),
            ..self
        }
    }
}

/// Folds literal subtrees and resolves references available in `ctx`.
///
/// Works bottom-up and never mutates `expr`; the result is a new tree that is
/// at least as reduced as the input.
///
/// # Examples
///
/// ```
/// use csv_plotter::{Expr, evaluator::{simplify, EvalContext}};
///
/// let expr = Expr::binary(Expr::literal(2.0), '*', Expr::RowId);
/// let folded = simplify(&expr, &EvalContext::empty().with_row_index(21)).unwrap();
/// assert_eq!(folded, Expr::Literal(42.0));
/// ```
pub fn simplify(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Expr, EvalError> {
    match expr {
        Expr::Literal(_) => Ok(expr.clone()),
        Expr::ColRef(name) => resolve_col_ref(name, ctx),
        Expr::RowId => Ok(match ctx.row_index {
            Some(index) => Expr::Literal(index as f64),
            None => Expr::RowId,
        }),
        Expr::Constant(name) => symbols::constant(name)
            .map(Expr::Literal)
            .ok_or_else(|| EvalError::UnknownSymbol {
                kind: SymbolKind::Constant,
                name: name.clone(),
            }),
        Expr::FunctionCall { name, argument } => simplify_function_call(name, argument, ctx),
        Expr::BinaryOp { left, op, right } => simplify_binary_op(left, *op, right, ctx),
    }
}

fn resolve_col_ref(name: &str, ctx: &EvalContext<'_>) -> Result<Expr, EvalError> {
    match ctx.row_values {
        None => Ok(Expr::ColRef(name.to_string())),
        Some(values) => values
            .get(name)
            .map(|value| Expr::Literal(*value))
            .ok_or_else(|| EvalError::ColumnNotFound(name.to_string())),
    }
}

fn simplify_function_call(
    name: &str,
    argument: &Expr,
    ctx: &EvalContext<'_>,
) -> Result<Expr, EvalError> {
    let argument = simplify(argument, ctx)?;

    match argument {
        // The function is only looked up once the call can actually fold
        Expr::Literal(value) => {
            let function = symbols::function(name).ok_or_else(|| EvalError::UnknownSymbol {
                kind: SymbolKind::Function,
                name: name.to_string(),
            })?;
            Ok(Expr::Literal(function(value)))
        }
        argument => Ok(Expr::call(name, argument)),
    }
}

fn simplify_binary_op(
    left: &Expr,
    op: char,
    right: &Expr,
    ctx: &EvalContext<'_>,
) -> Result<Expr, EvalError> {
    let operator = symbols::operator(op).ok_or_else(|| EvalError::UnknownSymbol {
        kind: SymbolKind::Operator,
        name: op.to_string(),
    })?;

    let left = simplify(left, ctx)?;
    let right = simplify(right, ctx)?;

    match (&left, &right) {
        (Expr::Literal(l), Expr::Literal(r)) => Ok(Expr::Literal(operator(*l, *r))),
        _ => Ok(Expr::binary(left, op, right)),
    }
}

/// Simplifies the value of a parsed column expression, keeping any assignment wrapper.
pub fn simplify_column_expr(
    col_expr: &ColumnExpr,
    ctx: &EvalContext<'_>,
) -> Result<ColumnExpr, EvalError> {
    match col_expr {
        ColumnExpr::Assignment(assignment) => Ok(ColumnExpr::Assignment(Assignment::new(
            assignment.target.clone(),
            simplify(&assignment.value, ctx)?,
        ))),
        ColumnExpr::Value(expr) => Ok(ColumnExpr::Value(simplify(expr, ctx)?)),
    }
}

/// Fully evaluates `expr` for one row.
///
/// Both the row index and the row values are bound, so anything other than
/// a single literal afterwards is an error.
pub fn evaluate(expr: &Expr, row_index: usize, row_values: &RowValues) -> Result<f64, EvalError> {
    let resolved = simplify(expr, &EvalContext::full(row_index, row_values))?;
    resolved
        .as_literal()
        .ok_or_else(|| EvalError::UnresolvedExpression(resolved.to_string()))
}
