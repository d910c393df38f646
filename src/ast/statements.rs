use std::fmt;

use crate::ast::Expr;

/// Named binding of an output column to an expression.
///
/// # Example
/// ```text
/// diff = $colA$ - $colB$ * sin(#)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Name of the derived output column
    pub target: String,

    /// Expression computing the column's value
    pub value: Expr,
}

impl Assignment {
    pub fn new(target: impl Into<String>, value: Expr) -> Self {
        Assignment {
            target: target.into(),
            value,
        }
    }

    pub fn dump(&self, indent: usize, incr: usize) -> String {
        let mut out = format!("{}Assignment (target: {})\n", " ".repeat(indent), self.target);
        self.value.dump_into(&mut out, indent + incr, incr);
        out
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

/// Result of parsing one expression string: either an assignment or a bare value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnExpr {
    /// `IDENT '=' VALUE`
    Assignment(Assignment),

    /// A bare `VALUE` without an output name
    Value(Expr),
}

impl ColumnExpr {
    /// The expression, regardless of whether it is bound to a name.
    pub fn value(&self) -> &Expr {
        match self {
            ColumnExpr::Assignment(assignment) => &assignment.value,
            ColumnExpr::Value(expr) => expr,
        }
    }

    /// The output column name, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            ColumnExpr::Assignment(assignment) => Some(&assignment.target),
            ColumnExpr::Value(_) => None,
        }
    }

    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            ColumnExpr::Assignment(assignment) => Some(assignment),
            ColumnExpr::Value(_) => None,
        }
    }

    pub fn dump(&self, indent: usize, incr: usize) -> String {
        match self {
            ColumnExpr::Assignment(assignment) => assignment.dump(indent, incr),
            ColumnExpr::Value(expr) => expr.dump(indent, incr),
        }
    }
}

impl fmt::Display for ColumnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnExpr::Assignment(assignment) => write!(f, "{assignment}"),
            ColumnExpr::Value(expr) => write!(f, "{expr}"),
        }
    }
}

impl From<Expr> for ColumnExpr {
    fn from(expr: Expr) -> Self {
        ColumnExpr::Value(expr)
    }
}

impl From<Assignment> for ColumnExpr {
    fn from(assignment: Assignment) -> Self {
        ColumnExpr::Assignment(assignment)
    }
}
