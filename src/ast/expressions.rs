use std::fmt;

use crate::ast::operators::{Precedence, precedence_of};

/// Abstract Syntax Tree node representing a parsed column expression.
///
/// Nodes are immutable once the parser hands them out. Simplification
/// always builds new nodes, so a parsed tree can be evaluated against as
/// many rows as needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal floating point number
    ///
    /// # Example
    /// ```text
    /// 42
    /// -1.5e3
    /// ```
    Literal(f64),

    /// Reference to an input column (`$name$`)
    ///
    /// Everything between the two dollar signs is the column name, so
    /// `$sin(x)$` refers to a column literally named `sin(x)`.
    ///
    /// # Examples
    /// ```text
    /// $colA$
    /// $Signal (raw)$
    /// ```
    ColRef(String),

    /// Zero-based index of the current data row (`#`)
    RowId,

    /// Named constant such as `pi` or `e`, resolved case-insensitively
    Constant(String),

    /// Single-argument function call
    ///
    /// # Example
    /// ```text
    /// sin(#)
    /// ```
    FunctionCall {
        name: String,
        argument: Box<Expr>,
    },

    /// Binary operation; both operands are always present
    BinaryOp {
        left: Box<Expr>,
        op: char,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: f64) -> Self {
        Expr::Literal(value)
    }

    pub fn col_ref(name: impl Into<String>) -> Self {
        Expr::ColRef(name.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Expr::Constant(name.into())
    }

    pub fn call(name: impl Into<String>, argument: Expr) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            argument: Box::new(argument),
        }
    }

    pub fn binary(left: Expr, op: char, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Returns the literal value if this node is fully folded.
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Expr::Literal(v) => Some(*v),
            _ => None,
        }
    }

    /// Collects the names of all referenced columns in left-to-right order.
    pub fn column_refs(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_column_refs(&mut names);
        names
    }

    fn collect_column_refs<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::ColRef(name) => names.push(name),
            Expr::FunctionCall { argument, .. } => argument.collect_column_refs(names),
            Expr::BinaryOp { left, right, .. } => {
                left.collect_column_refs(names);
                right.collect_column_refs(names);
            }
            Expr::Literal(_) | Expr::RowId | Expr::Constant(_) => {}
        }
    }

    /// Renders the tree one node per line, children indented by `incr`.
    pub fn dump(&self, indent: usize, incr: usize) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, indent, incr);
        out
    }

    pub(crate) fn dump_into(&self, out: &mut String, indent: usize, incr: usize) {
        let pad = " ".repeat(indent);
        match self {
            Expr::Literal(v) => out.push_str(&format!("{pad}Literal: {v}\n")),
            Expr::ColRef(name) => out.push_str(&format!("{pad}ColRef (name: {name})\n")),
            Expr::RowId => out.push_str(&format!("{pad}RowId: #\n")),
            Expr::Constant(name) => out.push_str(&format!("{pad}Constant: {name}\n")),
            Expr::FunctionCall { name, argument } => {
                out.push_str(&format!("{pad}FunctionCall (name: {name})\n"));
                argument.dump_into(out, indent + incr, incr);
            }
            Expr::BinaryOp { left, op, right } => {
                out.push_str(&format!("{pad}BinaryOp (operator: {op})\n"));
                left.dump_into(out, indent + incr, incr);
                right.dump_into(out, indent + incr, incr);
            }
        }
    }

    fn precedence(&self) -> Option<Precedence> {
        match self {
            Expr::BinaryOp { op, .. } => precedence_of(*op),
            _ => None,
        }
    }
}

/// Writes a float as text the grammar accepts.
///
/// The text re-parses to an expression that folds back to the value, not
/// always to the same node: `nan` and `inf` come back as constants, negative
/// infinity as `(0 - inf)`, and literal assembly may be off by a rounding step.
pub(crate) fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value > 0.0 {
            write!(f, "inf")
        } else {
            write!(f, "(0 - inf)")
        }
    } else {
        // `{:e}` keeps huge and tiny magnitudes short and is valid LITERAL syntax
        let plain = format!("{value}");
        let sci = format!("{value:e}");
        if sci.len() < plain.len() {
            write!(f, "{sci}")
        } else {
            write!(f, "{plain}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write_number(f, *v),
            Expr::ColRef(name) => write!(f, "${name}$"),
            Expr::RowId => write!(f, "#"),
            Expr::Constant(name) => write!(f, "{name}"),
            Expr::FunctionCall { name, argument } => write!(f, "{name}({argument})"),
            Expr::BinaryOp { left, op, right } => {
                let own = precedence_of(*op);
                // Left-associative: the left child needs parens only when it binds looser,
                // the right child also when it binds equally.
                let left_parens = matches!((left.precedence(), own), (Some(l), Some(o)) if l < o);
                let right_parens = matches!((right.precedence(), own), (Some(r), Some(o)) if r <= o);

                if left_parens {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {op} ")?;
                if right_parens {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
        }
    }
}
