//! # Column Expression Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for column expressions,
//! the small language used to derive new CSV columns from existing ones.
//!
//! ## Architecture Overview
//!
//! - **[expressions]** - Expression nodes (literals, references, calls, operations)
//! - **[operators]** - Binary operator precedence levels
//! - **[statements]** - Assignments binding an expression to an output column
//!
//! ## Quick Start
//!
//! ```text
//! diff = $colA$ - $colB$ * sin(#)
//! ```
//!
//! This derives a column `diff` from the columns `colA` and `colB` and the
//! zero-based index of the current row.
//!
//! ## Core Concepts
//!
//! ### References
//!
//! - `$name$` - value of the input column `name` in the current row
//! - `#` - zero-based index of the current data row
//! - `pi`, `e`, `tau`, `inf`, `nan` - named constants
//!
//! ### Precedence
//!
//! Loosest to tightest, all left-associative:
//!
//! ```text
//! +  -
//! *  /
//! %  ^
//! ```
//!
//! So `2^3^2` is `(2^3)^2` and `1-2-3` is `(1-2)-3`.
//!
//! ### Numbers
//!
//! Every value is an IEEE double. Division or modulo by zero yields `nan`
//! instead of an error.
pub mod expressions;
pub mod operators;
pub mod statements;

pub use expressions::Expr;
pub use operators::{Precedence, precedence_of};
pub use statements::{Assignment, ColumnExpr};
