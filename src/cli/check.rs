//! Parse a single column expression and show its tree

use crate::{EvalContext, Parser, simplify_column_expr};

use super::CliError;

const DUMP_INDENT: usize = 4;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The column expression to parse
    pub expression: String,
    /// Also show the tree after folding without row context
    pub fold: bool,
}

/// Parses the expression and renders the parsed (and optionally folded) tree.
pub fn execute_check(options: &CheckOptions) -> Result<String, CliError> {
    let col_expr = Parser::new(&options.expression).parse()?;

    let mut out = String::new();
    out.push_str(&format!("Parsed: {col_expr}\n"));
    out.push_str(&col_expr.dump(2, DUMP_INDENT));

    if options.fold {
        let folded = simplify_column_expr(&col_expr, &EvalContext::empty())?;
        out.push_str(&format!("Folded: {folded}\n"));
        out.push_str(&folded.dump(2, DUMP_INDENT));
    }

    Ok(out)
}
