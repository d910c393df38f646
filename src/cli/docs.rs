//! Documentation content for csvplot CLI

use crate::symbols;

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
    Constants,
    Transform,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "fns" => Some(Self::Functions),
            "constants" | "constant" => Some(Self::Constants),
            "transform" | "derive" => Some(Self::Transform),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"CSVPLOT DOCUMENTATION

csvplot derives new CSV columns from existing ones using small column
expressions such as:

  diff = $colA$ - $colB$ * sin(#)

DOCUMENTATION CATEGORIES

  syntax            Grammar of column expressions
  operators         Binary operators and their precedence
  functions         Built-in single-argument functions
  constants         Named constants
  transform         How expressions are applied to a CSV file

QUICK REFERENCE

  $name$            Value of column "name" in the current row
  #                 Zero-based index of the current data row
  name = expr       Output column "name" computed by expr

Run 'csvplot doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<String, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC.to_string()),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC.to_string()),
        Some(DocCategory::Functions) => Ok(functions_doc()),
        Some(DocCategory::Constants) => Ok(constants_doc()),
        Some(DocCategory::Transform) => Ok(TRANSFORM_DOC.to_string()),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

fn functions_doc() -> String {
    let mut out = String::from(FUNCTIONS_DOC);
    out.push_str("\nAVAILABLE\n  ");
    out.push_str(&symbols::function_names().join(", "));
    out.push('\n');
    out
}

fn constants_doc() -> String {
    let mut out = String::from("CONSTANTS\n\n  Names are case-insensitive: PI, Pi and pi are the same.\n\n");
    for name in symbols::constant_names() {
        if let Some(value) = symbols::constant(name) {
            out.push_str(&format!("  {name:<6}{value}\n"));
        }
    }
    out
}

const SYNTAX_DOC: &str = r#"SYNTAX

  COL_EXPR      = [ IDENT '=' ] VALUE
  VALUE1        = VALUE2 { ('+'|'-') VALUE2 }
  VALUE2        = VALUE3 { ('*'|'/') VALUE3 }
  VALUE3        = VALUE4 { ('%'|'^') VALUE4 }
  VALUE4        = FUNCTION_CALL | COLUMN_REF | LITERAL | ROW_ID | '(' VALUE ')' | CONSTANT
  FUNCTION_CALL = IDENT '(' VALUE ')'
  COLUMN_REF    = '$' COL_NAME '$'
  ROW_ID        = '#'
  LITERAL       = ['+'|'-'] DIGITS ['.' DIGITS] ['e' ['+'|'-'] DIGITS]

COLUMN REFERENCES
  Everything between the dollar signs is the column name. Names may contain
  letters, digits, underscores, parentheses and spaces:

    $Signal (raw)$
    $sin(x)$          the column named "sin(x)", not a function call

LITERALS
  42   -1.5   2.5e-3   +7

  A sign belongs to the literal, so 1 - -2 is valid. There is no unary minus
  for other values; write 0 - $a$ instead.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

  Loosest to tightest, every level left-associative:

    +  -        addition, subtraction
    *  /        multiplication, division
    %  ^        modulo, power

  So 2^3^2 is (2^3)^2 = 64 and 8 - 2 - 1 is 5.

DIVISION BY ZERO
  x / 0 and x % 0 yield nan instead of failing.

MODULO
  The result takes the sign of the divisor: -7 % 3 is 2.
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

  Every function takes exactly one argument.

    sin(x)  cos(x)  tan(x)     trigonometry in radians
    sqrt(x)                    nan for x < 0
    ln(x)   log(x)             natural logarithm, nan for x <= 0
    lg(x)   log10(x)           base-10 logarithm, nan for x <= 0
    lb(x)   log2(x)            base-2 logarithm, nan for x <= 0

  Function names are case-sensitive. Calling an unknown function is an
  error as soon as its argument is known.
"#;

const TRANSFORM_DOC: &str = r#"TRANSFORM

  csvplot transform data.csv -o out.csv -e 'diff = $a$ - $b$' -e 'n = # / 10'

  Each expression must name its output column. Expressions that fail to
  parse are skipped with a warning; the others are applied to every row.
  Derived columns are appended in the order given.

  Cells that are not numbers are read as nan. Referencing a column that
  does not exist stops the run with an error.

ROW SELECTION
  --region START:END   process data rows START..END (END exclusive)
  --divider N          only every Nth row

WITHOUT INPUT
  csvplot transform --rows 100 -o out.csv -e 'x = # * pi / 50' -e 'y = sin(# * pi / 50)'
"#;
