//! Recursive-descent parser for column expressions.
//!
//! ```text
//! COL_EXPR      = [ IDENT '=' ] VALUE
//! VALUE         = VALUE1
//! VALUE1        = VALUE2 { ('+'|'-') VALUE2 }
//! VALUE2        = VALUE3 { ('*'|'/') VALUE3 }
//! VALUE3        = VALUE4 { ('%'|'^') VALUE4 }
//! VALUE4        = FUNCTION_CALL | COLUMN_REF | LITERAL | ROW_ID | '(' VALUE ')' | CONSTANT
//! FUNCTION_CALL = IDENT '(' VALUE ')'
//! COLUMN_REF    = '$' COL_NAME '$'
//! ROW_ID        = '#'
//! LITERAL       = ['+'|'-'] DIGITS ['.' DIGITS] ['e' ['+'|'-'] DIGITS]
//! ```
//!
//! Whitespace is allowed between tokens, but not inside a literal and not
//! directly after the opening `$` of a column reference.

use thiserror::Error;

use crate::{
    ast::{Assignment, ColumnExpr, Expr, Precedence},
    lexer::Cursor,
};

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// None of the `VALUE4` alternatives accepted the input
    #[error("no alternative matched a value")]
    NoAlternativeMatched,

    /// A complete expression was parsed but input is left over
    #[error("expression did not consume the whole input")]
    TrailingInput,

    #[error("malformed literal: {0}")]
    MalformedLiteral(&'static str),

    #[error("malformed identifier: expected a letter or an underscore")]
    MalformedIdentifier,

    #[error("malformed column name: expected a letter, digit, underscore or parenthesis")]
    MalformedColumnName,

    #[error("expected '{0}'")]
    Expected(char),
}

/// A parse failure together with the exact unconsumed suffix where it happened.
///
/// When no `VALUE4` alternative matches, `cause` holds the alternative that
/// got furthest before failing, if any got past the first character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (remaining input: {remaining:?})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub remaining: String,
    #[source]
    pub cause: Option<Box<ParseError>>,
}

impl ParseError {
    fn new(kind: ParseErrorKind, at: Cursor<'_>) -> Self {
        ParseError {
            kind,
            remaining: at.remaining().to_string(),
            cause: None,
        }
    }

    /// The deepest failure in the `cause` chain, `self` if there is none.
    pub fn innermost(&self) -> &ParseError {
        let mut error = self;
        while let Some(cause) = &error.cause {
            error = cause;
        }
        error
    }

    /// Human-readable description without the remaining input.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn remaining_input(&self) -> &str {
        &self.remaining
    }
}

type PResult<'a, T> = Result<(T, Cursor<'a>), ParseError>;

type Alternative<'a> = fn(&Parser<'a>, Cursor<'a>) -> PResult<'a, Expr>;

pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser { input }
    }

    /// Parses `COL_EXPR`, requiring the whole input to be consumed.
    pub fn parse(&self) -> Result<ColumnExpr, ParseError> {
        let start = Cursor::new(self.input).skip_whitespace();

        let (col_expr, rest) = match self.parse_assignment_target(start) {
            Some((target, after_eq)) => {
                let (value, rest) = self.parse_value(after_eq)?;
                (ColumnExpr::Assignment(Assignment::new(target, value)), rest)
            }
            None => {
                let (value, rest) = self.parse_value(start)?;
                (ColumnExpr::Value(value), rest)
            }
        };

        self.expect_end(rest)?;
        Ok(col_expr)
    }

    /// Parses a bare `VALUE`, rejecting any `IDENT '='` prefix.
    pub fn parse_expression(&self) -> Result<Expr, ParseError> {
        let start = Cursor::new(self.input).skip_whitespace();
        let (value, rest) = self.parse_value(start)?;
        self.expect_end(rest)?;
        Ok(value)
    }

    fn expect_end(&self, rest: Cursor<'a>) -> Result<(), ParseError> {
        let rest = rest.skip_whitespace();
        if rest.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::new(ParseErrorKind::TrailingInput, rest))
        }
    }

    /// `[ IDENT '=' ]`, `None` if the prefix is absent.
    fn parse_assignment_target(&self, cursor: Cursor<'a>) -> Option<(String, Cursor<'a>)> {
        let (ident, after_ident) = cursor.read_identifier()?;
        let after_eq = after_ident.skip_whitespace().eat('=')?;
        Some((ident.to_string(), after_eq.skip_whitespace()))
    }

    fn parse_value(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        self.parse_binary_level(Precedence::Additive, cursor)
    }

    /// Parses one precedence level as a left fold over its operators.
    ///
    /// Once an operator is consumed its right operand is mandatory, so `1+`
    /// fails at the end of input instead of leaving `+` behind.
    fn parse_binary_level(&self, level: Precedence, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let (mut left, mut cursor) = self.parse_operand(level, cursor)?;

        while let Some((op, after_op)) = cursor.eat_any(level.operators()) {
            let (right, next) = self.parse_operand(level, after_op.skip_whitespace())?;
            left = Expr::binary(left, op, right);
            cursor = next;
        }

        Ok((left, cursor))
    }

    fn parse_operand(&self, level: Precedence, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        match level.tighter() {
            Some(next) => self.parse_binary_level(next, cursor),
            None => self.parse_primary(cursor),
        }
    }

    /// `VALUE4`: every alternative starts from the same cursor, the first success wins.
    ///
    /// If all of them fail the error is `NoAlternativeMatched` at `cursor`,
    /// caused by the failure with the shortest remaining input.
    fn parse_primary(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let alternatives: [Alternative<'a>; 6] = [
            Self::parse_function_call,
            Self::parse_column_ref,
            Self::parse_literal,
            Self::parse_row_id,
            Self::parse_paren_value,
            Self::parse_constant,
        ];

        let mut furthest: Option<ParseError> = None;
        for alternative in alternatives {
            match alternative(self, cursor) {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if furthest
                        .as_ref()
                        .is_none_or(|f| err.remaining.len() < f.remaining.len())
                    {
                        furthest = Some(err);
                    }
                }
            }
        }

        let mut error = ParseError::new(ParseErrorKind::NoAlternativeMatched, cursor);
        error.cause = furthest
            .filter(|err| err.remaining.len() < cursor.remaining().len())
            .map(Box::new);
        Err(error)
    }

    fn parse_ident(&self, cursor: Cursor<'a>) -> PResult<'a, &'a str> {
        let (ident, rest) = cursor
            .read_identifier()
            .ok_or_else(|| ParseError::new(ParseErrorKind::MalformedIdentifier, cursor))?;
        Ok((ident, rest.skip_whitespace()))
    }

    fn expect_char(&self, cursor: Cursor<'a>, expected: char) -> Result<Cursor<'a>, ParseError> {
        cursor
            .eat(expected)
            .ok_or_else(|| ParseError::new(ParseErrorKind::Expected(expected), cursor))
    }

    /// `FUNCTION_CALL = IDENT '(' VALUE ')'`
    fn parse_function_call(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let (name, cursor) = self.parse_ident(cursor)?;
        let cursor = self.expect_char(cursor, '(')?.skip_whitespace();
        let (argument, cursor) = self.parse_value(cursor)?;
        let cursor = self.expect_char(cursor.skip_whitespace(), ')')?;
        Ok((Expr::call(name, argument), cursor.skip_whitespace()))
    }

    /// `COLUMN_REF = '$' COL_NAME '$'`
    fn parse_column_ref(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let cursor = self.expect_char(cursor, '$')?;
        let (name, cursor) = cursor
            .read_col_name()
            .ok_or_else(|| ParseError::new(ParseErrorKind::MalformedColumnName, cursor))?;
        let cursor = self.expect_char(cursor, '$')?;
        Ok((Expr::col_ref(name), cursor.skip_whitespace()))
    }

    /// `LITERAL = ['+'|'-'] DIGITS ['.' DIGITS] ['e' ['+'|'-'] DIGITS]`
    ///
    /// Assembled as `sign * (integer + fraction) * 10^exponent`, the fraction
    /// being its digit string's value divided by ten once per digit. A zero
    /// mantissa stays zero whatever the exponent.
    fn parse_literal(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let (sign, cursor) = match cursor.eat_any(&['+', '-']) {
            Some(('-', rest)) => (-1.0, rest),
            Some((_, rest)) => (1.0, rest),
            None => (1.0, cursor),
        };

        let (int_digits, cursor) = cursor.read_digits().ok_or_else(|| {
            ParseError::new(ParseErrorKind::MalformedLiteral("expected digits"), cursor)
        })?;
        let integer = digits_value(int_digits);

        let (fraction, cursor) = match cursor.eat('.') {
            Some(after_dot) => {
                let (frac_digits, rest) = after_dot.read_digits().ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::MalformedLiteral("expected digits after '.'"),
                        after_dot,
                    )
                })?;
                let mut fraction = digits_value(frac_digits);
                for _ in frac_digits.chars() {
                    fraction /= 10.0;
                }
                (fraction, rest)
            }
            None => (0.0, cursor),
        };

        let (exponent, cursor) = match cursor.eat('e') {
            Some(after_e) => {
                let (exp_sign, after_sign) = match after_e.eat_any(&['+', '-']) {
                    Some(('-', rest)) => (-1, rest),
                    Some((_, rest)) => (1, rest),
                    None => (1, after_e),
                };
                let (exp_digits, rest) = after_sign.read_digits().ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::MalformedLiteral("expected digits in exponent"),
                        after_sign,
                    )
                })?;
                // Anything past i32 range is inf or 0 anyway
                let magnitude = exp_digits.parse::<i32>().unwrap_or(i32::MAX);
                (exp_sign * magnitude, rest)
            }
            None => (0, cursor),
        };

        let mantissa = integer + fraction;
        // 0 * 10^huge would be 0 * inf = NaN
        let value = if mantissa == 0.0 {
            sign * 0.0
        } else {
            sign * mantissa * 10f64.powi(exponent)
        };
        Ok((Expr::Literal(value), cursor.skip_whitespace()))
    }

    /// `ROW_ID = '#'`
    fn parse_row_id(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let cursor = self.expect_char(cursor, '#')?;
        Ok((Expr::RowId, cursor.skip_whitespace()))
    }

    /// `'(' VALUE ')'`
    fn parse_paren_value(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let cursor = self.expect_char(cursor, '(')?.skip_whitespace();
        let (value, cursor) = self.parse_value(cursor)?;
        let cursor = self.expect_char(cursor.skip_whitespace(), ')')?;
        Ok((value, cursor.skip_whitespace()))
    }

    /// `CONSTANT = IDENT`
    fn parse_constant(&self, cursor: Cursor<'a>) -> PResult<'a, Expr> {
        let (name, cursor) = self.parse_ident(cursor)?;
        Ok((Expr::constant(name), cursor))
    }
}

/// Value of a non-empty ASCII digit string.
fn digits_value(digits: &str) -> f64 {
    digits
        .bytes()
        .fold(0.0, |acc, b| acc * 10.0 + f64::from(b - b'0'))
}

/// Parses one column expression string.
pub fn parse(text: &str) -> Result<ColumnExpr, ParseError> {
    Parser::new(text).parse()
}
