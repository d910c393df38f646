// tests/parser_tests.rs

use csv_plotter::ast::{Assignment, ColumnExpr, Expr};
use csv_plotter::parser::{ParseErrorKind, Parser, parse};
use csv_plotter::{EvalContext, simplify};

fn value(text: &str) -> Expr {
    Parser::new(text).parse_expression().unwrap()
}

fn lit(v: f64) -> Expr {
    Expr::Literal(v)
}

fn assert_close(expr: Expr, expected: f64) {
    let actual = expr.as_literal().expect("expected a literal");
    assert!(
        (actual - expected).abs() <= 1e-12 * expected.abs().max(1.0),
        "{actual} != {expected}"
    );
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_single_literal() {
    assert_eq!(value("42"), lit(42.0));
    assert_eq!(value("  7  "), lit(7.0));
}

#[test]
fn test_row_id() {
    assert_eq!(value("#"), Expr::RowId);
}

#[test]
fn test_constant() {
    assert_eq!(value("pi"), Expr::constant("pi"));
    assert_eq!(value("PI"), Expr::constant("PI"));
}

#[test]
fn test_function_call() {
    assert_eq!(value("sin(#)"), Expr::call("sin", Expr::RowId));
    assert_eq!(value("sqrt ( 4 )"), Expr::call("sqrt", lit(4.0)));
}

#[test]
fn test_column_ref() {
    assert_eq!(value("$colA$"), Expr::col_ref("colA"));
    assert_eq!(value("$2nd_col$"), Expr::col_ref("2nd_col"));
}

#[test]
fn test_column_ref_with_spaces_and_parens() {
    assert_eq!(value("$Signal (raw)$"), Expr::col_ref("Signal (raw)"));
}

#[test]
fn test_column_name_is_taken_literally() {
    // Looks like a call, but everything between the dollars is the name
    assert_eq!(value("$sin(x)$"), Expr::col_ref("sin(x)"));
}

#[test]
fn test_column_name_may_not_start_with_space() {
    let err = parse("$ a$").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "$ a$");
}

#[test]
fn test_unterminated_column_ref() {
    let err = parse("$abc").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_signed_literals() {
    assert_eq!(value("-3"), lit(-3.0));
    assert_eq!(value("+3"), lit(3.0));
}

#[test]
fn test_fraction_and_exponent() {
    assert_close(value("1.5"), 1.5);
    assert_close(value("0.25"), 0.25);
    assert_close(value("2.5e3"), 2500.0);
    assert_close(value("2.5e+3"), 2500.0);
    assert_close(value("-1.5e-3"), -0.0015);
}

#[test]
fn test_extreme_exponents() {
    assert_eq!(value("0e400"), lit(0.0));
    assert_eq!(value("0e99999999999"), lit(0.0));
    assert_eq!(value("1e-400"), lit(0.0));
    assert_eq!(value("2e400"), lit(f64::INFINITY));
}

#[test]
fn test_minus_before_literal_is_binary_when_left_operand_exists() {
    assert_eq!(value("2-3"), Expr::binary(lit(2.0), '-', lit(3.0)));
    assert_eq!(value("2 - -3"), Expr::binary(lit(2.0), '-', lit(-3.0)));
}

#[test]
fn test_no_unary_minus_on_references() {
    let err = parse("-$a$").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "-$a$");
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_arithmetic() {
    // Should be: Add(1, Multiply(2, 3))
    assert_eq!(
        value("1 + 2 * 3"),
        Expr::binary(lit(1.0), '+', Expr::binary(lit(2.0), '*', lit(3.0)))
    );
}

#[test]
fn test_parentheses() {
    // Should be: Multiply(Add(1, 2), 3)
    assert_eq!(
        value("(1 + 2) * 3"),
        Expr::binary(Expr::binary(lit(1.0), '+', lit(2.0)), '*', lit(3.0))
    );
}

#[test]
fn test_left_associative_subtraction() {
    assert_eq!(
        value("1 - 2 - 3"),
        Expr::binary(Expr::binary(lit(1.0), '-', lit(2.0)), '-', lit(3.0))
    );
}

#[test]
fn test_left_associative_power() {
    assert_eq!(
        value("2 ^ 3 ^ 2"),
        Expr::binary(Expr::binary(lit(2.0), '^', lit(3.0)), '^', lit(2.0))
    );
}

#[test]
fn test_power_binds_tighter_than_multiplication() {
    assert_eq!(
        value("2 * 3 ^ 2"),
        Expr::binary(lit(2.0), '*', Expr::binary(lit(3.0), '^', lit(2.0)))
    );
    assert_eq!(
        value("7 % 4 * 2"),
        Expr::binary(Expr::binary(lit(7.0), '%', lit(4.0)), '*', lit(2.0))
    );
}

#[test]
fn test_long_chain_does_not_nest_recursively() {
    let text = vec!["1"; 1_000].join(" + ");
    let expr = value(&text);
    let mut depth = 0;
    let mut current = &expr;
    while let Expr::BinaryOp { left, right, .. } = current {
        assert_eq!(**right, lit(1.0));
        current = left;
        depth += 1;
    }
    assert_eq!(depth, 999);
}

#[test]
fn test_nested_function_calls() {
    assert_eq!(
        value("sin(cos($a$) * 2)"),
        Expr::call(
            "sin",
            Expr::binary(Expr::call("cos", Expr::col_ref("a")), '*', lit(2.0))
        )
    );
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn test_assignment() {
    let parsed = parse("diff = $colA$ - $colB$ * sin(#)").unwrap();
    let expected = ColumnExpr::Assignment(Assignment::new(
        "diff",
        Expr::binary(
            Expr::col_ref("colA"),
            '-',
            Expr::binary(Expr::col_ref("colB"), '*', Expr::call("sin", Expr::RowId)),
        ),
    ));
    assert_eq!(parsed, expected);
}

#[test]
fn test_identifier_without_equals_is_a_value() {
    assert_eq!(parse("e").unwrap(), ColumnExpr::Value(Expr::constant("e")));
    assert_eq!(
        parse("sin(1)").unwrap(),
        ColumnExpr::Value(Expr::call("sin", lit(1.0)))
    );
}

#[test]
fn test_assignment_with_broken_value_fails() {
    let err = parse("a = 1 +").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "");
}

#[test]
fn test_parse_expression_rejects_assignment() {
    let err = Parser::new("a = 1").parse_expression().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert_eq!(err.remaining, "= 1");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_trailing_operator() {
    let err = parse("1+").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining_input(), "");
}

#[test]
fn test_trailing_input() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert_eq!(err.remaining, "2");
}

#[test]
fn test_unclosed_paren() {
    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "(1 + 2");
}

#[test]
fn test_unknown_character() {
    let err = parse("1 + @").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "@");
}

#[test]
fn test_empty_input() {
    let err = parse("   ").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "");
}

#[test]
fn test_furthest_failure_is_kept_as_cause() {
    let err = parse("((1)").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoAlternativeMatched);
    assert_eq!(err.remaining, "((1)");
    assert_eq!(err.innermost().kind, ParseErrorKind::Expected(')'));
    assert_eq!(err.innermost().remaining, "");

    let err = parse("$ a$").unwrap_err();
    assert_eq!(err.innermost().kind, ParseErrorKind::MalformedColumnName);
    assert_eq!(err.innermost().remaining, " a$");

    let err = parse("-$a$").unwrap_err();
    assert!(matches!(
        err.innermost().kind,
        ParseErrorKind::MalformedLiteral(_)
    ));
    assert_eq!(err.innermost().remaining, "$a$");
}

#[test]
fn test_no_cause_without_progress() {
    let err = parse("1 + @").unwrap_err();
    assert_eq!(err.cause, None);
    assert_eq!(err.innermost(), &err);
}

#[test]
fn test_error_message() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.message(), "expression did not consume the whole input");
    assert_eq!(
        err.to_string(),
        "expression did not consume the whole input (remaining input: \"2\")"
    );
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_display_reparses_to_same_tree() {
    for text in [
        "a = $x$ - ($y$ - 1)",
        "2 ^ (3 ^ 2)",
        "(1 + 2) * $Signal (raw)$ % 4",
        "sin(# * pi / 50)",
        "12 - 0.5",
        "x = nan + inf",
    ] {
        let parsed = parse(text).unwrap();
        let rendered = parsed.to_string();
        assert_eq!(parse(&rendered).unwrap(), parsed, "rendered as {rendered}");
    }
}

#[test]
fn test_display_drops_redundant_parens() {
    assert_eq!(value("((1) + (2 * 3))").to_string(), "1 + 2 * 3");
    assert_eq!(value("1 - (2 - 3)").to_string(), "1 - (2 - 3)");
}

#[test]
fn test_display_of_literals_folds_back_to_the_value() {
    let fold = |text: &str| {
        let expr = Parser::new(text).parse_expression().unwrap();
        simplify(&expr, &EvalContext::empty())
            .unwrap()
            .as_literal()
            .unwrap()
    };

    let sum = 0.1 + 0.2;
    let reparsed = fold(&lit(sum).to_string());
    assert!((reparsed - sum).abs() <= 4.0 * f64::EPSILON, "{reparsed} != {sum}");

    assert_eq!(lit(f64::NEG_INFINITY).to_string(), "(0 - inf)");
    assert_eq!(fold(&lit(f64::NEG_INFINITY).to_string()), f64::NEG_INFINITY);
    assert_eq!(fold(&lit(f64::INFINITY).to_string()), f64::INFINITY);
    assert!(fold(&lit(f64::NAN).to_string()).is_nan());
}
