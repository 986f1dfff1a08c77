//! Test suite for the arithmetic evaluator
//!
//! Tests cover:
//! - Integer collapse and four-decimal rounding in arithmetic mode
//! - Operator precedence, exponentiation and modulo
//! - Named functions and their fixed four-decimal output
//! - Failure cases, which must all come back as `None`

use mistry::math::{evaluate, try_evaluate, EvalError};

fn eval(expr: &str) -> Option<String> {
    evaluate(expr)
}

#[test]
fn test_simple_arithmetic() {
    assert_eq!(eval("2+2").as_deref(), Some("4"));
    assert_eq!(eval("10 - 3").as_deref(), Some("7"));
    assert_eq!(eval("4 * 5").as_deref(), Some("20"));
    assert_eq!(eval("20 / 4").as_deref(), Some("5"));
    assert_eq!(eval("12 * 8").as_deref(), Some("96"));
}

#[test]
fn test_non_integer_results_round_to_four_places() {
    assert_eq!(eval("1/3").as_deref(), Some("0.3333"));
    assert_eq!(eval("2/3").as_deref(), Some("0.6667"));
    assert_eq!(eval("5/2").as_deref(), Some("2.5"));
    assert_eq!(eval("0.1+0.2").as_deref(), Some("0.3"));
    assert_eq!(eval("-1/8").as_deref(), Some("-0.125"));
}

#[test]
fn test_order_of_operations() {
    assert_eq!(eval("2 + 3 * 4").as_deref(), Some("14"));
    assert_eq!(eval("(2 + 3) * 4").as_deref(), Some("20"));
    assert_eq!(eval("10 - 5 - 2").as_deref(), Some("3"));
    assert_eq!(eval("2^3 * 2").as_deref(), Some("16"));
    assert_eq!(eval("100 / 10 / 2").as_deref(), Some("5"));
}

#[test]
fn test_exponentiation_is_not_xor() {
    assert_eq!(eval("2^3").as_deref(), Some("8"));
    assert_eq!(eval("2^0.5").as_deref(), Some("1.4142"));
    assert_eq!(eval("2^3^2").as_deref(), Some("512"));
}

#[test]
fn test_modulo() {
    assert_eq!(eval("17 % 5").as_deref(), Some("2"));
    assert_eq!(eval("20 % 4").as_deref(), Some("0"));
    assert_eq!(eval("7.5 % 2").as_deref(), Some("1.5"));
}

#[test]
fn test_unary_signs() {
    assert_eq!(eval("-5 + 3").as_deref(), Some("-2"));
    assert_eq!(eval("-(2 + 3)").as_deref(), Some("-5"));
    assert_eq!(eval("4 * -2").as_deref(), Some("-8"));
    assert_eq!(eval("+7").as_deref(), Some("7"));
}

#[test]
fn test_named_functions_keep_four_decimals() {
    assert_eq!(eval("sqrt(16)").as_deref(), Some("4.0000"));
    assert_eq!(eval("sqrt(4)").as_deref(), Some("2.0000"));
    assert_eq!(eval("sqrt(2)").as_deref(), Some("1.4142"));
    assert_eq!(eval("log(100)").as_deref(), Some("2.0000"));
    assert_eq!(eval("ln(1)").as_deref(), Some("0.0000"));
    assert_eq!(eval("cos(0)").as_deref(), Some("1.0000"));
}

#[test]
fn test_trigonometry_uses_radians() {
    assert_eq!(eval("sin(0)").as_deref(), Some("0.0000"));
    assert_eq!(eval("sin(1.5707963)").as_deref(), Some("1.0000"));
    assert_eq!(eval("cos(3.14159265)").as_deref(), Some("-1.0000"));
    assert_eq!(eval("tan(0.7853981)").as_deref(), Some("1.0000"));
    // 90 is radians here, not degrees
    assert_eq!(eval("sin(90)").as_deref(), Some("0.8940"));
}

#[test]
fn test_function_names_are_case_and_space_insensitive() {
    assert_eq!(eval("SQRT( 9 )").as_deref(), Some("3.0000"));
    assert_eq!(eval("Ln(1)").as_deref(), Some("0.0000"));
}

#[test]
fn test_division_by_zero_fails() {
    assert_eq!(eval("5/0"), None);
    assert_eq!(eval("5/(2-2)"), None);
    assert_eq!(eval("5%0"), None);
    assert_eq!(try_evaluate("5/0"), Err(EvalError::DivisionByZero));
}

#[test]
fn test_domain_errors_fail_without_nan_text() {
    assert_eq!(eval("sqrt(-1)"), None);
    assert_eq!(eval("log(0)"), None);
    assert_eq!(eval("ln(-5)"), None);
    assert_eq!(try_evaluate("sqrt(-1)"), Err(EvalError::NotFinite));
}

#[test]
fn test_malformed_expressions_fail() {
    for expr in ["", "   ", "(1+2", "1+2)", "2**3", "*5", "1..2", "()", "abc", "2 apples"].iter() {
        assert_eq!(eval(expr), None, "{:?} should fail", expr);
    }
}

#[test]
fn test_composite_function_expressions_are_unsupported() {
    assert_eq!(eval("sqrt(4)+sin(0)"), None);
    assert_eq!(eval("2*sqrt(4)"), None);
    assert_eq!(eval("sqrt(sqrt(16))"), None);
    assert_eq!(try_evaluate("sqrt(4)+sin(0)"), Err(EvalError::Unsupported));
}

#[test]
fn test_function_call_among_words() {
    assert_eq!(eval("sqrt(2) please").as_deref(), Some("1.4142"));
    assert_eq!(eval("What's sqrt(9)").as_deref(), Some("3.0000"));
    assert_eq!(eval("the sqrt(16)").as_deref(), Some("4.0000"));
    assert_eq!(eval("the cos(0) of it").as_deref(), Some("1.0000"));
}

#[test]
fn test_function_call_among_numbers_is_unsupported() {
    assert_eq!(try_evaluate("sqrt(16) times 2"), Err(EvalError::Unsupported));
    assert_eq!(try_evaluate("add 1 to ln(1)"), Err(EvalError::Unsupported));
    assert_eq!(try_evaluate("sqrt(4) and sin(0)"), Err(EvalError::Unsupported));
}

#[test]
fn test_non_numeric_function_arguments_fail() {
    assert_eq!(eval("sqrt(x)"), None);
    assert_eq!(eval("sqrt(nan)"), None);
    assert_eq!(eval("sin(1.2.3)"), None);
    assert_eq!(eval("cos()"), None);
}

#[test]
fn test_overflow_fails() {
    assert_eq!(eval("10^400"), None);
    assert_eq!(eval("9^9^9"), None);
}

#[test]
fn test_error_messages_are_descriptive() {
    assert_eq!(EvalError::DivisionByZero.to_string(), "division by zero");
    assert_eq!(
        EvalError::InvalidArgument("x".to_string()).to_string(),
        "invalid function argument 'x'"
    );
}
