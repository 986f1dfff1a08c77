//! # Arithmetic Evaluator
//!
//! Computes answers for normalized expressions without ever executing code built from
//! user input. Two modes are tried in order:
//!
//! 1. **Pure arithmetic**: the expression (whitespace removed) consists only of digits,
//!    `+ - * / % ^ ( )` and `.`. It is parsed by a recursive-descent parser with the usual
//!    precedence: parentheses, then `^` (right associative), then unary sign, then
//!    `* / %`, then `+ -`. Whole results print without decimals; anything else is rounded
//!    to four places with trailing zeros removed.
//! 2. **Named function**: the expression holds one call to `sqrt`, `sin`, `cos`, `tan`,
//!    `log` (base 10) or `ln` with a plain numeric argument, optionally among words
//!    (`"the sqrt(16)"`). Trigonometric arguments are in
//!    **radians**. Results always carry four decimals, so `sqrt(4)` is `"2.0000"`.
//!
//! ```rust
//! use mistry::math::evaluate;
//!
//! assert_eq!(evaluate("2+2").as_deref(), Some("4"));
//! assert_eq!(evaluate("1/3").as_deref(), Some("0.3333"));
//! assert_eq!(evaluate("sqrt(16)").as_deref(), Some("4.0000"));
//! assert_eq!(evaluate("5/0"), None);
//! assert_eq!(evaluate("sqrt(-1)"), None);
//! ```
//!
//! ## Limitations
//!
//! Composite function expressions such as `sqrt(4)+sin(0)`, `2*sqrt(4)` or `sqrt(16) times 2`
//! are rejected rather than partially evaluated. Callers treat `None` as "ask the remote provider".

use std::error::Error;
use std::fmt;

/// Deepest parenthesis/unary nesting accepted before the parser gives up.
const MAX_DEPTH: usize = 64;

/// Why a local evaluation failed.
///
/// Only visible through [`try_evaluate`]; [`evaluate`] folds every variant into `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Input is empty after removing whitespace.
    Empty,
    /// Input is neither pure arithmetic nor a single supported function call.
    Unsupported,
    /// Unexpected character or token at the given byte offset.
    Syntax(usize),
    /// `(` without its `)` or the other way round.
    UnbalancedParentheses,
    /// Right-hand side of `/` or `%` is zero.
    DivisionByZero,
    /// Function argument is not a plain decimal number.
    InvalidArgument(String),
    /// Result is NaN or infinite (negative square root, overflow, `log(0)`).
    NotFinite,
    /// Expression nests deeper than the parser allows.
    TooDeep,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Empty => write!(f, "empty expression"),
            EvalError::Unsupported => write!(f, "unsupported expression"),
            EvalError::Syntax(pos) => write!(f, "syntax error at offset {}", pos),
            EvalError::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::InvalidArgument(arg) => write!(f, "invalid function argument '{}'", arg),
            EvalError::NotFinite => write!(f, "result is not a finite number"),
            EvalError::TooDeep => write!(f, "expression nested too deeply"),
        }
    }
}

impl Error for EvalError {}

/// Single-argument functions available in function mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedFunction {
    Sqrt,
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
}

impl NamedFunction {
    const ALL: [NamedFunction; 6] = [
        NamedFunction::Sqrt,
        NamedFunction::Sin,
        NamedFunction::Cos,
        NamedFunction::Tan,
        NamedFunction::Log,
        NamedFunction::Ln,
    ];

    /// Name as written in a call.
    pub fn name(self) -> &'static str {
        match self {
            NamedFunction::Sqrt => "sqrt",
            NamedFunction::Sin => "sin",
            NamedFunction::Cos => "cos",
            NamedFunction::Tan => "tan",
            NamedFunction::Log => "log",
            NamedFunction::Ln => "ln",
        }
    }

    /// Applies the function; trigonometric arguments are radians.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            NamedFunction::Sqrt => x.sqrt(),
            NamedFunction::Sin => x.sin(),
            NamedFunction::Cos => x.cos(),
            NamedFunction::Tan => x.tan(),
            NamedFunction::Log => x.log10(),
            NamedFunction::Ln => x.ln(),
        }
    }
}

/// Evaluates a normalized expression and formats the answer, or returns `None`.
pub fn evaluate(expr: &str) -> Option<String> {
    try_evaluate(expr).ok()
}

/// Like [`evaluate`] but reports why the expression could not be solved.
pub fn try_evaluate(expr: &str) -> Result<String, EvalError> {
    let sanitized: String = expr
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if sanitized.is_empty() {
        return Err(EvalError::Empty);
    }

    if sanitized.bytes().all(is_arithmetic_byte) {
        let value = evaluate_arithmetic(&sanitized)?;
        return Ok(format_arithmetic(value));
    }

    if super::classifier::FUNCTION_NAMES
        .iter()
        .any(|name| sanitized.contains(name))
    {
        let value = evaluate_function_call(&sanitized)?;
        return Ok(format_fixed4(value));
    }

    Err(EvalError::Unsupported)
}

fn is_arithmetic_byte(b: u8) -> bool {
    b.is_ascii_digit() || b"+-*/().^%".contains(&b)
}

/// Parses and computes a pure arithmetic expression (no whitespace expected).
pub fn evaluate_arithmetic(expr: &str) -> Result<f64, EvalError> {
    let mut parser = Parser::new(expr);
    let value = parser.parse_expr()?;
    if let Some(b) = parser.peek() {
        return Err(if b == b')' {
            EvalError::UnbalancedParentheses
        } else {
            EvalError::Syntax(parser.pos)
        });
    }
    finite(value)
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NotFinite)
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(EvalError::TooDeep)
        } else {
            Ok(())
        }
    }

    fn parse_expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_term()?;
        loop {
            if self.eat(b'+') {
                value += self.parse_term()?;
            } else if self.eat(b'-') {
                value -= self.parse_term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_unary()?;
        loop {
            if self.eat(b'*') {
                value *= self.parse_unary()?;
            } else if self.eat(b'/') {
                let divisor = self.parse_unary()?;
                if divisor == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value /= divisor;
            } else if self.eat(b'%') {
                let divisor = self.parse_unary()?;
                if divisor == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value %= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        if self.eat(b'-') {
            self.descend()?;
            let value = self.parse_unary()?;
            self.depth -= 1;
            Ok(-value)
        } else if self.eat(b'+') {
            self.descend()?;
            let value = self.parse_unary()?;
            self.depth -= 1;
            Ok(value)
        } else {
            self.parse_power()
        }
    }

    fn parse_power(&mut self) -> Result<f64, EvalError> {
        let base = self.parse_primary()?;
        if self.eat(b'^') {
            self.descend()?;
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.descend()?;
                let value = self.parse_expr()?;
                if !self.eat(b')') {
                    return Err(EvalError::UnbalancedParentheses);
                }
                self.depth -= 1;
                Ok(value)
            }
            Some(b) if b.is_ascii_digit() || b == b'.' => self.parse_number(),
            Some(b')') => Err(EvalError::UnbalancedParentheses),
            Some(_) => Err(EvalError::Syntax(self.pos)),
            None => Err(EvalError::Syntax(self.pos)),
        }
    }

    fn parse_number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        let mut digits = 0;
        let mut seen_dot = false;

        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                digits += 1;
            } else if b == b'.' && !seen_dot {
                seen_dot = true;
            } else {
                break;
            }
            self.pos += 1;
        }

        if digits == 0 {
            return Err(EvalError::Syntax(start));
        }

        // Only ASCII digits and one dot were consumed.
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| EvalError::Syntax(start))?;
        text.parse::<f64>().map_err(|_| EvalError::Syntax(start))
    }
}

/// Evaluates the leftmost `name(arg)` call; surrounding words are ignored.
///
/// Digits, operators or parentheses outside the call mean a composite expression,
/// which is rejected.
fn evaluate_function_call(expr: &str) -> Result<f64, EvalError> {
    let (start, function) = find_function_call(expr).ok_or(EvalError::Unsupported)?;
    let open = start + function.name().len();

    let close = matching_paren(expr, open).ok_or(EvalError::UnbalancedParentheses)?;
    let outside = expr[..start].bytes().chain(expr[close + 1..].bytes());
    for b in outside {
        if b.is_ascii_digit() || b"+-*/%^()".contains(&b) {
            return Err(EvalError::Unsupported);
        }
    }

    let argument = parse_plain_number(&expr[open + 1..close])?;
    finite(function.apply(argument))
}

/// Byte offset of the leftmost `name(` and the function it names.
fn find_function_call(expr: &str) -> Option<(usize, NamedFunction)> {
    let mut best: Option<(usize, NamedFunction)> = None;
    for function in NamedFunction::ALL.iter().copied() {
        let pattern = format!("{}(", function.name());
        if let Some(pos) = expr.find(&pattern) {
            match best {
                Some((best_pos, _)) if best_pos <= pos => {}
                _ => best = Some((pos, function)),
            }
        }
    }
    best
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(expr: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, b) in expr.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Accepts an optional sign, digits and at most one dot; rejects `inf`, `nan` and the like.
fn parse_plain_number(text: &str) -> Result<f64, EvalError> {
    let unsigned = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(text);
    let digit_count = unsigned.bytes().filter(u8::is_ascii_digit).count();
    let dot_count = unsigned.bytes().filter(|&b| b == b'.').count();

    if digit_count == 0 || dot_count > 1 || digit_count + dot_count != unsigned.len() {
        return Err(EvalError::InvalidArgument(text.to_string()));
    }

    text.parse::<f64>()
        .map_err(|_| EvalError::InvalidArgument(text.to_string()))
}

/// Whole numbers without a decimal point, otherwise four places minus trailing zeros.
///
/// ```rust
/// use mistry::math::evaluator::format_arithmetic;
///
/// assert_eq!(format_arithmetic(96.0), "96");
/// assert_eq!(format_arithmetic(2.5), "2.5");
/// assert_eq!(format_arithmetic(2.0 / 3.0), "0.6667");
/// ```
pub fn format_arithmetic(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{}", value + 0.0);
    }

    let fixed = format!("{:.4}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Exactly four decimals, with negative zero shown as `0.0000`.
pub fn format_fixed4(value: f64) -> String {
    format!("{:.4}", value + 0.0)
}
