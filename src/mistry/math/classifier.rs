//! Decides whether a chat message is worth a local arithmetic attempt.
//!
//! The rules favour recall: a false positive only costs a failed local evaluation
//! before the prompt goes to the remote provider anyway.
//!
//! ```rust
//! use mistry::math::is_math_problem;
//!
//! assert!(is_math_problem("What is 12 * 8?"));
//! assert!(is_math_problem("sqrt(x)"));
//! assert!(!is_math_problem("Tell me about history"));
//! ```

/// Characters that count as arithmetic operators for rule 1.
const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '^', '%', '='];

/// Function names recognised when immediately followed by `(`.
pub const FUNCTION_NAMES: &[&str] = &["sqrt", "sin", "cos", "tan", "log", "ln"];

/// Conversational triggers, in priority order for [`crate::math::normalize`].
pub const TRIGGER_PHRASES: &[&str] = &[
    "calculate",
    "compute",
    "solve",
    "evaluate",
    "what is",
    "find the",
    "value of",
];

/// Returns `true` when `input` plausibly contains a math query.
///
/// Any one of these is enough:
/// 1. an operator (`+ - * / ^ % =`) and at least one digit,
/// 2. a call pattern such as `sqrt(` or `ln(` (case-insensitive),
/// 3. a trigger phrase (`calculate`, `what is`, ...) and at least one digit.
pub fn is_math_problem(input: &str) -> bool {
    let has_digit = contains_digit(input);
    let lowered = input.to_ascii_lowercase();

    (has_digit && input.contains(OPERATOR_CHARS))
        || contains_function_call(&lowered)
        || (has_digit && contains_trigger(&lowered))
}

pub(crate) fn contains_digit(input: &str) -> bool {
    input.bytes().any(|b| b.is_ascii_digit())
}

fn contains_function_call(lowered: &str) -> bool {
    FUNCTION_NAMES.iter().any(|name| {
        let mut pattern = String::with_capacity(name.len() + 1);
        pattern.push_str(name);
        pattern.push('(');
        lowered.contains(&pattern)
    })
}

fn contains_trigger(lowered: &str) -> bool {
    TRIGGER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
