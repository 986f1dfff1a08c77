//! Strips conversational wrapping so the evaluator only sees the expression.
//!
//! Two strategies share the same output contract:
//!
//! - [`normalize`] removes a trigger phrase and trailing punctuation
//!   (`"What is 12 * 8?"` becomes `"12 * 8"`).
//! - [`extract_expressions`] pulls every arithmetic-looking run out of free text
//!   (`"I paid 12*3 and then 7+5"` yields `["12*3", "7+5"]`).
//!
//! Neither validates the remainder; malformed text is left for the evaluator to reject.

use super::classifier::TRIGGER_PHRASES;

const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.'];

/// Removes the leftmost trigger phrase (case-insensitive) and any trailing `?`, `!` or `.`.
///
/// Interior dots are kept, so decimals survive: `"what is 2.5 * 2?"` becomes `"2.5 * 2"`.
/// Normalizing text that has no trigger phrase and no trailing punctuation is a no-op.
///
/// ```rust
/// use mistry::math::normalize;
///
/// assert_eq!(normalize("Calculate 3 + 4!"), "3 + 4");
/// assert_eq!(normalize("3 + 4"), "3 + 4");
/// ```
pub fn normalize(input: &str) -> String {
    let stripped = match find_trigger(input) {
        Some((start, len)) => {
            let mut remainder = String::with_capacity(input.len() - len);
            remainder.push_str(&input[..start]);
            remainder.push_str(&input[start + len..]);
            remainder
        }
        None => input.to_string(),
    };

    stripped
        .trim()
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .trim()
        .to_string()
}

/// Byte offset and length of the leftmost trigger phrase.
/// Phrases starting at the same offset resolve in [`TRIGGER_PHRASES`] order.
fn find_trigger(input: &str) -> Option<(usize, usize)> {
    // ASCII lowercasing keeps byte offsets aligned with `input`.
    let lowered = input.to_ascii_lowercase();
    let mut best: Option<(usize, usize)> = None;

    for phrase in TRIGGER_PHRASES {
        if let Some(pos) = lowered.find(phrase) {
            match best {
                Some((best_pos, _)) if best_pos <= pos => {}
                _ => best = Some((pos, phrase.len())),
            }
        }
    }

    best
}

fn is_window_char(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '(' | ')' | '.')
        || c.is_whitespace()
}

/// Collects every arithmetic run embedded in `input`.
///
/// A run is a maximal stretch of digits, operators, parentheses, dots and whitespace.
/// Each run is trimmed, loses sentence dots and inner whitespace, and is kept only when
/// it contains a digit followed by an operator and another digit.
///
/// ```rust
/// use mistry::math::extract_expressions;
///
/// let found = extract_expressions("First 12 * 3, then (7 + 5) / 2. Done.");
/// assert_eq!(found, vec!["12*3".to_string(), "(7+5)/2".to_string()]);
/// ```
pub fn extract_expressions(input: &str) -> Vec<String> {
    let mut expressions = Vec::new();
    let mut window_start: Option<usize> = None;

    for (idx, c) in input.char_indices() {
        match (is_window_char(c), window_start) {
            (true, None) => window_start = Some(idx),
            (false, Some(start)) => {
                push_candidate(&mut expressions, &input[start..idx]);
                window_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = window_start {
        push_candidate(&mut expressions, &input[start..]);
    }

    expressions
}

fn push_candidate(expressions: &mut Vec<String>, window: &str) {
    let mut candidate = window.trim();

    // A leading dot that does not start a decimal belongs to the previous sentence.
    while candidate.starts_with('.') && !candidate[1..].starts_with(|c: char| c.is_ascii_digit()) {
        candidate = candidate[1..].trim_start();
    }
    candidate = candidate.trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    let cleaned: String = candidate.chars().filter(|c| !c.is_whitespace()).collect();
    if has_binary_operation(&cleaned) {
        expressions.push(cleaned);
    }
}

/// True when a digit is followed, somewhere later, by an operator and then another digit.
fn has_binary_operation(candidate: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_operator = false;

    for c in candidate.chars() {
        if c.is_ascii_digit() {
            if seen_operator {
                return true;
            }
            seen_digit = true;
        } else if seen_digit && matches!(c, '+' | '-' | '*' | '/' | '^' | '%') {
            seen_operator = true;
        }
    }

    false
}
