//! Turns a chat message into a finished answer, or `None` so the caller asks a provider.
//!
//! ```rust
//! use mistry::math::{solve_math_problem, MathSolver, SolutionStyle};
//!
//! assert_eq!(
//!     solve_math_problem("What is 12 * 8?").as_deref(),
//!     Some("The result of 12 * 8 is 96")
//! );
//! assert_eq!(solve_math_problem("Tell me about history"), None);
//!
//! let solver = MathSolver::new(SolutionStyle::Scroll);
//! let answer = solver.try_solve("Split 90 / 4 coins").unwrap();
//! assert!(answer.contains("90/4 = 22.5"));
//! ```

use super::classifier::is_math_problem;
use super::evaluator::evaluate;
use super::extractor::{extract_expressions, normalize};
use serde::{Deserialize, Serialize};

const SCROLL_HEADER: &str = "🧮 **Mathematical Solution:**";
const SCROLL_FOOTER: &str = "*Calculated locally by Mistry AI's ancient arithmetic scrolls*";

/// How a local answer is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionStyle {
    /// `"The result of {expr} is {result}"` for the expression left after [`normalize`].
    Plain,
    /// Decorated block with one `"{expr} = {result}"` line per embedded expression.
    Scroll,
}

impl Default for SolutionStyle {
    fn default() -> Self {
        SolutionStyle::Plain
    }
}

impl std::str::FromStr for SolutionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(SolutionStyle::Plain),
            "scroll" => Ok(SolutionStyle::Scroll),
            other => Err(format!("unknown solution style '{}'", other)),
        }
    }
}

/// Strips the trigger phrase, evaluates what is left and words the answer plainly.
pub fn solve_math_problem(input: &str) -> Option<String> {
    let expr = normalize(input);
    let result = evaluate(&expr)?;
    Some(format!("The result of {} is {}", expr, result))
}

/// Evaluates every arithmetic run embedded in `input`; failed runs are skipped.
pub fn solve_embedded(input: &str) -> Option<String> {
    let mut lines = String::new();
    for expr in extract_expressions(input) {
        if let Some(result) = evaluate(&expr) {
            lines.push_str(&expr);
            lines.push_str(" = ");
            lines.push_str(&result);
            lines.push('\n');
        }
    }

    if lines.is_empty() {
        return None;
    }
    Some(format!("{}\n\n{}\n{}", SCROLL_HEADER, lines, SCROLL_FOOTER))
}

/// The fast path as one value: classify, then solve with the configured style.
///
/// Stateless and `Copy`, so one instance can be shared by every request handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathSolver {
    style: SolutionStyle,
}

impl MathSolver {
    pub fn new(style: SolutionStyle) -> Self {
        MathSolver { style }
    }

    pub fn style(&self) -> SolutionStyle {
        self.style
    }

    /// Solves `input` only if it looks like math in the first place.
    pub fn try_solve(&self, input: &str) -> Option<String> {
        if !is_math_problem(input) {
            return None;
        }
        self.solve(input)
    }

    /// Solves `input` without consulting the classifier.
    pub fn solve(&self, input: &str) -> Option<String> {
        match self.style {
            SolutionStyle::Plain => solve_math_problem(input),
            SolutionStyle::Scroll => solve_embedded(input),
        }
    }
}
