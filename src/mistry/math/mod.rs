//! Local arithmetic fast path.
//!
//! Pipeline: [`is_math_problem`] → [`normalize`] (or [`extract_expressions`]) →
//! [`evaluate`] → worded answer from [`solve_math_problem`] / [`solve_embedded`].
//! Every step is a pure function over its input; failure anywhere is `None`, which
//! tells the chat layer to forward the original prompt to a remote provider.

pub mod classifier;
pub mod evaluator;
pub mod extractor;
pub mod solver;

pub use classifier::is_math_problem;
pub use evaluator::{evaluate, try_evaluate, EvalError, NamedFunction};
pub use extractor::{extract_expressions, normalize};
pub use solver::{solve_embedded, solve_math_problem, MathSolver, SolutionStyle};
