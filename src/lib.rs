//! # Mistry AI (জাদুকর)
//!
//! Backend for the Mistry AI chat assistant. Prompts are answered in one of two ways:
//!
//! * **Locally**, when the [`math`] fast path recognises simple arithmetic
//!   (`"What is 12 * 8?"`) or a single named function call (`"sqrt(16)"`) and can
//!   evaluate it without a network round trip.
//! * **Remotely**, by forwarding the prompt to OpenAI or Gemini through a
//!   [`ClientWrapper`] implementation from [`clients`].
//!
//! [`ChatSession`] ties the two together and keeps the conversation history; the
//! `server` feature exposes it over HTTP with axum.
//!
//! ## The math fast path
//!
//! ```rust
//! use mistry::math::{evaluate, is_math_problem, normalize, solve_math_problem};
//!
//! let prompt = "Calculate 7 * (3 + 2)?";
//! assert!(is_math_problem(prompt));
//! assert_eq!(normalize(prompt), "7 * (3 + 2)");
//! assert_eq!(evaluate("7 * (3 + 2)").as_deref(), Some("35"));
//! assert_eq!(
//!     solve_math_problem(prompt).as_deref(),
//!     Some("The result of 7 * (3 + 2) is 35")
//! );
//! ```
//!
//! Expressions are parsed by a small recursive-descent parser over digits,
//! `+ - * / % ^` and parentheses; nothing from the prompt is ever executed as code.
//! Every failure (syntax, division by zero, negative square root) is reported as `None`,
//! which tells the caller to ask a remote provider instead.
//!
//! ## Chatting
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mistry::chat_session::Provider;
//! use mistry::clients::openai::{Model, OpenAIClient};
//! use mistry::math::MathSolver;
//! use mistry::ChatSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     mistry::init_logger();
//!
//!     let client = OpenAIClient::new_with_model_enum(&std::env::var("OPENAI_API_KEY")?, Model::GPT35Turbo);
//!     let session = ChatSession::new(MathSolver::default()).with_openai(Arc::new(client));
//!
//!     let reply = session.chat("Tell me a riddle", Provider::OpenAI).await?;
//!     println!("[{}] {}", reply.model, reply.reply);
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding Mistry can opt-in to `RUST_LOG` driven diagnostics
/// without having to choose a specific logging backend upfront.
///
/// ```rust
/// mistry::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `mistry` module.
pub mod mistry;

// Re-exporting key items for easier external access.
pub use mistry::chat_session;
pub use mistry::chat_session::{ChatReply, ChatSession, HistoryEntry, Provider};
pub use mistry::client_wrapper;
pub use mistry::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
pub use mistry::clients;
pub use mistry::config;
pub use mistry::config::{ConfigError, MistryConfig};
pub use mistry::math;
#[cfg(feature = "server")]
pub use mistry::server;
