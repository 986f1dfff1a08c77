//! The `chat_session` module answers chat prompts: it tries the local math fast path
//! first and only forwards the prompt to a remote provider when that path gives up.
//!
//! **Flow per prompt:**
//! 1. Reject empty prompts.
//! 2. [`MathSolver::try_solve`]; a local answer is returned as model `"local-math"`.
//! 3. Otherwise ask OpenAI (if requested and configured), else Gemini (if configured),
//!    else reply with a fixed apology.
//! 4. Record the exchange in the in-memory history, which keeps the newest
//!    [`DEFAULT_HISTORY_LIMIT`] entries unless configured otherwise.
//!
//! ## Quickstart
//!
//! ```rust
//! use mistry::chat_session::{ChatSession, Provider};
//! use mistry::math::{MathSolver, SolutionStyle};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = ChatSession::new(MathSolver::new(SolutionStyle::Plain));
//!
//! let reply = session.chat("What is 12 * 8?", Provider::OpenAI).await.unwrap();
//! assert!(reply.solved_locally);
//! assert_eq!(reply.reply, "The result of 12 * 8 is 96");
//! # }
//! ```

use crate::client_wrapper::{ClientWrapper, Message, Role};
use crate::config::MistryConfig;
use crate::clients::gemini::GeminiClient;
use crate::clients::openai::OpenAIClient;
use crate::math::MathSolver;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Persona prompt sent ahead of every forwarded user message.
pub const SYSTEM_PROMPT: &str = "You are জাদুকর (JADOOKOR), a mystical AI assistant with ancient wisdom. Respond in a wise and mystical manner while being helpful.";

/// Reply used when no provider key is configured.
pub const NO_PROVIDER_REPLY: &str = "I apologize, but I cannot access the mystical realm at the moment. Please ensure the API keys are properly configured.";

/// Model label reported for answers computed by the fast path.
pub const LOCAL_MODEL_LABEL: &str = "local-math";

/// Forwarded exchanges kept before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Remote provider requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl Provider {
    /// Maps the numeric selector used by the chat UI: `1` is OpenAI, anything else Gemini.
    pub fn from_selector(selector: i64) -> Self {
        if selector == 1 {
            Provider::OpenAI
        } else {
            Provider::Gemini
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Message reported to callers when this provider fails; the raw error is only logged.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Provider::OpenAI => "Failed to consult OpenAI oracle",
            Provider::Gemini => "Failed to consult Gemini oracle",
        }
    }
}

/// Answer to a single prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// `"local-math"`, `"openai"` or `"gemini"`.
    pub model: String,
    pub solved_locally: bool,
}

/// One forwarded exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

/// Errors surfaced to the HTTP layer.
#[derive(Debug)]
pub enum ChatError {
    /// Prompt was missing or blank.
    EmptyPrompt,
    /// The remote provider failed; carries [`Provider::failure_message`].
    Upstream(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::EmptyPrompt => write!(f, "Prompt is required"),
            ChatError::Upstream(detail) => write!(f, "Upstream provider error: {}", detail),
        }
    }
}

impl Error for ChatError {}

/// Chat front door shared by every request handler.
///
/// - `solver`: local math fast path.
/// - `openai` / `gemini`: optional remote providers.
/// - `history`: forwarded exchanges, oldest first, at most `history_limit` of them.
pub struct ChatSession {
    solver: MathSolver,
    openai: Option<Arc<dyn ClientWrapper>>,
    gemini: Option<Arc<dyn ClientWrapper>>,
    system_prompt: Message,
    history: Mutex<Vec<HistoryEntry>>,
    history_limit: usize,
}

impl ChatSession {
    /// Creates a session with no remote providers attached.
    pub fn new(solver: MathSolver) -> Self {
        ChatSession {
            solver,
            openai: None,
            gemini: None,
            system_prompt: Message {
                role: Role::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            history: Mutex::new(Vec::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Builds a session with the providers whose keys are present in `config`.
    pub fn from_config(config: &MistryConfig) -> Self {
        let mut session = ChatSession::new(MathSolver::new(config.solution_style));
        let params = config.generation_params();
        if let Some(key) = &config.openai_api_key {
            let client = OpenAIClient::new_with_model_string(key, &config.openai_model)
                .with_generation_params(params);
            session = session.with_openai(Arc::new(client));
        }
        if let Some(key) = &config.gemini_api_key {
            let client = GeminiClient::new_with_model_string(key, &config.gemini_model)
                .with_generation_params(params);
            session = session.with_gemini(Arc::new(client));
        }
        session
    }

    pub fn with_openai(mut self, client: Arc<dyn ClientWrapper>) -> Self {
        self.openai = Some(client);
        self
    }

    pub fn with_gemini(mut self, client: Arc<dyn ClientWrapper>) -> Self {
        self.gemini = Some(client);
        self
    }

    /// Replaces the persona prompt sent to remote providers.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt.content = prompt.into();
        self
    }

    /// Caps the history; older exchanges are dropped first.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn solver(&self) -> &MathSolver {
        &self.solver
    }

    /// Answers `prompt`, locally when possible.
    pub async fn chat(&self, prompt: &str, provider: Provider) -> Result<ChatReply, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        log::info!("Received prompt: {}", prompt);

        if let Some(solution) = self.solver.try_solve(prompt) {
            log::info!("Solved math problem locally");
            return Ok(ChatReply {
                reply: solution,
                model: LOCAL_MODEL_LABEL.to_string(),
                solved_locally: true,
            });
        }

        let gemini = self.gemini.as_ref().map(|client| (Provider::Gemini, client));
        let target = match provider {
            Provider::OpenAI => self
                .openai
                .as_ref()
                .map(|client| (Provider::OpenAI, client))
                .or(gemini),
            Provider::Gemini => gemini,
        };

        let reply = match target {
            Some((used, client)) => self.ask(client.as_ref(), used, prompt).await?,
            None => {
                log::warn!("No provider configured for {}", provider.label());
                NO_PROVIDER_REPLY.to_string()
            }
        };

        {
            let mut history = self.history.lock().await;
            history.push(HistoryEntry {
                prompt: prompt.to_string(),
                reply: reply.clone(),
                timestamp: Utc::now(),
            });
            if history.len() > self.history_limit {
                let excess = history.len() - self.history_limit;
                history.drain(..excess);
            }
        }

        Ok(ChatReply {
            reply,
            model: provider.label().to_string(),
            solved_locally: false,
        })
    }

    async fn ask(
        &self,
        client: &dyn ClientWrapper,
        provider: Provider,
        prompt: &str,
    ) -> Result<String, ChatError> {
        let messages = [
            self.system_prompt.clone(),
            Message {
                role: Role::User,
                content: prompt.to_string(),
            },
        ];

        match client.send_message(&messages).await {
            Ok(message) => {
                if let Some(usage) = client.get_last_usage().await {
                    log::debug!(
                        "{} usage: input={} output={} total={}",
                        client.model_name(),
                        usage.input_tokens,
                        usage.output_tokens,
                        usage.total_tokens
                    );
                }
                Ok(message.content)
            }
            Err(err) => {
                log::error!(
                    "{} error from {}: {}",
                    provider.label(),
                    client.model_name(),
                    err
                );
                Err(ChatError::Upstream(provider.failure_message().to_string()))
            }
        }
    }

    /// Snapshot of the forwarded exchanges, oldest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }
}
