//! A ClientWrapper is a wrapper around a specific cloud LLM service.
//! It provides the "send prompt, receive text" contract the chat layer falls back to
//! when the local math fast path cannot answer.
//! It does not keep track of the conversation, for that we use a ChatSession.

use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;

/// Represents the possible roles for a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    // set by the developer to steer the model's responses
    System,
    // a message sent by a human user (or app user)
    User,
    // lets the model know the content was generated as a response to a user message
    Assistant,
}

impl Role {
    /// Wire name used by OpenAI-compatible chat endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// Represents a generic message to be sent to an LLM.
#[derive(Clone, Debug)]
pub struct Message {
    /// The role associated with the message.
    pub role: Role,
    /// The actual content of the message.
    pub content: String,
}

/// Type alias for the thread-safe error box returned by providers.
pub type ClientError = Box<dyn Error + Send + Sync>;

/// Trait defining the interface to interact with various LLM services.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Identifier of the model requests are sent to.
    fn model_name(&self) -> &str;

    /// Send a message to the LLM and get a response.
    /// - `messages`: The messages to send in the request.
    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError>;

    /// Hook to retrieve usage from the *last* send_message() call.
    /// Default impl returns None so wrappers without tracking don't break.
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        match self.usage_slot() {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        // Implementations supporting TokenUsage tracking should return their slot here.
        None
    }
}
