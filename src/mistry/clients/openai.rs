//! The `OpenAIClient` struct implements `ClientWrapper` for OpenAI's Chat API,
//! capturing both the assistant response and token usage for the last request.
//!
//! # Example
//!
//! ```rust,no_run
//! use mistry::clients::openai::{Model, OpenAIClient};
//! use mistry::client_wrapper::{ClientWrapper, Message, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let secret_key = std::env::var("OPENAI_API_KEY")?;
//!     let client = OpenAIClient::new_with_model_enum(&secret_key, Model::GPT35Turbo);
//!
//!     let resp = client
//!         .send_message(&[
//!             Message { role: Role::System, content: "You are an assistant.".into() },
//!             Message { role: Role::User, content: "Hello!".into() },
//!         ])
//!         .await?;
//!     println!("Assistant: {}", resp.content);
//!
//!     if let Some(usage) = client.get_last_usage().await {
//!         println!("Tokens used: {}", usage.total_tokens);
//!     }
//!     Ok(())
//! }
//! ```
use async_trait::async_trait;
use openai_rust2 as openai_rust;
use tokio::sync::Mutex;

use crate::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use crate::clients::common::{
    format_messages, get_shared_http_client, send_and_track, GenerationParams,
};

/// Chat models the backend is known to work with.
pub enum Model {
    /// `gpt-3.5-turbo` – the model the chat backend has always defaulted to.
    GPT35Turbo,
    /// `gpt-4o` – Omni model with text + image inputs.
    GPT4o,
    /// `gpt-4o-mini` – cost effective GPT-4o derivative.
    GPT4oMini,
    /// `gpt-4.1-mini` – reduced cost GPT-4.1 tier.
    GPT41Mini,
    /// `gpt-4.1-nano` – ultra low cost GPT-4.1 derivative.
    GPT41Nano,
}

/// Convert a [`Model`] variant into the string identifier expected by the REST API.
pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GPT35Turbo => "gpt-3.5-turbo".to_string(),
        Model::GPT4o => "gpt-4o".to_string(),
        Model::GPT4oMini => "gpt-4o-mini".to_string(),
        Model::GPT41Mini => "gpt-4.1-mini".to_string(),
        Model::GPT41Nano => "gpt-4.1-nano".to_string(),
    }
}

/// Client wrapper for OpenAI's Chat Completions API.
pub struct OpenAIClient {
    /// Underlying SDK client pointing at the REST endpoint.
    client: openai_rust::Client,
    /// Model name that will be injected into each request.
    model: String,
    /// `max_tokens` / `temperature` sent with each request.
    params: GenerationParams,
    /// Storage for the token usage returned by the most recent request.
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a new client using the provided API key and [`Model`] variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Construct a new client using the provided API key and explicit model name.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            params: GenerationParams::default(),
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client targeting a custom OpenAI compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            params: GenerationParams::default(),
            token_usage: Mutex::new(None),
        }
    }

    /// Override the sampling limits (defaults: 500 tokens, temperature 0.7).
    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn generation_params(&self) -> &GenerationParams {
        &self.params
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError> {
        let result = send_and_track(
            &self.client,
            &self.model,
            format_messages(messages),
            &self.params,
            Some("/v1/chat/completions".to_string()),
            &self.token_usage,
        )
        .await;

        match result {
            Ok(content) => Ok(Message {
                role: Role::Assistant,
                content,
            }),
            Err(err) => {
                if log::log_enabled!(log::Level::Error) {
                    log::error!("OpenAIClient::send_message(...): {}", err);
                }
                Err(err)
            }
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
