use crate::client_wrapper::{ClientError, Message, TokenUsage};
use lazy_static::lazy_static;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::time::Duration;
use tokio::sync::Mutex;

lazy_static! {
    /// One connection pool for every provider client in the process.
    static ref SHARED_HTTP_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .timeout(Duration::from_secs(120))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
}

/// Sampling limits attached to every chat request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on completion tokens; `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            max_tokens: Some(500),
            temperature: Some(0.7),
        }
    }
}

/// Shared, keep-alive enabled `reqwest` client.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &*SHARED_HTTP_CLIENT
}

/// Convert our messages into the SDK's chat format.
pub fn format_messages(messages: &[Message]) -> Vec<chat::Message> {
    messages
        .iter()
        .map(|msg| chat::Message {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        })
        .collect()
}

/// Request body for `model` with `params` applied.
pub fn build_chat_arguments(
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    params: &GenerationParams,
) -> chat::ChatArguments {
    let mut chat_arguments = chat::ChatArguments::new(model, formatted_msgs);
    chat_arguments.max_tokens = params.max_tokens;
    chat_arguments.temperature = params.temperature;
    chat_arguments
}

/// Send a chat request, record its usage, and return the assistant's content.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    params: &GenerationParams,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<String, ClientError> {
    let chat_arguments = build_chat_arguments(model, formatted_msgs, params);

    let response = match api.create_chat(chat_arguments, url_path).await {
        Ok(response) => response,
        Err(err) => {
            log::error!(
                "mistry::clients::common::send_and_track(...): API Error: {}",
                err
            );
            return Err(format!("provider request failed: {}", err).into());
        }
    };

    let usage = TokenUsage {
        input_tokens: response.usage.prompt_tokens as usize,
        output_tokens: response.usage.completion_tokens as usize,
        total_tokens: response.usage.total_tokens as usize,
    };

    // Store it for get_last_usage()
    *usage_slot.lock().await = Some(usage);

    match response.choices.first() {
        Some(choice) => Ok(choice.message.content.clone()),
        None => Err("provider returned no choices".into()),
    }
}
