use crate::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use crate::clients::common::{
    format_messages, get_shared_http_client, send_and_track, GenerationParams,
};
use async_trait::async_trait;
use log::error;
use openai_rust2 as openai_rust;
use tokio::sync::Mutex;

/// Google's OpenAI-compatible endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

pub struct GeminiClient {
    client: openai_rust::Client,
    pub model: String,
    params: GenerationParams,
    token_usage: Mutex<Option<TokenUsage>>,
}

pub enum Model {
    GeminiPro,
    Gemini15Flash,
    Gemini15Pro,
    Gemini20Flash,
    Gemini20FlashLite001,
    Gemini25Flash,
    Gemini25Pro,
}

pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GeminiPro => "gemini-pro".to_string(),
        Model::Gemini15Flash => "gemini-1.5-flash".to_string(),
        Model::Gemini15Pro => "gemini-1.5-pro".to_string(),
        Model::Gemini20Flash => "gemini-2.0-flash".to_string(),
        Model::Gemini20FlashLite001 => "gemini-2.0-flash-lite-001".to_string(),
        Model::Gemini25Flash => "gemini-2.5-flash".to_string(),
        Model::Gemini25Pro => "gemini-2.5-pro".to_string(),
    }
}

impl GeminiClient {
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, GEMINI_BASE_URL)
    }

    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// This function is used to create a GeminiClient with a custom base URL
    /// The default base URL is "<https://generativelanguage.googleapis.com/v1beta/>"
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        GeminiClient {
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

    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn generation_params(&self) -> &GenerationParams {
        &self.params
    }
}

#[async_trait]
impl ClientWrapper for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError> {
        let url_path = Some("/v1beta/chat/completions".to_string());
        let result = send_and_track(
            &self.client,
            &self.model,
            format_messages(messages),
            &self.params,
            url_path,
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
                    error!("GeminiClient::send_message error: {}", err);
                }
                Err(err)
            }
        }
    }

    /// Without this override there is no token tracking, because the default
    /// trait implementation of `usage_slot()` returns `None`.
    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
