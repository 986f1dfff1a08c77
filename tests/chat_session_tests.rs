use async_trait::async_trait;
use mistry::chat_session::{
    ChatError, ChatSession, Provider, DEFAULT_HISTORY_LIMIT, LOCAL_MODEL_LABEL, NO_PROVIDER_REPLY,
    SYSTEM_PROMPT,
};
use mistry::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use mistry::math::{MathSolver, SolutionStyle};
use std::sync::Arc;
use tokio::sync::Mutex;

// Mock client for testing
struct MockClient {
    name: String,
    usage: Mutex<Option<TokenUsage>>,
    response_content: String,
    fail: bool,
    last_messages: Mutex<Vec<Message>>,
    calls: Mutex<usize>,
}

impl MockClient {
    fn new(name: &str, response_content: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: Mutex::new(None),
            response_content: response_content.to_string(),
            fail: false,
            last_messages: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, "")
        }
    }

    async fn call_count(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl ClientWrapper for MockClient {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError> {
        *self.calls.lock().await += 1;
        *self.last_messages.lock().await = messages.to_vec();

        if self.fail {
            return Err("connection reset by peer".into());
        }

        *self.usage.lock().await = Some(TokenUsage {
            input_tokens: 12,
            output_tokens: 5,
            total_tokens: 17,
        });

        Ok(Message {
            role: Role::Assistant,
            content: self.response_content.clone(),
        })
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.usage)
    }
}

fn session_with(openai: Option<Arc<MockClient>>, gemini: Option<Arc<MockClient>>) -> ChatSession {
    let mut session = ChatSession::new(MathSolver::new(SolutionStyle::Plain));
    if let Some(client) = openai {
        session = session.with_openai(client);
    }
    if let Some(client) = gemini {
        session = session.with_gemini(client);
    }
    session
}

#[tokio::test]
async fn test_math_prompt_is_answered_locally() {
    let openai = Arc::new(MockClient::new("gpt-test", "remote answer"));
    let session = session_with(Some(openai.clone()), None);

    let reply = session.chat("What is 12 * 8?", Provider::OpenAI).await.unwrap();

    assert!(reply.solved_locally);
    assert_eq!(reply.model, LOCAL_MODEL_LABEL);
    assert!(reply.reply.contains("96"));
    assert_eq!(openai.call_count().await, 0);
    // Local answers are not recorded
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn test_unsolvable_math_falls_back_to_provider() {
    let openai = Arc::new(MockClient::new("gpt-test", "Infinity is not a number, seeker."));
    let session = session_with(Some(openai.clone()), None);

    let reply = session.chat("What is 5/0?", Provider::OpenAI).await.unwrap();

    assert!(!reply.solved_locally);
    assert_eq!(reply.model, "openai");
    assert_eq!(reply.reply, "Infinity is not a number, seeker.");
    assert_eq!(openai.call_count().await, 1);
}

#[tokio::test]
async fn test_forwarded_prompt_carries_persona_and_original_text() {
    let openai = Arc::new(MockClient::new("gpt-test", "Long ago..."));
    let session = session_with(Some(openai.clone()), None);

    session
        .chat("Tell me about history", Provider::OpenAI)
        .await
        .unwrap();

    let sent = openai.last_messages.lock().await.clone();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].role, Role::System);
    assert_eq!(sent[0].content, SYSTEM_PROMPT);
    assert_eq!(sent[1].role, Role::User);
    assert_eq!(sent[1].content, "Tell me about history");
}

#[tokio::test]
async fn test_openai_request_falls_back_to_gemini() {
    let gemini = Arc::new(MockClient::new("gemini-test", "From the stars"));
    let session = session_with(None, Some(gemini.clone()));

    let reply = session.chat("Who are you?", Provider::OpenAI).await.unwrap();

    assert_eq!(reply.reply, "From the stars");
    // The label follows the requested provider
    assert_eq!(reply.model, "openai");
    assert_eq!(gemini.call_count().await, 1);
}

#[tokio::test]
async fn test_gemini_request_does_not_use_openai() {
    let openai = Arc::new(MockClient::new("gpt-test", "unused"));
    let session = session_with(Some(openai.clone()), None);

    let reply = session.chat("Who are you?", Provider::Gemini).await.unwrap();

    assert_eq!(reply.reply, NO_PROVIDER_REPLY);
    assert_eq!(reply.model, "gemini");
    assert_eq!(openai.call_count().await, 0);
}

#[tokio::test]
async fn test_no_provider_reply_is_recorded() {
    let session = session_with(None, None);

    let reply = session.chat("Hello", Provider::OpenAI).await.unwrap();
    assert_eq!(reply.reply, NO_PROVIDER_REPLY);

    let history = session.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prompt, "Hello");
    assert_eq!(history[0].reply, NO_PROVIDER_REPLY);
}

#[tokio::test]
async fn test_empty_prompt_is_rejected() {
    let session = session_with(None, None);

    let err = session.chat("   ", Provider::OpenAI).await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyPrompt));
    assert_eq!(err.to_string(), "Prompt is required");
}

#[tokio::test]
async fn test_provider_failure_is_reported() {
    let openai = Arc::new(MockClient::failing("gpt-test"));
    let session = session_with(Some(openai), None);

    let err = session.chat("Tell me a story", Provider::OpenAI).await.unwrap_err();
    match err {
        ChatError::Upstream(details) => assert_eq!(details, "Failed to consult OpenAI oracle"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn test_failure_names_the_provider_actually_used() {
    let gemini = Arc::new(MockClient::failing("gemini-test"));
    let session = session_with(None, Some(gemini));

    // OpenAI requested but not configured, so Gemini answers (and fails).
    let err = session.chat("Tell me a story", Provider::OpenAI).await.unwrap_err();
    assert_eq!(err.to_string(), "Upstream provider error: Failed to consult Gemini oracle");
}

#[tokio::test]
async fn test_history_keeps_only_newest_entries() {
    let gemini = Arc::new(MockClient::new("gemini-test", "reply"));
    let session = session_with(None, Some(gemini)).with_history_limit(2);

    for prompt in ["one", "two", "three"].iter() {
        session.chat(prompt, Provider::Gemini).await.unwrap();
    }

    let prompts: Vec<String> = session.history().await.into_iter().map(|e| e.prompt).collect();
    assert_eq!(prompts, vec!["two".to_string(), "three".to_string()]);
}

#[test]
fn test_default_history_limit() {
    assert_eq!(DEFAULT_HISTORY_LIMIT, 1000);
}

#[tokio::test]
async fn test_history_accumulates_and_clears() {
    let gemini = Arc::new(MockClient::new("gemini-test", "reply"));
    let session = session_with(None, Some(gemini));

    session.chat("first", Provider::Gemini).await.unwrap();
    session.chat("second", Provider::Gemini).await.unwrap();

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].prompt, "first");
    assert_eq!(history[1].prompt, "second");
    assert!(history[0].timestamp <= history[1].timestamp);

    session.clear_history().await;
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn test_usage_is_tracked_by_client() {
    let openai = Arc::new(MockClient::new("gpt-test", "ok"));
    let session = session_with(Some(openai.clone()), None);

    assert!(openai.get_last_usage().await.is_none());
    session.chat("Describe the moon", Provider::OpenAI).await.unwrap();

    let usage = openai.get_last_usage().await.unwrap();
    assert_eq!(usage.total_tokens, 17);
}

#[tokio::test]
async fn test_scroll_style_session() {
    let session = ChatSession::new(MathSolver::new(SolutionStyle::Scroll));

    let reply = session
        .chat("I owe 120 / 8 gold coins", Provider::OpenAI)
        .await
        .unwrap();

    assert!(reply.solved_locally);
    assert!(reply.reply.contains("120/8 = 15"));
}

#[test]
fn test_provider_selector() {
    assert_eq!(Provider::from_selector(1), Provider::OpenAI);
    assert_eq!(Provider::from_selector(2), Provider::Gemini);
    assert_eq!(Provider::from_selector(0), Provider::Gemini);
    assert_eq!(Provider::OpenAI.label(), "openai");
}
