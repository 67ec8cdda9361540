//! External model collaborators.
//!
//! The relay only needs `complete(system_instruction, prompt) -> text`. Live providers
//! (Gemini, OpenRouter) do exactly one HTTP call with no retry; [`MockCollaborator`]
//! answers locally for offline demos.

use crate::config::{LlmMode, LlmProvider, RelayConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use crate::error::CollaboratorError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// Single-shot text completion against an external model.
#[async_trait]
pub trait ModelCollaborator: Send + Sync {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, CollaboratorError>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Build the collaborator selected by `config`, reading the API key from the environment.
pub fn build_collaborator(config: &RelayConfig) -> Arc<dyn ModelCollaborator> {
    if config.llm_mode == LlmMode::Mock {
        tracing::info!("LLM mode: mock (no external calls)");
        return Arc::new(MockCollaborator);
    }

    let key_env = config.llm_provider.api_key_env();
    let api_key = std::env::var(key_env)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    if api_key.is_none() {
        tracing::warn!("{} is not set; generation requests will fail until it is configured", key_env);
    }

    let client = http_client(config.llm_timeout());
    match config.llm_provider {
        LlmProvider::Gemini => {
            let mut c = GeminiClient::new(client, api_key);
            if let Some(model) = &config.llm_model {
                c = c.with_model(model);
            }
            if let Some(base) = &config.llm_api_base {
                c = c.with_api_base(base);
            }
            tracing::info!(provider = c.name(), model = c.model(), "model collaborator ready");
            Arc::new(c)
        }
        LlmProvider::OpenRouter => {
            let mut c = OpenRouterClient::new(client, api_key);
            if let Some(model) = &config.llm_model {
                c = c.with_model(model);
            }
            if let Some(base) = &config.llm_api_base {
                c = c.with_api_base(base);
            }
            tracing::info!(provider = c.name(), model = c.model(), "model collaborator ready");
            Arc::new(c)
        }
    }
}

fn http_client(timeout: Option<Duration>) -> reqwest::Client {
    let builder = reqwest::Client::builder();
    let builder = match timeout {
        Some(t) => builder.timeout(t),
        None => builder,
    };
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("falling back to default HTTP client: {}", e);
        reqwest::Client::new()
    })
}

async fn error_for_status(res: reqwest::Response) -> Result<reqwest::Response, CollaboratorError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(CollaboratorError::Status {
        status: status.as_u16(),
        body,
    })
}

// ---------------------------------------------------------------------------
// Gemini (generateContent)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

/// Google Gemini `generateContent`. Instruction and prompt travel as one user turn.
pub struct GeminiClient {
    api_key: Option<String>,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_base: GEMINI_API_BASE.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Instruction and prompt folded into the single user turn Gemini receives.
pub fn combined_prompt(system_instruction: &str, prompt: &str) -> String {
    format!("{}\n\nUser Request: {}", system_instruction, prompt)
}

fn gemini_text(body: &str) -> Result<String, CollaboratorError> {
    let parsed: GeminiResponse =
        serde_json::from_str(body).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;
    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CollaboratorError::MalformedResponse("no candidates".to_string()))?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(CollaboratorError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl ModelCollaborator for GeminiClient {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingCredentials(LlmProvider::Gemini.api_key_env()))?;

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(combined_prompt(system_instruction, prompt)),
                }],
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let raw = error_for_status(res).await?.text().await?;
        gemini_text(&raw)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ---------------------------------------------------------------------------
// OpenRouter (OpenAI-compatible chat completions)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// OpenRouter chat completions: instruction as `system`, prompt as `user`.
pub struct OpenRouterClient {
    api_key: Option<String>,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_base: OPENROUTER_API_BASE.to_string(),
            model: OPENROUTER_DEFAULT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn chat_text(body: &str) -> Result<String, CollaboratorError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CollaboratorError::MalformedResponse("no choices".to_string()))?;
    match choice.message.and_then(|m| m.content) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(CollaboratorError::EmptyResponse),
    }
}

#[async_trait]
impl ModelCollaborator for OpenRouterClient {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingCredentials(LlmProvider::OpenRouter.api_key_env()))?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .header("X-Title", "PromptCraft")
            .json(&body)
            .send()
            .await?;
        let raw = error_for_status(res).await?.text().await?;
        chat_text(&raw)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

// ---------------------------------------------------------------------------
// Mock
// ---------------------------------------------------------------------------

/// Canned output keyed off the instruction; never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCollaborator;

#[async_trait]
impl ModelCollaborator for MockCollaborator {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, CollaboratorError> {
        let escaped = prompt
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        if system_instruction.contains("React Native") {
            Ok(format!(
                "// Mock generation for: {}\nimport React from 'react';\nimport {{ View, Text }} from 'react-native';\n\nconst App = () => (\n  <View>\n    <Text>Mock app</Text>\n  </View>\n);\n\nexport default App;\n",
                prompt.replace('\n', " ")
            ))
        } else {
            Ok(format!(
                "<!DOCTYPE html>\n<html>\n<head><title>Mock site</title></head>\n<body>\n<h1>Mock generation</h1>\n<p>{}</p>\n</body>\n</html>\n",
                escaped
            ))
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
