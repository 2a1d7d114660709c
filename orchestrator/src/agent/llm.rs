use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::AgentError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f64 = 0.7;

/// Completions can legitimately take much longer than a provider lookup.
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

/// The opaque reasoning capability: a conversation in, one text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AgentError>;
}

pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiChat {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(CHAT_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: OPENAI_CHAT_URL.to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AgentError> {
        let key = self.api_key.as_deref().ok_or(AgentError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": MODEL,
            "temperature": TEMPERATURE,
            "messages": messages,
        });
        debug!("Requesting completion for {} message(s)", messages.len());

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(AgentError::EmptyCompletion)
    }
}
