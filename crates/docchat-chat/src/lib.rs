//! Chat completion against an OpenAI-compatible API, plus the prompt
//! assembly that grounds answers in retrieved chunks.

pub mod prompt;

pub use prompt::{build_context, system_prompt};

use async_trait::async_trait;
use tracing::debug;

use docchat_core::traits::ChatProvider;
use docchat_core::types::{ChatMessage, Role};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat API error: status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse chat response: {0}")]
    Parse(String),
}

/// Explicitly constructed chat-completion client handle.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    async fn request_completion(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let body = serde_json::json!({
            "model": self.model,
            "messages": api_messages,
            "stream": false,
        });

        debug!("chat request to {} ({} messages)", url, messages.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ChatError::Parse("missing choices[0].message.content".to_string()))?
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        Ok(self.request_completion(messages).await?)
    }
}
