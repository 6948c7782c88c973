//! OpenAI-compatible chat completions adapter.
//!
//! Shared by every provider that speaks `POST {base}/chat/completions` with
//! bearer auth; each gets its own base URL, key, and label.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

use super::generate::TextGenerator;
use super::http::{build_http_client, check_status, map_transport_error, read_json};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatibleClient {
    client: Client,
    provider: &'static str,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatibleClient {
    pub fn new(
        provider: &'static str,
        model: &str,
        api_key: &str,
        base_url: &str,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: build_http_client()?,
            provider,
            model: model.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(self.provider, e))?;

        let response = check_status(self.provider, response).await?;
        let body: ChatCompletionResponse = read_json(self.provider, response).await?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse {
                provider: self.provider.to_string(),
                message: "no choices in response".to_string(),
            })?;

        if choice.finish_reason.as_deref() == Some("length") {
            return Err(GenerationError::InvalidResponse {
                provider: self.provider.to_string(),
                message: "completion cut off by the token limit".to_string(),
            });
        }

        Ok(choice.message.content.unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }
}
