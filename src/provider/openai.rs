//! OpenAI-compatible chat completions client (DeepSeek, OpenAI, local gateways).

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    ProviderError,
    TranslationProvider,
    TranslationRequest,
};
use crate::config::ServiceConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider speaking `POST {base_url}/chat/completions` in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    #[must_use]
    pub fn new(service: &ServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: chat_endpoint(&service.base_url),
            api_key: service.api_key.clone(),
            model: service.model.clone(),
            temperature: service.temperature,
            max_tokens: service.max_tokens,
        }
    }

    async fn send(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
            messages: [
                ChatMessage { role: "system", content: &request.system_prompt },
                ChatMessage { role: "user", content: &request.payload },
            ],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, locale = %request.locale, "Sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

impl TranslationProvider for OpenAiProvider {
    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.send(request).boxed()
    }
}

/// `https://api.deepseek.com` → `https://api.deepseek.com/chat/completions`.
fn chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}
