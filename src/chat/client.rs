use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transcript::Turn;
use crate::config::ChatConfig;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed chat response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("chat response contained no choices")]
    EmptyResponse,
}

/// Body of an OpenAI-compatible chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Anything that can answer a chat-completion request.
pub trait ChatBackend {
    /// Return the assistant's reply text.
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

/// Blocking client for an OpenRouter (OpenAI-compatible) endpoint.
#[derive(Debug)]
pub struct OpenRouterClient {
    config: ChatConfig,
    http: reqwest::blocking::Client,
}

impl OpenRouterClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl ChatBackend for OpenRouterClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        log::debug!(
            "sending {} messages to {} ({})",
            request.messages.len(),
            self.endpoint(),
            request.model
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ChatError::Status { status, body });
        }
        parse_reply(&body)
    }
}

/// Pull `choices[0].message.content` out of a response body.
pub fn parse_reply(body: &str) -> Result<String, ChatError> {
    let parsed: CompletionResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or(ChatError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_matches_the_openai_shape() {
        let req = ChatRequest {
            model: "openai/gpt-4o-mini".into(),
            messages: vec![Turn::system("sys"), Turn::user("hi")],
            max_tokens: 400,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "openai/gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 400
            })
        );
    }

    #[test]
    fn reads_first_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"38% survived."}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "38% survived.");
    }

    #[test]
    fn rejects_bad_bodies() {
        assert!(matches!(parse_reply("not json"), Err(ChatError::Malformed(_))));
        assert!(matches!(parse_reply(r#"{"choices":[]}"#), Err(ChatError::EmptyResponse)));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = OpenRouterClient::new(ChatConfig {
            api_key: "k".into(),
            base_url: "https://example.test/api/v1/".into(),
            ..ChatConfig::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "https://example.test/api/v1/chat/completions");
    }
}
