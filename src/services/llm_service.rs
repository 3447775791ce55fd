//! Text completion against an OpenAI-compatible `/completions` endpoint.
//!
//! Prompts go in as free text and completions come back as free text. Nothing here
//! checks the shape of what the model writes; that happens in `response_parser`.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::config::AppConfig;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl CompletionOptions {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub enum LlmError {
    HttpError(reqwest::Error),
    Upstream { status: u16, body: String },
    EmptyCompletion,
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::HttpError(err) => write!(f, "HTTP error: {}", err),
            LlmError::Upstream { status, body } => {
                write!(f, "Completion request failed with status {}: {}", status, body)
            }
            LlmError::EmptyCompletion => write!(f, "Completion response had no choices"),
        }
    }
}

impl Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::HttpError(err)
    }
}

pub trait CompletionModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        options: CompletionOptions,
    ) -> BoxFuture<'a, Result<String, LlmError>>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        Self::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.completion_model,
            config.upstream_timeout,
        )
    }

    async fn execute(&self, prompt: &str, options: CompletionOptions) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        log::debug!(
            "Requesting completion from {} ({} prompt chars, max_tokens {})",
            self.model,
            prompt.len(),
            options.max_tokens
        );

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(LlmError::EmptyCompletion)
    }
}

impl CompletionModel for OpenAiCompletionClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        options: CompletionOptions,
    ) -> BoxFuture<'a, Result<String, LlmError>> {
        self.execute(prompt, options).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CompletionOptions::default();
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.max_tokens, 256);
        assert_eq!(CompletionOptions::with_max_tokens(3000).max_tokens, 3000);
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo-instruct",
            prompt: "hello",
            temperature: 0.7,
            max_tokens: 256,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo-instruct");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_first_choice_text_is_the_completion() {
        let body = r#"{"id":"cmpl-1","choices":[{"text":"Berlin","index":0},{"text":"Paris","index":1}]}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].text, "Berlin");
    }
}
