use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::client::{NarrativeService, RateLimitConfig};
use super::error::InsightError;
use super::rate_limiter::RateLimiter;
use crate::config::NarrativeConfig;

const API_VERSION: &str = "2023-06-01";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Narrative backend on the Anthropic Messages API.
pub struct AnthropicNarrativeService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    rate_limiter: RateLimiter,
}

impl AnthropicNarrativeService {
    pub fn new(config: &NarrativeConfig, api_key: impl Into<String>) -> Result<Self, InsightError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(InsightError::Config(format!("{} is empty", API_KEY_ENV)));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            rate_limiter: RateLimiter::new(&RateLimitConfig {
                requests_per_minute: config.requests_per_minute,
                burst_size: config.burst,
            }),
        })
    }

    /// Read the API key from `ANTHROPIC_API_KEY`.
    pub fn from_env(config: &NarrativeConfig) -> Result<Self, InsightError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| InsightError::Config(format!("{} is not set", API_KEY_ENV)))?;
        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

impl std::fmt::Debug for AnthropicNarrativeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicNarrativeService")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

fn compose_prompt(instruction: &str, schema_hint: &str) -> String {
    format!(
        "{}\n\nRespond ONLY with a JSON object matching this schema:\n{}",
        instruction, schema_hint
    )
}

#[async_trait]
impl NarrativeService for AnthropicNarrativeService {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, instruction: &str, schema_hint: &str) -> Result<String, InsightError> {
        self.rate_limiter.acquire().await;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: compose_prompt(instruction, schema_hint),
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Narrative service returned {}", status);
            return Err(InsightError::ExternalService {
                status: Some(status.as_u16()),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let body: MessagesResponse = response.json().await?;
        Ok(body.content.into_iter().map(|block| block.text).collect::<Vec<_>>().join(""))
    }
}
