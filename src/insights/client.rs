use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::InsightError;

/// Configuration for rate limiting outbound narrative requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 10,
            burst_size: 2,
        }
    }
}

/// Text-generation backend behind the technical and emotional analyses.
///
/// One call is one request/response exchange; implementations must not
/// retry on their own. The returned text is raw and unvalidated.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Backend name for logs (e.g., "anthropic")
    fn name(&self) -> &str;

    /// Send the instruction plus the expected output schema and return the
    /// model's raw reply text
    async fn generate(&self, instruction: &str, schema_hint: &str) -> Result<String, InsightError>;
}

/// Stand-in backend when no narrative service is configured. The journal
/// keeps working; only the analyses fail, with the stored reason.
#[derive(Debug, Clone)]
pub struct UnconfiguredNarrativeService {
    reason: String,
}

impl UnconfiguredNarrativeService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl NarrativeService for UnconfiguredNarrativeService {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _instruction: &str, _schema_hint: &str) -> Result<String, InsightError> {
        Err(InsightError::Config(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_service_fails_with_reason() {
        let service = UnconfiguredNarrativeService::new("ANTHROPIC_API_KEY is not set");
        let err = service.generate("instruction", "{}").await.unwrap_err();
        assert!(!err.is_retryable());
        match err {
            InsightError::Config(reason) => assert_eq!(reason, "ANTHROPIC_API_KEY is not set"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
