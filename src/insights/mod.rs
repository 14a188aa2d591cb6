//! Narrative analysis: precondition gate, payload projection, one call to a
//! text-generation backend and typed validation of its reply.

pub mod anthropic;
pub mod client;
pub mod error;
pub mod payload;
pub mod prompts;
pub mod rate_limiter;
pub mod request;
pub mod schema;

pub use anthropic::AnthropicNarrativeService;
pub use client::{NarrativeService, RateLimitConfig, UnconfiguredNarrativeService};
pub use error::{InsightError, InsightKind};
pub use payload::{EmotionalPayload, TechnicalPayload};
pub use request::{request_emotional_insight, request_technical_insight, InsightRequest, RequestState};
pub use schema::{
    parse_reply, EmotionalInsight, EmotionalLevel, EmotionalState, Insight, TechnicalInsight,
    ThermometerZone,
};
