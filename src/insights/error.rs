use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Technical,
    Emotional,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Technical => "technical",
            InsightKind::Emotional => "emotional",
        }
    }

    /// What the user has to add to unlock the analysis.
    pub fn record_noun(&self) -> &'static str {
        match self {
            InsightKind::Technical => "trades",
            InsightKind::Emotional => "reflections",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Not enough data for {kind} analysis: {have} of {required} {}", .kind.record_noun())]
    InsufficientData {
        kind: InsightKind,
        required: usize,
        have: usize,
    },

    #[error("Narrative response is not valid JSON: {0}")]
    NarrativeParse(String),

    #[error("Narrative response does not match the expected schema: {0}")]
    NarrativeSchema(String),

    #[error("Narrative service error{}: {message}", status_suffix(.status))]
    ExternalService {
        status: Option<u16>,
        message: String,
    },

    #[error("Narrative configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl InsightError {
    /// A manual retry can succeed. Missing data and configuration need the
    /// user to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InsightError::NarrativeParse(_)
                | InsightError::NarrativeSchema(_)
                | InsightError::ExternalService { .. }
        )
    }

    /// Short text suitable for the UI.
    pub fn user_message(&self) -> String {
        match self {
            InsightError::InsufficientData { kind, required, have } => format!(
                "Add {} more {} to unlock {} analysis",
                required.saturating_sub(*have),
                kind.record_noun(),
                kind
            ),
            InsightError::Config(_) => "Analysis is not configured".to_string(),
            _ => "Analysis failed, try again".to_string(),
        }
    }
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        InsightError::ExternalService {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::NarrativeParse(err.to_string())
    }
}
