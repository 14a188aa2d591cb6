//! Typed narrative replies.
//!
//! A reply becomes a [`TechnicalInsight`] or [`EmotionalInsight`] only after
//! it parses as JSON, deserializes into the schema and passes range checks.
//! Nothing partially parsed ever leaves this module. Keys beyond the
//! schema are ignored for both kinds.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{InsightError, InsightKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSession {
    pub session: String,
    pub time_range: String,
    pub win_rate: f64,
    pub trades: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSetup {
    pub name: String,
    pub win_rate: f64,
    pub pnl_total: f64,
    pub profit_factor: f64,
    pub trades: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub title: String,
    pub description: String,
    pub impact: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalInsight {
    pub best_session: BestSession,
    pub best_setup: BestSetup,
    pub detected_pattern: DetectedPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionalLevel {
    Fear,
    Stress,
    Balance,
    Confidence,
    Overconfidence,
}

/// Reading of the 0-100 emotional temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermometerZone {
    Alert,
    Balanced,
    HighConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub level: EmotionalLevel,
    pub temperature: f64,
    pub explanation: String,
}

impl EmotionalState {
    pub fn zone(&self) -> ThermometerZone {
        if self.temperature <= 30.0 {
            ThermometerZone::Alert
        } else if self.temperature <= 60.0 {
            ThermometerZone::Balanced
        } else {
            ThermometerZone::HighConfidence
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPattern {
    pub keywords: Vec<String>,
    pub frequency: String,
    pub impact_on_results: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaysReflection {
    pub tone: Tone,
    pub observation: String,
    pub relation_to_result: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Deteriorating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenDayTrend {
    pub direction: TrendDirection,
    pub details: String,
    #[serde(default)]
    pub alerts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub medium_term: Vec<String>,
    pub motivational_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalInsight {
    pub emotional_state: EmotionalState,
    pub emotional_pattern: EmotionalPattern,
    pub todays_reflection: TodaysReflection,
    pub ten_day_trend: TenDayTrend,
    pub recommendations: Recommendations,
}

/// Either narrative, tagged by kind for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "insight", rename_all = "lowercase")]
pub enum Insight {
    Technical(TechnicalInsight),
    Emotional(EmotionalInsight),
}

impl Insight {
    pub fn kind(&self) -> InsightKind {
        match self {
            Insight::Technical(_) => InsightKind::Technical,
            Insight::Emotional(_) => InsightKind::Emotional,
        }
    }
}

impl From<TechnicalInsight> for Insight {
    fn from(insight: TechnicalInsight) -> Self {
        Insight::Technical(insight)
    }
}

impl From<EmotionalInsight> for Insight {
    fn from(insight: EmotionalInsight) -> Self {
        Insight::Emotional(insight)
    }
}

/// Range checks that serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn check_percent(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be within [0, 100], got {}", field, value))
    }
}

fn check_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} must be a finite number", field))
    }
}

impl Validate for TechnicalInsight {
    fn validate(&self) -> Result<(), String> {
        check_percent("best_session.win_rate", self.best_session.win_rate)?;
        check_percent("best_setup.win_rate", self.best_setup.win_rate)?;
        check_finite("best_setup.pnl_total", self.best_setup.pnl_total)?;
        check_finite("best_setup.profit_factor", self.best_setup.profit_factor)?;
        if self.best_setup.profit_factor < 0.0 {
            return Err("best_setup.profit_factor must not be negative".to_string());
        }
        Ok(())
    }
}

impl Validate for EmotionalInsight {
    fn validate(&self) -> Result<(), String> {
        check_percent("emotional_state.temperature", self.emotional_state.temperature)
    }
}

/// Remove one surrounding markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match body.split_once('\n') {
        Some((info, content)) if !info.contains('{') => content.trim(),
        _ => body.trim(),
    }
}

/// Parse and validate a raw narrative reply.
///
/// Malformed JSON is [`InsightError::NarrativeParse`]; well-formed JSON of the
/// wrong shape or out of range is [`InsightError::NarrativeSchema`].
pub fn parse_reply<T>(raw: &str) -> Result<T, InsightError>
where
    T: DeserializeOwned + Validate,
{
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| InsightError::NarrativeParse(e.to_string()))?;

    if !value.is_object() {
        return Err(InsightError::NarrativeSchema("reply must be a JSON object".to_string()));
    }

    let parsed: T = serde_json::from_value(value).map_err(|e| InsightError::NarrativeSchema(e.to_string()))?;
    parsed.validate().map_err(InsightError::NarrativeSchema)?;
    Ok(parsed)
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const TECHNICAL_REPLY: &str = r#"{
        "best_session": {
            "session": "NY Open",
            "time_range": "09:30-11:00",
            "win_rate": 72.5,
            "trades": 11,
            "explanation": "Most wins cluster in the first 90 minutes."
        },
        "best_setup": {
            "name": "Breakout",
            "win_rate": 68.0,
            "pnl_total": 1240.5,
            "profit_factor": 2.4,
            "trades": 9,
            "explanation": "Breakouts with volume carry the account."
        },
        "detected_pattern": {
            "title": "Afternoon giveback",
            "description": "Trades after 14:00 lose most of the morning gains.",
            "impact": "-35% of gross profit",
            "recommendation": "Stop trading after 13:30."
        }
    }"#;

    pub const EMOTIONAL_REPLY: &str = r#"{
        "emotional_state": {"level": "BALANCE", "temperature": 52, "explanation": "Calm wording."},
        "emotional_pattern": {
            "keywords": ["patient", "disciplined"],
            "frequency": "7 of 10 days",
            "impact_on_results": "Win rate 70% on calm days",
            "explanation": "Calm days produce better results."
        },
        "todays_reflection": {"tone": "positive", "observation": "Followed the plan.", "relation_to_result": "Matches the win."},
        "ten_day_trend": {"direction": "improving", "details": "Less frustration lately.", "alerts": []},
        "recommendations": {
            "immediate": ["Keep the pre-market routine"],
            "medium_term": ["Review losing trades weekly"],
            "motivational_phrases": ["Process over outcome"]
        }
    }"#;
}
