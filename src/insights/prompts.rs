use serde::Serialize;

use super::error::InsightError;
use super::payload::{EmotionalPayload, TechnicalPayload};

pub const TECHNICAL_SCHEMA: &str = r#"{
  "best_session": {
    "session": "string, session label taken from the data",
    "time_range": "string, e.g. \"09:30-11:00\"",
    "win_rate": "number 0-100",
    "trades": "integer",
    "explanation": "string"
  },
  "best_setup": {
    "name": "string, setup label taken from the data",
    "win_rate": "number 0-100",
    "pnl_total": "number",
    "profit_factor": "number >= 0",
    "trades": "integer",
    "explanation": "string"
  },
  "detected_pattern": {
    "title": "string",
    "description": "string",
    "impact": "string",
    "recommendation": "string"
  }
}"#;

pub const EMOTIONAL_SCHEMA: &str = r#"{
  "emotional_state": {
    "level": "FEAR | STRESS | BALANCE | CONFIDENCE | OVERCONFIDENCE",
    "temperature": "number 0-100 (0 = fear, 50 = balance, 100 = overconfidence)",
    "explanation": "string"
  },
  "emotional_pattern": {
    "keywords": ["string"],
    "frequency": "string",
    "impact_on_results": "string",
    "explanation": "string"
  },
  "todays_reflection": {
    "tone": "positive | neutral | negative",
    "observation": "string",
    "relation_to_result": "string"
  },
  "ten_day_trend": {
    "direction": "improving | stable | deteriorating",
    "details": "string",
    "alerts": ["string"]
  },
  "recommendations": {
    "immediate": ["string"],
    "medium_term": ["string"],
    "motivational_phrases": ["string"]
  }
}"#;

fn render<T: Serialize>(preamble: &str, payload: &T) -> Result<String, InsightError> {
    let data = serde_json::to_string_pretty(payload)
        .map_err(|e| InsightError::Config(format!("Failed to serialize payload: {}", e)))?;
    Ok(format!("{}\n\nDATA:\n{}", preamble, data))
}

pub fn technical_instruction(payload: &TechnicalPayload) -> Result<String, InsightError> {
    render(
        "You are a trading performance analyst. Study the trader's journal below. \
         Identify the session with the best results, the most profitable setup and \
         one recurring pattern that costs or earns money. Use only labels and numbers \
         that appear in the data; `standouts` holds precomputed candidates.",
        payload,
    )
}

pub fn emotional_instruction(payload: &EmotionalPayload) -> Result<String, InsightError> {
    render(
        "You are a trading psychology coach. Read the trader's most recent reflections \
         (newest first) and the matching trade outcomes. Rate the current emotional \
         state, name the dominant emotional pattern, comment on the latest reflection, \
         describe the trend over the period and give concrete recommendations.",
        payload,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SelectionPolicy;

    #[test]
    fn test_schemas_are_valid_json() {
        let technical: serde_json::Value = serde_json::from_str(TECHNICAL_SCHEMA).unwrap();
        assert!(technical.get("detected_pattern").is_some());

        let emotional: serde_json::Value = serde_json::from_str(EMOTIONAL_SCHEMA).unwrap();
        assert!(emotional.get("ten_day_trend").is_some());
    }

    #[test]
    fn test_instruction_embeds_payload() {
        let payload = TechnicalPayload::build(&[], &SelectionPolicy::default());
        let text = technical_instruction(&payload).unwrap();
        assert!(text.contains("DATA:"));
        assert!(text.contains("\"total_trades\": 0"));
    }
}
