use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::NarrativeService;
use super::error::{InsightError, InsightKind};
use super::payload::{EmotionalPayload, TechnicalPayload};
use super::prompts::{emotional_instruction, technical_instruction, EMOTIONAL_SCHEMA, TECHNICAL_SCHEMA};
use super::schema::{parse_reply, EmotionalInsight, TechnicalInsight, Validate};
use crate::config::AnalysisConfig;
use crate::models::{Reflection, Trade};
use crate::stats::SelectionPolicy;

/// Where a single analysis run is. A run that ends in `Blocked` made no
/// external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Checking,
    Blocked,
    Requesting,
    Awaiting,
    Parsed,
    Failed,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Blocked | RequestState::Parsed | RequestState::Failed)
    }
}

/// One analysis attempt against a narrative backend.
///
/// Failures are never retried here; calling a `run_*` method again starts a
/// fresh attempt from `Idle`.
pub struct InsightRequest<'a> {
    service: &'a dyn NarrativeService,
    config: &'a AnalysisConfig,
    state: RequestState,
}

impl<'a> InsightRequest<'a> {
    pub fn new(service: &'a dyn NarrativeService, config: &'a AnalysisConfig) -> Self {
        Self {
            service,
            config,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    fn check(&mut self, kind: InsightKind, required: usize, have: usize) -> Result<(), InsightError> {
        self.state = RequestState::Checking;
        if have < required {
            log::debug!("{} analysis blocked: {} of {} {}", kind, have, required, kind.record_noun());
            self.state = RequestState::Blocked;
            return Err(InsightError::InsufficientData { kind, required, have });
        }
        Ok(())
    }

    async fn exchange<T>(&mut self, kind: InsightKind, instruction: &str, schema_hint: &str) -> Result<T, InsightError>
    where
        T: DeserializeOwned + Validate,
    {
        log::info!(
            "Requesting {} analysis from {} ({} bytes)",
            kind,
            self.service.name(),
            instruction.len()
        );

        self.state = RequestState::Awaiting;
        let outcome = match self.service.generate(instruction, schema_hint).await {
            Ok(raw) => parse_reply::<T>(&raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(insight) => {
                self.state = RequestState::Parsed;
                Ok(insight)
            }
            Err(e) => {
                log::warn!("{} analysis failed: {}", kind, e);
                self.state = RequestState::Failed;
                Err(e)
            }
        }
    }

    fn fail(&mut self, e: InsightError) -> InsightError {
        self.state = RequestState::Failed;
        e
    }

    pub async fn run_technical(&mut self, trades: &[Trade]) -> Result<TechnicalInsight, InsightError> {
        self.check(InsightKind::Technical, self.config.min_technical_trades, trades.len())?;

        self.state = RequestState::Requesting;
        let policy = SelectionPolicy {
            min_trades: self.config.min_group_trades,
        };
        let payload = TechnicalPayload::build(trades, &policy);
        let instruction = technical_instruction(&payload).map_err(|e| self.fail(e))?;

        self.exchange(InsightKind::Technical, &instruction, TECHNICAL_SCHEMA).await
    }

    pub async fn run_emotional(
        &mut self,
        reflections: &[Reflection],
        trades: &[Trade],
    ) -> Result<EmotionalInsight, InsightError> {
        self.check(
            InsightKind::Emotional,
            self.config.min_emotional_reflections,
            reflections.len(),
        )?;

        self.state = RequestState::Requesting;
        let payload = EmotionalPayload::build(
            reflections,
            trades,
            self.config.reflection_window,
            self.config.recent_trade_window,
        );
        let instruction = emotional_instruction(&payload).map_err(|e| self.fail(e))?;

        self.exchange(InsightKind::Emotional, &instruction, EMOTIONAL_SCHEMA).await
    }
}

pub async fn request_technical_insight(
    service: &dyn NarrativeService,
    trades: &[Trade],
    config: &AnalysisConfig,
) -> Result<TechnicalInsight, InsightError> {
    InsightRequest::new(service, config).run_technical(trades).await
}

pub async fn request_emotional_insight(
    service: &dyn NarrativeService,
    reflections: &[Reflection],
    trades: &[Trade],
    config: &AnalysisConfig,
) -> Result<EmotionalInsight, InsightError> {
    InsightRequest::new(service, config)
        .run_emotional(reflections, trades)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::schema::fixtures::{EMOTIONAL_REPLY, TECHNICAL_REPLY};
    use crate::models::TradeResult;
    use crate::stats::test_support::{date, trade};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedService {
        reply: Result<String, u16>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NarrativeService for ScriptedService {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, instruction: &str, _schema_hint: &str) -> Result<String, InsightError> {
            self.calls.lock().unwrap().push(instruction.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(InsightError::ExternalService {
                    status: Some(*status),
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn trades(n: u32) -> Vec<Trade> {
        (1..=n)
            .map(|day| trade(date(2025, 5, day), "09:30", TradeResult::Won, 10.0))
            .collect()
    }

    fn reflection() -> Reflection {
        Reflection {
            id: "REFLECTION-1".to_string(),
            user_id: "user-1".to_string(),
            date: date(2025, 5, 1),
            went_well: "Waited for confirmation".to_string(),
            to_improve: String::new(),
            plan_adherence: "full".to_string(),
            discipline: "high".to_string(),
            success_attribution: String::new(),
            hit_take_profit: true,
            no_setup_no_trade: true,
            controlled_losses: true,
            moved_to_breakeven: false,
            broke_plan: false,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_technical_blocked_below_threshold() {
        let service = ScriptedService::replying(TECHNICAL_REPLY);
        let config = AnalysisConfig::default();
        let mut request = InsightRequest::new(&service, &config);
        assert_eq!(request.state(), RequestState::Idle);

        let err = request.run_technical(&trades(9)).await.unwrap_err();
        assert!(matches!(
            err,
            InsightError::InsufficientData {
                kind: InsightKind::Technical,
                required: 10,
                have: 9
            }
        ));
        assert_eq!(request.state(), RequestState::Blocked);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_technical_parsed() {
        let service = ScriptedService::replying(TECHNICAL_REPLY);
        let config = AnalysisConfig::default();
        let mut request = InsightRequest::new(&service, &config);

        let insight = request.run_technical(&trades(10)).await.unwrap();
        assert_eq!(insight.best_setup.name, "Breakout");
        assert_eq!(request.state(), RequestState::Parsed);
        assert_eq!(service.call_count(), 1);
        assert!(service.calls.lock().unwrap()[0].contains("\"total_trades\": 10"));
    }

    #[tokio::test]
    async fn test_garbage_reply_fails_without_fallback() {
        let service = ScriptedService::replying("not json");
        let config = AnalysisConfig::default();
        let mut request = InsightRequest::new(&service, &config);

        let err = request.run_technical(&trades(12)).await.unwrap_err();
        assert!(matches!(err, InsightError::NarrativeParse(_)));
        assert_eq!(request.state(), RequestState::Failed);
        assert!(request.state().is_terminal());
    }

    #[tokio::test]
    async fn test_service_error_is_surfaced_once() {
        let service = ScriptedService::failing(503);
        let config = AnalysisConfig::default();

        let err = request_technical_insight(&service, &trades(10), &config).await.unwrap_err();
        assert!(matches!(err, InsightError::ExternalService { status: Some(503), .. }));
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_emotional_requires_a_reflection() {
        let service = ScriptedService::replying(EMOTIONAL_REPLY);
        let config = AnalysisConfig::default();

        let err = request_emotional_insight(&service, &[], &trades(3), &config).await.unwrap_err();
        assert!(matches!(
            err,
            InsightError::InsufficientData {
                kind: InsightKind::Emotional,
                required: 1,
                have: 0
            }
        ));
        assert_eq!(service.call_count(), 0);

        let insight = request_emotional_insight(&service, &[reflection()], &trades(3), &config)
            .await
            .unwrap();
        assert_eq!(insight.emotional_state.temperature, 52.0);
        assert_eq!(service.call_count(), 1);
    }
}
