use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use journal_insights::commands::{
    analyze_emotional, analyze_technical, get_dashboard, get_progress, record_reflection, record_trade, DateRange,
};
use journal_insights::gamification::xp;
use journal_insights::insights::{InsightError, InsightKind, NarrativeService};
use journal_insights::models::{CreateReflectionInput, CreateTradeInput, Direction, TradeResult};
use journal_insights::{AppContext, Database, Insight, JournalConfig, JournalError};

const USER: &str = "user-1";

const TECHNICAL_REPLY: &str = r#"```json
{
  "best_session": {"session": "NY Open", "time_range": "09:30-10:30", "win_rate": 70, "trades": 10, "explanation": "Opening drive."},
  "best_setup": {"name": "Breakout", "win_rate": 70, "pnl_total": 900, "profit_factor": 3.1, "trades": 10, "explanation": "Clean levels."},
  "detected_pattern": {"title": "Early exits", "description": "Winners are cut before target.", "impact": "Smaller average win", "recommendation": "Trail the stop."}
}
```"#;

const EMOTIONAL_REPLY: &str = r#"{
  "emotional_state": {"level": "OVERCONFIDENCE", "temperature": 85, "explanation": "Size creeping up."},
  "emotional_pattern": {"keywords": ["easy"], "frequency": "3 of 5 days", "impact_on_results": "Bigger losses", "explanation": "Euphoria after wins."},
  "todays_reflection": {"tone": "neutral", "observation": "Short entry.", "relation_to_result": "Matches a flat day."},
  "ten_day_trend": {"direction": "stable", "details": "Little change."},
  "recommendations": {"immediate": ["Fixed size"], "medium_term": ["Journal before the open"], "motivational_phrases": ["Stay boring"]}
}"#;

struct RecordingService {
    reply: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingService {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeService for RecordingService {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, instruction: &str, schema_hint: &str) -> Result<String, InsightError> {
        self.calls
            .lock()
            .unwrap()
            .push((instruction.to_string(), schema_hint.to_string()));
        Ok(self.reply.clone())
    }
}

fn context(service: Arc<RecordingService>) -> AppContext {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::open_in_memory().unwrap();
    AppContext::new(Arc::new(db), service, JournalConfig::default())
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Duration::days(offset)
}

fn trade_input(date: NaiveDate, result: TradeResult, pnl: f64) -> CreateTradeInput {
    CreateTradeInput {
        date,
        entry_time: "09:40".to_string(),
        exit_time: "10:10".to_string(),
        asset: "NQ".to_string(),
        setup: "Breakout".to_string(),
        direction: Direction::Long,
        trend: "Up".to_string(),
        timeframe: "5m".to_string(),
        session: "NY Open".to_string(),
        contracts: 1.0,
        result,
        result_detail: String::new(),
        pnl,
        points: 0.0,
        comment: "private note".to_string(),
        image_url: None,
    }
}

fn reflection_input(date: NaiveDate) -> CreateReflectionInput {
    CreateReflectionInput {
        date,
        went_well: "Waited for the open to settle".to_string(),
        to_improve: "Too many trades after lunch".to_string(),
        plan_adherence: "partial".to_string(),
        discipline: "6".to_string(),
        success_attribution: String::new(),
        hit_take_profit: false,
        no_setup_no_trade: true,
        controlled_losses: true,
        moved_to_breakeven: false,
        broke_plan: false,
    }
}

async fn record_n_trades(ctx: &AppContext, n: i64) {
    for i in 0..n {
        let result = if i % 3 == 2 { TradeResult::Lose } else { TradeResult::Won };
        let pnl = if result == TradeResult::Won { 100.0 + i as f64 } else { -60.0 - i as f64 };
        record_trade(ctx, USER, trade_input(day(i), result, pnl), day(n)).await.unwrap();
    }
}

#[tokio::test]
async fn technical_analysis_blocked_below_ten_trades() {
    let service = RecordingService::new(TECHNICAL_REPLY);
    let ctx = context(service.clone());
    record_n_trades(&ctx, 9).await;

    let err = analyze_technical(&ctx, USER).await.unwrap_err();
    match err {
        JournalError::Insight(InsightError::InsufficientData { kind, required, have }) => {
            assert_eq!(kind, InsightKind::Technical);
            assert_eq!(required, 10);
            assert_eq!(have, 9);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn technical_analysis_rejects_non_json_reply() {
    let service = RecordingService::new("not json");
    let ctx = context(service.clone());
    record_n_trades(&ctx, 10).await;

    let err = analyze_technical(&ctx, USER).await.unwrap_err();
    assert!(matches!(err, JournalError::Insight(InsightError::NarrativeParse(_))));
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test]
async fn technical_analysis_sends_reduced_payload() {
    let service = RecordingService::new(TECHNICAL_REPLY);
    let ctx = context(service.clone());
    record_n_trades(&ctx, 10).await;

    let insight = analyze_technical(&ctx, USER).await.unwrap();
    let Insight::Technical(technical) = insight else {
        panic!("expected a technical insight");
    };
    assert_eq!(technical.best_session.session, "NY Open");

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    let (instruction, schema_hint) = &calls[0];
    assert!(instruction.contains("\"total_trades\": 10"));
    assert!(!instruction.contains("private note"));
    assert!(!instruction.contains("TRADE-"));
    assert!(schema_hint.contains("detected_pattern"));
}

#[tokio::test]
async fn emotional_analysis_needs_one_reflection() {
    let service = RecordingService::new(EMOTIONAL_REPLY);
    let ctx = context(service.clone());
    record_n_trades(&ctx, 3).await;

    let err = analyze_emotional(&ctx, USER).await.unwrap_err();
    assert!(matches!(
        err,
        JournalError::Insight(InsightError::InsufficientData { required: 1, have: 0, .. })
    ));
    assert!(service.calls().is_empty());

    record_reflection(&ctx, USER, reflection_input(day(2)), day(3)).await.unwrap();
    let Insight::Emotional(emotional) = analyze_emotional(&ctx, USER).await.unwrap() else {
        panic!("expected an emotional insight");
    };
    assert_eq!(emotional.emotional_state.temperature, 85.0);
    assert!(service.calls()[0].0.contains("Too many trades after lunch"));
}

#[tokio::test]
async fn dashboard_matches_reference_scenario() {
    let ctx = context(RecordingService::new("{}"));
    let results = [
        (TradeResult::Won, 7),
        (TradeResult::Lose, 3),
        (TradeResult::Breakeven, 2),
    ];
    let mut i = 0;
    for (result, count) in results {
        for _ in 0..count {
            let pnl = match result {
                TradeResult::Won => 50.0 + i as f64,
                TradeResult::Lose => -40.0 - i as f64,
                TradeResult::Breakeven => 0.5 * i as f64,
            };
            journal_insights::commands::create_trade(&ctx, USER, trade_input(day(i), result, pnl))
                .await
                .unwrap();
            i += 1;
        }
    }

    let dashboard = get_dashboard(&ctx, USER, day(30), DateRange::All).await.unwrap();
    assert_eq!(dashboard.stats.total_trades, 12);
    assert!((dashboard.stats.win_rate - 70.0).abs() < 1e-9);
    assert!((dashboard.stats.win_rate_with_be - 700.0 / 12.0).abs() < 1e-9);
    assert_eq!(dashboard.equity_curve.len(), 12);
}

#[tokio::test]
async fn ledger_tracks_streak_xp_and_badges() {
    let ctx = context(RecordingService::new("{}"));

    // Three consecutive days: streak bonus on the third
    let mut total = 0;
    for offset in 0..3 {
        let recorded = record_trade(&ctx, USER, trade_input(day(offset), TradeResult::Won, 80.0), day(offset))
            .await
            .unwrap();
        total += recorded.ledger.xp_gained;
        assert_eq!(recorded.ledger.streak, offset as u32 + 1);
    }
    assert_eq!(total, 3 * (xp::TRADE_SAVED + xp::WINNING_TRADE) + xp::STREAK_BONUS);

    // Gap of three days resets
    let recorded = record_trade(&ctx, USER, trade_input(day(5), TradeResult::Lose, -20.0), day(5))
        .await
        .unwrap();
    assert_eq!(recorded.ledger.streak, 1);

    let progress = get_progress(&ctx, USER).await.unwrap();
    assert_eq!(progress.xp, total + xp::TRADE_SAVED);
    assert_eq!(progress.level.level, 2);
    assert_eq!(progress.streak, 1);
    let first_win = progress.badges.iter().find(|b| b.id == "first_win").unwrap();
    assert!(first_win.earned);
    assert_eq!(progress.badges.iter().filter(|b| b.earned).count(), 1);
}
