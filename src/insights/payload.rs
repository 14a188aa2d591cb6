use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{most_recent, Direction, Reflection, Trade, TradeResult};
use crate::stats::{recent_trades, result_distribution, summarize_patterns, PatternSummary, SelectionPolicy};

/// Reduced trade projection sent for technical analysis. Ids, comments and
/// screenshots never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalTradeRow {
    pub date: NaiveDate,
    pub asset: String,
    pub setup: String,
    pub session: String,
    pub direction: Direction,
    pub result: TradeResult,
    pub pnl: f64,
    pub entry_time: String,
    pub contracts: f64,
}

impl From<&Trade> for TechnicalTradeRow {
    fn from(trade: &Trade) -> Self {
        Self {
            date: trade.date,
            asset: trade.asset.clone(),
            setup: trade.setup.clone(),
            session: trade.session.clone(),
            direction: trade.direction,
            result: trade.result,
            pnl: trade.pnl,
            entry_time: trade.entry_time.clone(),
            contracts: trade.contracts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalPayload {
    pub total_trades: usize,
    /// Wins over decided trades, 0-100
    pub win_rate: f64,
    pub trades: Vec<TechnicalTradeRow>,
    pub standouts: PatternSummary,
}

impl TechnicalPayload {
    pub fn build(trades: &[Trade], policy: &SelectionPolicy) -> Self {
        let mut ordered: Vec<&Trade> = trades.iter().collect();
        ordered.sort_by(|a, b| a.chronological_cmp(b));

        Self {
            total_trades: trades.len(),
            win_rate: result_distribution(trades).win_rate(),
            trades: ordered.into_iter().map(TechnicalTradeRow::from).collect(),
            standouts: summarize_patterns(trades, policy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionRow {
    pub date: NaiveDate,
    pub went_well: String,
    pub to_improve: String,
    pub plan_adherence: String,
    pub discipline: String,
    pub success_attribution: String,
}

impl From<&Reflection> for ReflectionRow {
    fn from(reflection: &Reflection) -> Self {
        Self {
            date: reflection.date,
            went_well: reflection.went_well.clone(),
            to_improve: reflection.to_improve.clone(),
            plan_adherence: reflection.plan_adherence.clone(),
            discipline: reflection.discipline.clone(),
            success_attribution: reflection.success_attribution.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTradeRow {
    pub date: NaiveDate,
    pub result: TradeResult,
    pub pnl: f64,
}

impl From<&Trade> for RecentTradeRow {
    fn from(trade: &Trade) -> Self {
        Self {
            date: trade.date,
            result: trade.result,
            pnl: trade.pnl,
        }
    }
}

/// Latest reflections (newest first) with the latest trades as context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionalPayload {
    pub reflections: Vec<ReflectionRow>,
    pub recent_trades: Vec<RecentTradeRow>,
}

impl EmotionalPayload {
    pub fn build(
        reflections: &[Reflection],
        trades: &[Trade],
        reflection_window: usize,
        trade_window: usize,
    ) -> Self {
        Self {
            reflections: most_recent(reflections, reflection_window)
                .into_iter()
                .map(ReflectionRow::from)
                .collect(),
            recent_trades: recent_trades(trades, trade_window)
                .into_iter()
                .map(RecentTradeRow::from)
                .collect(),
        }
    }
}
