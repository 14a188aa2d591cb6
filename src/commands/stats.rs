use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::context::AppContext;
use crate::error::Result;
use crate::models::Trade;
use crate::stats::{
    compute_equity_curve, compute_stats, group_by, recent_trades, result_distribution, DerivedStats,
    Dimension, GroupedBreakdown, ResultDistribution,
};

const RECENT_TRADES_SHOWN: usize = 5;

/// Dashboard period filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    #[default]
    All,
}

impl DateRange {
    /// First day included, or `None` for no lower bound.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            DateRange::Today => 0,
            DateRange::Week => 7,
            DateRange::Month => 30,
            DateRange::ThreeMonths => 90,
            DateRange::SixMonths => 180,
            DateRange::Year => 365,
            DateRange::All => return None,
        };
        Some(today - Duration::days(days))
    }

    pub fn filter(&self, trades: Vec<Trade>, today: NaiveDate) -> Vec<Trade> {
        match self.start(today) {
            Some(start) => trades.into_iter().filter(|t| t.date >= start).collect(),
            None => trades,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DerivedStats,
    pub equity_curve: Vec<f64>,
    pub by_day: GroupedBreakdown,
    pub by_month: GroupedBreakdown,
    pub by_contracts: GroupedBreakdown,
    pub distribution: ResultDistribution,
    pub recent_trades: Vec<Trade>,
}

impl Dashboard {
    pub fn build(trades: &[Trade], today: NaiveDate) -> Self {
        Self {
            stats: compute_stats(trades, today),
            equity_curve: compute_equity_curve(trades),
            by_day: group_by(trades, Dimension::Day),
            by_month: group_by(trades, Dimension::Month),
            by_contracts: group_by(trades, Dimension::Contracts),
            distribution: result_distribution(trades),
            recent_trades: recent_trades(trades, RECENT_TRADES_SHOWN)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

pub async fn get_dashboard(
    ctx: &AppContext,
    user_id: &str,
    today: NaiveDate,
    range: DateRange,
) -> Result<Dashboard> {
    let trades = range.filter(ctx.db.list_trades(user_id)?, today);
    Ok(Dashboard::build(&trades, today))
}
