use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Trade, TradeResult};

/// Gross wins over gross losses.
///
/// No losses with positive wins is a real, displayable result and is kept
/// apart from any finite value instead of being encoded as `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Finite(f64),
    Infinite,
}

impl ProfitFactor {
    pub fn from_gross(gross_profit: f64, gross_loss: f64) -> Self {
        if gross_loss > 0.0 {
            ProfitFactor::Finite(gross_profit / gross_loss)
        } else if gross_profit > 0.0 {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Finite(0.0)
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }

    /// Lossy conversion for sorting and charting.
    pub fn as_f64(&self) -> f64 {
        match self {
            ProfitFactor::Finite(value) => *value,
            ProfitFactor::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(value) => write!(f, "{:.2}", value),
            ProfitFactor::Infinite => f.write_str("∞"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub win_rate_with_be: f64,
    pub current_month_win_rate: f64,
    pub current_month_win_rate_with_be: f64,
    pub total_pnl: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: ProfitFactor,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub expected_value: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDistribution {
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
}

impl ResultDistribution {
    pub fn record(&mut self, result: TradeResult) {
        match result {
            TradeResult::Won => self.wins += 1,
            TradeResult::Lose => self.losses += 1,
            TradeResult::Breakeven => self.breakevens += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.breakevens
    }

    /// Wins over Won+Lose, in percent.
    pub fn win_rate(&self) -> f64 {
        percent(self.wins, self.wins + self.losses)
    }

    /// Wins over every trade, breakevens included, in percent.
    pub fn win_rate_with_be(&self) -> f64 {
        percent(self.wins, self.total())
    }
}

pub fn result_distribution(trades: &[Trade]) -> ResultDistribution {
    let mut distribution = ResultDistribution::default();
    for trade in trades {
        distribution.record(trade.result);
    }
    distribution
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { 0.0 }
}

/// Dashboard statistics for a trade list.
///
/// `today` picks the calendar month for the current-month win rates. Gross
/// profit and loss are taken over Won and Lose trades by absolute value, so a
/// mislabelled sign does not flip a win into a loss.
pub fn compute_stats(trades: &[Trade], today: NaiveDate) -> DerivedStats {
    let mut all = ResultDistribution::default();
    let mut current_month = ResultDistribution::default();

    let mut total_pnl = 0.0;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    let mut best_trade: Option<f64> = None;
    let mut worst_trade: Option<f64> = None;

    for trade in trades {
        all.record(trade.result);
        if trade.date.year() == today.year() && trade.date.month() == today.month() {
            current_month.record(trade.result);
        }

        total_pnl += trade.pnl;
        match trade.result {
            TradeResult::Won => gross_profit += trade.pnl.abs(),
            TradeResult::Lose => gross_loss += trade.pnl.abs(),
            TradeResult::Breakeven => {}
        }

        best_trade = Some(best_trade.map_or(trade.pnl, |best| best.max(trade.pnl)));
        worst_trade = Some(worst_trade.map_or(trade.pnl, |worst| worst.min(trade.pnl)));
    }

    let win_rate = all.win_rate();
    let avg_win = mean(gross_profit, all.wins);
    let avg_loss = mean(gross_loss, all.losses);

    // Rates over Won+Lose only; both are zero when nothing was decided.
    let decided = all.wins + all.losses;
    let loss_rate = if decided > 0 { all.losses as f64 / decided as f64 } else { 0.0 };
    let expected_value = avg_win * (win_rate / 100.0) - avg_loss * loss_rate;

    DerivedStats {
        total_trades: all.total(),
        wins: all.wins,
        losses: all.losses,
        breakevens: all.breakevens,
        win_rate,
        win_rate_with_be: all.win_rate_with_be(),
        current_month_win_rate: current_month.win_rate(),
        current_month_win_rate_with_be: current_month.win_rate_with_be(),
        total_pnl,
        gross_profit,
        gross_loss,
        profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
        avg_win,
        avg_loss,
        expected_value,
        best_trade: best_trade.unwrap_or(0.0),
        worst_trade: worst_trade.unwrap_or(0.0),
    }
}

/// Cumulative P&L, one point per trade, in chronological order.
///
/// The first point is the first trade's P&L. Trades with identical date,
/// entry and exit keep their input order.
pub fn compute_equity_curve(trades: &[Trade]) -> Vec<f64> {
    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by(|a, b| a.chronological_cmp(b));

    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|trade| {
            cumulative += trade.pnl;
            cumulative
        })
        .collect()
}

/// The `n` most recent trades, newest first.
pub fn recent_trades(trades: &[Trade], n: usize) -> Vec<&Trade> {
    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by(|a, b| b.chronological_cmp(a));
    sorted.truncate(n);
    sorted
}

/// Trades dated within the last `days` calendar days, today included.
/// Trades dated after `today` are not counted.
pub fn trades_in_last_n_days(trades: &[Trade], days: i64, today: NaiveDate) -> usize {
    if days <= 0 {
        return 0;
    }
    let since = today - chrono::Duration::days(days - 1);
    trades
        .iter()
        .filter(|trade| trade.date >= since && trade.date <= today)
        .count()
}
