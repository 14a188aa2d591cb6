use serde::{Deserialize, Serialize};

use super::aggregate::ProfitFactor;
use super::breakdown::{group_by, Bucket, BucketKey, Dimension};
use crate::models::Trade;

/// Sample-size floor applied before picking a "best" group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    pub min_trades: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self { min_trades: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPick {
    pub session: String,
    pub win_rate: f64,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupPick {
    pub setup: String,
    pub win_rate: f64,
    pub pnl_total: f64,
    pub profit_factor: ProfitFactor,
    pub trade_count: usize,
}

/// Precomputed standouts handed to the narrative request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub best_session: Option<SessionPick>,
    pub best_setup: Option<SetupPick>,
}

/// Label groups that meet the sample floor, ignoring blank labels.
fn eligible_groups(trades: &[Trade], dimension: Dimension, policy: &SelectionPolicy) -> Vec<(String, Bucket)> {
    group_by(trades, dimension)
        .buckets
        .into_iter()
        .filter_map(|(key, bucket)| match key {
            BucketKey::Label(label) if !label.trim().is_empty() => Some((label, bucket)),
            _ => None,
        })
        .filter(|(_, bucket)| bucket.trade_count >= policy.min_trades.max(1))
        .collect()
}

/// Highest strict win rate; ties go to more trades, then the smaller label.
fn pick_best(groups: Vec<(String, Bucket)>) -> Option<(String, Bucket)> {
    groups.into_iter().min_by(|(a_label, a), (b_label, b)| {
        b.win_rate()
            .total_cmp(&a.win_rate())
            .then_with(|| b.trade_count.cmp(&a.trade_count))
            .then_with(|| a_label.cmp(b_label))
    })
}

pub fn select_best_session(trades: &[Trade], policy: &SelectionPolicy) -> Option<SessionPick> {
    pick_best(eligible_groups(trades, Dimension::Session, policy)).map(|(session, bucket)| SessionPick {
        session,
        win_rate: bucket.win_rate(),
        trade_count: bucket.trade_count,
    })
}

/// Same ordering as [`select_best_session`], over setup labels.
pub fn select_best_setup(trades: &[Trade], policy: &SelectionPolicy) -> Option<SetupPick> {
    pick_best(eligible_groups(trades, Dimension::Setup, policy)).map(|(setup, bucket)| SetupPick {
        setup,
        win_rate: bucket.win_rate(),
        pnl_total: bucket.pnl,
        profit_factor: bucket.profit_factor(),
        trade_count: bucket.trade_count,
    })
}

pub fn summarize_patterns(trades: &[Trade], policy: &SelectionPolicy) -> PatternSummary {
    PatternSummary {
        best_session: select_best_session(trades, policy),
        best_setup: select_best_setup(trades, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeResult;
    use crate::stats::test_support::{date, trade};

    fn session_trade(session: &str, result: TradeResult, pnl: f64) -> Trade {
        let mut t = trade(date(2025, 4, 1), "09:30", result, pnl);
        t.session = session.to_string();
        t
    }

    fn setup_trade(setup: &str, result: TradeResult, pnl: f64) -> Trade {
        let mut t = trade(date(2025, 4, 1), "09:30", result, pnl);
        t.setup = setup.to_string();
        t
    }

    #[test]
    fn test_best_session_by_win_rate() {
        let trades = vec![
            session_trade("London", TradeResult::Won, 10.0),
            session_trade("London", TradeResult::Lose, -10.0),
            session_trade("London", TradeResult::Lose, -10.0),
            session_trade("NY Open", TradeResult::Won, 10.0),
            session_trade("NY Open", TradeResult::Won, 10.0),
            session_trade("NY Open", TradeResult::Lose, -10.0),
        ];
        let pick = select_best_session(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.session, "NY Open");
        assert_eq!(pick.trade_count, 3);
        assert!((pick.win_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_groups_are_excluded() {
        let trades = vec![
            session_trade("Asia", TradeResult::Won, 10.0),
            session_trade("London", TradeResult::Won, 10.0),
            session_trade("London", TradeResult::Lose, -10.0),
            session_trade("London", TradeResult::Lose, -10.0),
        ];
        let pick = select_best_session(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.session, "London");

        let strict = SelectionPolicy { min_trades: 5 };
        assert!(select_best_session(&trades, &strict).is_none());
    }

    #[test]
    fn test_session_ties_prefer_more_trades_then_label() {
        let mut trades = Vec::new();
        for _ in 0..4 {
            trades.push(session_trade("Power Hour", TradeResult::Won, 5.0));
        }
        for _ in 0..3 {
            trades.push(session_trade("Lunch", TradeResult::Won, 5.0));
            trades.push(session_trade("Close", TradeResult::Won, 5.0));
        }
        let pick = select_best_session(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.session, "Power Hour");

        let trades: Vec<Trade> = trades.into_iter().filter(|t| t.session != "Power Hour").collect();
        let pick = select_best_session(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.session, "Close");
    }

    #[test]
    fn test_best_setup_reports_group_figures() {
        let trades = vec![
            setup_trade("Pullback", TradeResult::Won, 50.0),
            setup_trade("Pullback", TradeResult::Lose, -20.0),
            setup_trade("Pullback", TradeResult::Lose, -20.0),
            setup_trade("Breakout", TradeResult::Won, 200.0),
            setup_trade("Breakout", TradeResult::Won, 100.0),
            setup_trade("Breakout", TradeResult::Lose, -20.0),
        ];
        let pick = select_best_setup(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.setup, "Breakout");
        assert_eq!(pick.pnl_total, 280.0);
        assert_eq!(pick.profit_factor, ProfitFactor::Finite(15.0));
        assert_eq!(pick.trade_count, 3);
    }

    #[test]
    fn test_setup_ties_prefer_more_trades_over_pnl() {
        let mut trades = vec![
            setup_trade("Breakout", TradeResult::Won, 500.0),
            setup_trade("Breakout", TradeResult::Won, 500.0),
            setup_trade("Breakout", TradeResult::Won, 500.0),
        ];
        for _ in 0..4 {
            trades.push(setup_trade("Pullback", TradeResult::Won, 10.0));
        }
        let pick = select_best_setup(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.setup, "Pullback");
        assert_eq!(pick.trade_count, 4);

        // Equal counts fall back to the smaller label, whatever the P&L
        trades.truncate(6);
        let pick = select_best_setup(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.setup, "Breakout");
        trades[0].pnl = 1.0;
        trades[1].pnl = 1.0;
        trades[2].pnl = 1.0;
        let pick = select_best_setup(&trades, &SelectionPolicy::default()).unwrap();
        assert_eq!(pick.setup, "Breakout");
    }

    #[test]
    fn test_blank_labels_never_win() {
        let trades = vec![
            session_trade("", TradeResult::Won, 1.0),
            session_trade("", TradeResult::Won, 1.0),
            session_trade("", TradeResult::Won, 1.0),
        ];
        assert!(select_best_session(&trades, &SelectionPolicy::default()).is_none());
        assert_eq!(summarize_patterns(&[], &SelectionPolicy::default()), PatternSummary::default());
    }
}
