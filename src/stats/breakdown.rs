use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::aggregate::{mean, percent, ProfitFactor};
use crate::models::{Trade, TradeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Day,
    Month,
    Contracts,
    Asset,
    Setup,
    Session,
}

/// Calendar month, displayed and serialized as "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month key: {}", s))?;
        let year = year.parse::<i32>().map_err(|e| format!("Invalid year in {}: {}", s, e))?;
        let month = month.parse::<u32>().map_err(|e| format!("Invalid month in {}: {}", s, e))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month out of range: {}", s));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Contract or lot count used as a bucket key. Ordered numerically.
#[derive(Debug, Clone, Copy)]
pub struct ContractSize(pub f64);

impl PartialEq for ContractSize {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ContractSize {}

impl PartialOrd for ContractSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContractSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for ContractSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketKey {
    Day(NaiveDate),
    Month(MonthKey),
    Contracts(ContractSize),
    Label(String),
}

impl BucketKey {
    pub fn for_trade(trade: &Trade, dimension: Dimension) -> Self {
        match dimension {
            Dimension::Day => BucketKey::Day(trade.date),
            Dimension::Month => BucketKey::Month(MonthKey::of(trade.date)),
            Dimension::Contracts => BucketKey::Contracts(ContractSize(trade.contracts)),
            Dimension::Asset => BucketKey::Label(trade.asset.clone()),
            Dimension::Setup => BucketKey::Label(trade.setup.clone()),
            Dimension::Session => BucketKey::Label(trade.session.clone()),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{}", date.format("%d-%m-%y")),
            BucketKey::Month(month) => month.fmt(f),
            BucketKey::Contracts(size) => size.fmt(f),
            BucketKey::Label(label) => f.write_str(label),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accumulated totals for one group of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bucket {
    pub trade_count: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub pnl: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    /// Filled for the contracts dimension only.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub monthly_pnl: BTreeMap<MonthKey, f64>,
}

impl Bucket {
    fn record(&mut self, trade: &Trade, track_months: bool) {
        self.trade_count += 1;
        self.pnl += trade.pnl;
        match trade.result {
            TradeResult::Won => {
                self.wins += 1;
                self.gross_profit += trade.pnl.abs();
            }
            TradeResult::Lose => {
                self.losses += 1;
                self.gross_loss += trade.pnl.abs();
            }
            TradeResult::Breakeven => self.breakevens += 1,
        }
        if track_months {
            *self.monthly_pnl.entry(MonthKey::of(trade.date)).or_insert(0.0) += trade.pnl;
        }
    }

    /// Wins over Won+Lose, in percent.
    pub fn win_rate(&self) -> f64 {
        percent(self.wins, self.wins + self.losses)
    }

    /// Wins over every trade in the bucket, in percent.
    pub fn win_rate_over_total(&self) -> f64 {
        percent(self.wins, self.trade_count)
    }

    pub fn avg_pnl_per_trade(&self) -> f64 {
        mean(self.pnl, self.trade_count)
    }

    pub fn avg_win(&self) -> f64 {
        mean(self.gross_profit, self.wins)
    }

    pub fn avg_loss(&self) -> f64 {
        mean(self.gross_loss, self.losses)
    }

    pub fn profit_factor(&self) -> ProfitFactor {
        ProfitFactor::from_gross(self.gross_profit, self.gross_loss)
    }

    pub fn avg_month_pnl(&self) -> Option<f64> {
        if self.monthly_pnl.is_empty() {
            return None;
        }
        Some(self.monthly_pnl.values().sum::<f64>() / self.monthly_pnl.len() as f64)
    }

    pub fn best_month_pnl(&self) -> Option<f64> {
        self.monthly_pnl.values().copied().reduce(f64::max)
    }

    pub fn worst_month_pnl(&self) -> Option<f64> {
        self.monthly_pnl.values().copied().reduce(f64::min)
    }
}

/// Sparse mapping from bucket key to totals. Empty buckets never appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBreakdown {
    pub dimension: Dimension,
    pub buckets: BTreeMap<BucketKey, Bucket>,
}

impl GroupedBreakdown {
    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_pnl(&self) -> f64 {
        self.buckets.values().map(|bucket| bucket.pnl).sum()
    }
}

pub fn group_by(trades: &[Trade], dimension: Dimension) -> GroupedBreakdown {
    let track_months = dimension == Dimension::Contracts;
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();

    for trade in trades {
        buckets
            .entry(BucketKey::for_trade(trade, dimension))
            .or_default()
            .record(trade, track_months);
    }

    GroupedBreakdown { dimension, buckets }
}
