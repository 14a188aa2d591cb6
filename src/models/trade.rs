use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Coarse trade outcome as logged by the trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeResult {
    Won,
    Lose,
    #[serde(rename = "BE")]
    Breakeven,
}

impl TradeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Won => "Won",
            TradeResult::Lose => "Lose",
            TradeResult::Breakeven => "BE",
        }
    }
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Won" | "WIN" | "won" => Ok(TradeResult::Won),
            "Lose" | "LOSS" | "lose" => Ok(TradeResult::Lose),
            "BE" | "be" | "Breakeven" => Ok(TradeResult::Breakeven),
            other => Err(format!("Unknown trade result: {}", other)),
        }
    }
}

/// Trade direction. Older records use "compra"/"venta".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "compra" | "buy" => Ok(Direction::Long),
            "short" | "venta" | "sell" => Ok(Direction::Short),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub entry_time: String,
    pub exit_time: String,

    pub asset: String,
    pub setup: String,
    pub direction: Direction,
    pub trend: String,
    pub timeframe: String,
    pub session: String,

    pub contracts: f64, // contracts (futures) or lots (forex/CFDs)

    pub result: TradeResult,
    pub result_detail: String, // "TP1", "SL", ...
    pub pnl: f64,
    pub points: f64,

    pub comment: String,
    pub image_url: Option<String>,

    pub created_at: i64,
}

impl Trade {
    /// Chronological ordering key: date, entry time, then exit time.
    pub fn chronological_cmp(&self, other: &Trade) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| parse_wall_clock(&self.entry_time).cmp(&parse_wall_clock(&other.entry_time)))
            .then_with(|| parse_wall_clock(&self.exit_time).cmp(&parse_wall_clock(&other.exit_time)))
    }

    pub fn is_win(&self) -> bool {
        self.result == TradeResult::Won
    }

    pub fn is_loss(&self) -> bool {
        self.result == TradeResult::Lose
    }
}

/// Parse "HH:MM" or "HH:MM:SS". Missing or malformed times count as midnight.
pub fn parse_wall_clock(raw: &str) -> NaiveTime {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub entry_time: String,
    #[serde(default)]
    pub exit_time: String,

    pub asset: String,
    pub setup: String,
    pub direction: Direction,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub timeframe: String,
    pub session: String,

    pub contracts: f64,

    pub result: TradeResult,
    #[serde(default)]
    pub result_detail: String,
    pub pnl: f64,
    #[serde(default)]
    pub points: f64,

    #[serde(default)]
    pub comment: String,
    pub image_url: Option<String>,
}

impl CreateTradeInput {
    /// Form-level checks. P&L sign is not checked against the result.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.contracts.is_finite() && self.contracts > 0.0) {
            return Err(format!("Contract count must be positive, got {}", self.contracts));
        }
        if !self.pnl.is_finite() {
            return Err("P&L must be a finite number".to_string());
        }
        if self.asset.trim().is_empty() {
            return Err("Asset is required".to_string());
        }
        Ok(())
    }
}

/// Partial update. Only the provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeUpdate {
    pub date: Option<NaiveDate>,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub asset: Option<String>,
    pub setup: Option<String>,
    pub direction: Option<Direction>,
    pub trend: Option<String>,
    pub timeframe: Option<String>,
    pub session: Option<String>,
    pub contracts: Option<f64>,
    pub result: Option<TradeResult>,
    pub result_detail: Option<String>,
    pub pnl: Option<f64>,
    pub points: Option<f64>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
}

impl TradeUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.entry_time.is_none()
            && self.exit_time.is_none()
            && self.asset.is_none()
            && self.setup.is_none()
            && self.direction.is_none()
            && self.trend.is_none()
            && self.timeframe.is_none()
            && self.session.is_none()
            && self.contracts.is_none()
            && self.result.is_none()
            && self.result_detail.is_none()
            && self.pnl.is_none()
            && self.points.is_none()
            && self.comment.is_none()
            && self.image_url.is_none()
    }
}
