use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{Reflection, Trade, UserProfile};
use crate::stats::{result_distribution, trades_in_last_n_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstWin,
    FireStreak,
    Disciplined,
    Sniper,
    KintsugiMaster,
    Speedster,
    ZenTrader,
    Centurion,
}

impl Badge {
    pub const ALL: [Badge; 8] = [
        Badge::FirstWin,
        Badge::FireStreak,
        Badge::Disciplined,
        Badge::Sniper,
        Badge::KintsugiMaster,
        Badge::Speedster,
        Badge::ZenTrader,
        Badge::Centurion,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Badge::FirstWin => "first_win",
            Badge::FireStreak => "fire_streak",
            Badge::Disciplined => "disciplined",
            Badge::Sniper => "sniper",
            Badge::KintsugiMaster => "kintsugi_master",
            Badge::Speedster => "speedster",
            Badge::ZenTrader => "zen_trader",
            Badge::Centurion => "centurion",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstWin => "First Win",
            Badge::FireStreak => "Fire Streak",
            Badge::Disciplined => "Disciplined",
            Badge::Sniper => "Sniper",
            Badge::KintsugiMaster => "Kintsugi Master",
            Badge::Speedster => "Speedster",
            Badge::ZenTrader => "Zen Trader",
            Badge::Centurion => "Centurion",
        }
    }

    pub fn requirement(&self) -> &'static str {
        match self {
            Badge::FirstWin => "1 winning trade",
            Badge::FireStreak => "5 consecutive trading days",
            Badge::Disciplined => "30 reflections",
            Badge::Sniper => "Win rate above 70% with 50 trades",
            Badge::KintsugiMaster => "10 losing trades with a reflection",
            Badge::Speedster => "30 trades in 30 days",
            Badge::ZenTrader => "15 reflections in a row without breaking the plan",
            Badge::Centurion => "100 trades",
        }
    }

    /// Pure predicate over the snapshot.
    pub fn is_earned(&self, stats: &BadgeStats) -> bool {
        match self {
            Badge::FirstWin => stats.winning_trades >= 1,
            Badge::FireStreak => stats.streak >= 5,
            Badge::Disciplined => stats.reflections >= 30,
            Badge::Sniper => stats.total_trades >= 50 && stats.win_rate > 70.0,
            Badge::KintsugiMaster => stats.losses_with_reflection >= 10,
            Badge::Speedster => stats.trades_last_30_days >= 30,
            Badge::ZenTrader => stats.plan_kept_streak >= 15,
            Badge::Centurion => stats.total_trades >= 100,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Badge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Badge::ALL
            .into_iter()
            .find(|badge| badge.id() == s)
            .ok_or_else(|| format!("Unknown badge: {}", s))
    }
}

/// Counts the badge predicates read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub reflections: usize,
    /// Strict win rate, 0-100
    pub win_rate: f64,
    pub streak: u32,
    pub trades_last_30_days: usize,
    pub losses_with_reflection: usize,
    /// Most recent reflections in a row without the broke-plan marker
    pub plan_kept_streak: usize,
}

impl BadgeStats {
    pub fn collect(trades: &[Trade], reflections: &[Reflection], streak: u32, today: NaiveDate) -> Self {
        let distribution = result_distribution(trades);
        let reflected_days: BTreeSet<NaiveDate> = reflections.iter().map(|r| r.date).collect();

        let mut ordered: Vec<&Reflection> = reflections.iter().collect();
        ordered.sort_by(|a, b| a.recency_cmp(b));

        Self {
            total_trades: trades.len(),
            winning_trades: distribution.wins,
            reflections: reflections.len(),
            win_rate: distribution.win_rate(),
            streak,
            trades_last_30_days: trades_in_last_n_days(trades, 30, today),
            losses_with_reflection: trades
                .iter()
                .filter(|t| t.is_loss() && reflected_days.contains(&t.date))
                .count(),
            plan_kept_streak: ordered.iter().take_while(|r| !r.broke_plan).count(),
        }
    }
}

pub fn earned_badges(stats: &BadgeStats) -> Vec<Badge> {
    Badge::ALL.into_iter().filter(|badge| badge.is_earned(stats)).collect()
}

/// Add the badge to the profile. Returns false if it was already there.
pub fn award_badge(profile: &mut UserProfile, badge: Badge) -> bool {
    profile.badges.insert(badge.id().to_string())
}
