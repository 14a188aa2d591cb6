use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::badges::{award_badge, Badge, BadgeStats};
use super::levels::{level_for, LevelInfo};
use super::streak::update_streak;
use crate::models::{TradeResult, UserProfile};

pub mod xp {
    pub const TRADE_SAVED: u64 = 10;
    pub const WINNING_TRADE: u64 = 5;
    pub const REFLECTION_SAVED: u64 = 15;
    /// Paid each time the streak lands on a multiple of `STREAK_BONUS_EVERY`
    pub const STREAK_BONUS: u64 = 50;
    pub const STREAK_BONUS_EVERY: u32 = 3;
    pub const TRADING_PLAN_COMPLETED: u64 = 75;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAward {
    pub new_xp: u64,
    pub level_up: bool,
    pub new_level: Option<LevelInfo>,
}

/// Add XP and refresh the cached level. XP never decreases.
pub fn award_xp(profile: &mut UserProfile, amount: u64) -> XpAward {
    let old_level = level_for(profile.xp);
    let new_xp = profile.xp.saturating_add(amount);
    let new_level = level_for(new_xp);
    let level_up = new_level.level > old_level.level;

    profile.xp = new_xp;
    profile.level = new_level.level;

    XpAward {
        new_xp,
        level_up,
        new_level: level_up.then_some(new_level),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    TradeSaved { date: NaiveDate, result: TradeResult },
    ReflectionSaved,
    TradingPlanCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerOutcome {
    pub profile: UserProfile,
    pub xp_gained: u64,
    pub award: XpAward,
    pub streak: u32,
    pub new_badges: Vec<Badge>,
}

/// Fold one event into a copy of the profile.
///
/// `snapshot` describes the records after the event was stored; its streak is
/// replaced by the streak this event produces.
pub fn apply_event(profile: &UserProfile, event: &LedgerEvent, snapshot: &BadgeStats) -> LedgerOutcome {
    let mut next = profile.clone();

    let xp_gained = match event {
        LedgerEvent::TradeSaved { date, result } => {
            let before = (next.streak, next.last_trade_date);
            let update = update_streak(next.streak, next.last_trade_date, *date);
            next.streak = update.streak;
            next.last_trade_date = update.last_trade_date;

            let mut gained = xp::TRADE_SAVED;
            if *result == TradeResult::Won {
                gained += xp::WINNING_TRADE;
            }
            let streak_moved = before != (next.streak, next.last_trade_date);
            if streak_moved && next.streak > 1 && next.streak % xp::STREAK_BONUS_EVERY == 0 {
                gained += xp::STREAK_BONUS;
            }
            gained
        }
        LedgerEvent::ReflectionSaved => xp::REFLECTION_SAVED,
        LedgerEvent::TradingPlanCompleted => xp::TRADING_PLAN_COMPLETED,
    };

    let award = award_xp(&mut next, xp_gained);
    if award.level_up {
        if let Some(level) = &award.new_level {
            log::info!("User {} reached level {} ({})", next.uid, level.level, level.name);
        }
    }

    let stats = BadgeStats {
        streak: next.streak,
        ..snapshot.clone()
    };
    let mut new_badges = Vec::new();
    for badge in Badge::ALL {
        if badge.is_earned(&stats) && award_badge(&mut next, badge) {
            log::info!("User {} earned badge {}", next.uid, badge);
            new_badges.push(badge);
        }
    }

    LedgerOutcome {
        streak: next.streak,
        profile: next,
        xp_gained,
        award,
        new_badges,
    }
}
