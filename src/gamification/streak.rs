use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_trade_date: Option<NaiveDate>,
}

/// Consecutive-day counter over naive calendar dates.
///
/// A date earlier than the last recorded one is a backfill and leaves the
/// streak alone.
pub fn update_streak(streak: u32, last_trade_date: Option<NaiveDate>, today: NaiveDate) -> StreakUpdate {
    let Some(last) = last_trade_date else {
        return StreakUpdate {
            streak: 1,
            last_trade_date: Some(today),
        };
    };

    let streak = match (today - last).num_days() {
        0 => streak,
        1 => streak.saturating_add(1),
        gap if gap < 0 => {
            return StreakUpdate {
                streak,
                last_trade_date: Some(last),
            };
        }
        _ => 1,
    };

    StreakUpdate {
        streak,
        last_trade_date: Some(today),
    }
}
