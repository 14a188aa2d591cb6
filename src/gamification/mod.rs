//! XP levels, badges and trading-day streaks.
//!
//! Every function here is pure. Loading and saving the profile is the
//! caller's job (see `commands::profile`).

pub mod badges;
pub mod ledger;
pub mod levels;
pub mod streak;

pub use badges::{award_badge, earned_badges, Badge, BadgeStats};
pub use ledger::{apply_event, award_xp, xp, LedgerEvent, LedgerOutcome, XpAward};
pub use levels::{level_for, xp_to_next_level, LevelBand, LevelInfo, NextLevelProgress, LEVELS};
pub use streak::{update_streak, StreakUpdate};
