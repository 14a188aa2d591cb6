use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeSet;

use super::trades::parse_column;
use super::Database;
use crate::error::{JournalError, Result};
use crate::models::UserProfile;

/// Load/save seam for the gamification ledger.
///
/// Callers load, apply a pure ledger step and save. There is no version
/// check, so two writers racing on the same profile can lose an award.
pub trait ProfileRepository: Send + Sync {
    fn load_profile(&self, uid: &str) -> Result<Option<UserProfile>>;
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;
}

fn map_row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<(UserProfile, String)> {
    let profile = UserProfile {
        uid: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        plan: parse_column(row, 3)?,
        role: parse_column(row, 4)?,
        xp: row.get::<_, i64>(5)?.max(0) as u64,
        level: row.get(6)?,
        badges: BTreeSet::new(),
        streak: row.get(8)?,
        last_trade_date: row.get(9)?,
        created_at: row.get(10)?,
    };
    let badges: String = row.get(7)?;
    Ok((profile, badges))
}

impl ProfileRepository for Database {
    fn load_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT uid, email, display_name, plan, role, xp, level, badges, streak,
                        last_trade_date, created_at
                 FROM user_profiles WHERE uid = ?",
                [uid],
                map_row_to_profile,
            )
            .optional()?;

        match row {
            Some((mut profile, badges)) => {
                profile.badges = serde_json::from_str(&badges)?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let badges = serde_json::to_string(&profile.badges)?;
        let xp = i64::try_from(profile.xp)
            .map_err(|_| JournalError::Validation(format!("XP out of range: {}", profile.xp)))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO user_profiles (
                uid, email, display_name, plan, role, xp, level, badges, streak,
                last_trade_date, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(uid) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name,
                plan = excluded.plan,
                role = excluded.role,
                xp = excluded.xp,
                level = excluded.level,
                badges = excluded.badges,
                streak = excluded.streak,
                last_trade_date = excluded.last_trade_date,
                updated_at = excluded.updated_at",
            params![
                profile.uid,
                profile.email,
                profile.display_name,
                profile.plan.as_str(),
                profile.role.as_str(),
                xp,
                profile.level,
                badges,
                profile.streak,
                profile.last_trade_date,
                profile.created_at,
                Utc::now().timestamp()
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanTier;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_profile_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_profile("nobody").unwrap().is_none());
    }

    #[test]
    fn test_profile_round_trip_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = UserProfile::new("user-1", "trader@example.com", 1_700_000_000);
        profile.xp = 130;
        profile.level = 2;
        profile.streak = 3;
        profile.plan = PlanTier::Pro;
        profile.last_trade_date = NaiveDate::from_ymd_opt(2025, 9, 3);
        profile.badges.insert("first_win".to_string());
        db.save_profile(&profile).unwrap();

        assert_eq!(db.load_profile("user-1").unwrap(), Some(profile.clone()));

        profile.xp = 150;
        profile.badges.insert("fire_streak".to_string());
        db.save_profile(&profile).unwrap();

        let loaded = db.load_profile("user-1").unwrap().unwrap();
        assert_eq!(loaded.xp, 150);
        assert_eq!(loaded.badges.len(), 2);
    }
}
