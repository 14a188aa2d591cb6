use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::trades::parse_column;
use super::Database;
use crate::error::Result;
use crate::models::{Settings, UpdateSettingsInput};

impl Database {
    /// Stored settings, or defaults when the user never saved any.
    pub fn get_settings(&self, user_id: &str) -> Result<Settings> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT trading_type, custom_setups FROM user_settings WHERE user_id = ?",
                [user_id],
                |row| Ok((parse_column(row, 0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((trading_type, custom_setups)) => Ok(Settings {
                trading_type,
                custom_setups: serde_json::from_str(&custom_setups)?,
            }),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, user_id: &str, update: &UpdateSettingsInput) -> Result<Settings> {
        let mut settings = self.get_settings(user_id)?;
        if let Some(trading_type) = update.trading_type {
            settings.trading_type = trading_type;
        }
        if let Some(custom_setups) = &update.custom_setups {
            settings.custom_setups = custom_setups
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO user_settings (user_id, trading_type, custom_setups, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                trading_type = excluded.trading_type,
                custom_setups = excluded.custom_setups,
                updated_at = excluded.updated_at",
            params![
                user_id,
                settings.trading_type.as_str(),
                serde_json::to_string(&settings.custom_setups)?,
                Utc::now().timestamp()
            ],
        )?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradingType;

    #[test]
    fn test_settings_default_then_saved() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_settings("user-1").unwrap(), Settings::default());

        let saved = db
            .save_settings(
                "user-1",
                &UpdateSettingsInput {
                    trading_type: Some(TradingType::Forex),
                    custom_setups: Some(vec!["London fade".to_string(), "  ".to_string()]),
                },
            )
            .unwrap();
        assert_eq!(saved.custom_setups, vec!["London fade".to_string()]);

        // Partial update keeps the setups
        db.save_settings(
            "user-1",
            &UpdateSettingsInput {
                trading_type: Some(TradingType::Cfds),
                custom_setups: None,
            },
        )
        .unwrap();
        let settings = db.get_settings("user-1").unwrap();
        assert_eq!(settings.trading_type, TradingType::Cfds);
        assert_eq!(settings.custom_setups, vec!["London fade".to_string()]);
    }
}
