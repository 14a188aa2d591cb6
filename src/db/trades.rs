use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::str::FromStr;

use super::Database;
use crate::error::{JournalError, Result};
use crate::models::{CreateTradeInput, Trade, TradeUpdate};

const TRADE_COLUMNS: &str = "id, user_id, date, entry_time, exit_time, asset, setup, direction, trend, \
     timeframe, session, contracts, result, result_detail, pnl, points, comment, image_url, created_at";

/// Read a TEXT column through `FromStr`.
pub(crate) fn parse_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<Trade> {
    Ok(Trade {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        entry_time: row.get(3)?,
        exit_time: row.get(4)?,
        asset: row.get(5)?,
        setup: row.get(6)?,
        direction: parse_column(row, 7)?,
        trend: row.get(8)?,
        timeframe: row.get(9)?,
        session: row.get(10)?,
        contracts: row.get(11)?,
        result: parse_column(row, 12)?,
        result_detail: row.get(13)?,
        pnl: row.get(14)?,
        points: row.get(15)?,
        comment: row.get(16)?,
        image_url: row.get(17)?,
        created_at: row.get(18)?,
    })
}

impl Database {
    /// All trades of a user, oldest first.
    pub fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM trades WHERE user_id = ? ORDER BY date ASC, entry_time ASC, created_at ASC",
            TRADE_COLUMNS
        ))?;
        let trades = stmt
            .query_map([user_id], map_row_to_trade)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(trades)
    }

    pub fn get_trade(&self, id: &str) -> Result<Trade> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {} FROM trades WHERE id = ?", TRADE_COLUMNS),
            [id],
            map_row_to_trade,
        )
        .optional()?
        .ok_or_else(|| JournalError::not_found("Trade", id))
    }

    pub fn create_trade(&self, user_id: &str, trade: &CreateTradeInput) -> Result<Trade> {
        trade.validate().map_err(JournalError::Validation)?;

        let id = format!("TRADE-{}-{}", Utc::now().timestamp_millis(), uuid::Uuid::new_v4());
        {
            let conn = self.lock()?;
            let now = Utc::now().timestamp();
            conn.execute(
                "INSERT INTO trades (
                    id, user_id, date, entry_time, exit_time, asset, setup, direction, trend,
                    timeframe, session, contracts, result, result_detail, pnl, points, comment,
                    image_url, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    user_id,
                    trade.date,
                    trade.entry_time,
                    trade.exit_time,
                    trade.asset.trim(),
                    trade.setup.trim(),
                    trade.direction.as_str(),
                    trade.trend,
                    trade.timeframe,
                    trade.session.trim(),
                    trade.contracts,
                    trade.result.as_str(),
                    trade.result_detail,
                    trade.pnl,
                    trade.points,
                    trade.comment,
                    trade.image_url,
                    now,
                    now
                ],
            )?;
        }

        self.get_trade(&id)
    }

    /// Partial update. Fields left `None` keep their stored value.
    pub fn update_trade(&self, id: &str, update: &TradeUpdate) -> Result<Trade> {
        if let Some(contracts) = update.contracts {
            if !(contracts.is_finite() && contracts > 0.0) {
                return Err(JournalError::Validation(format!(
                    "Contract count must be positive, got {}",
                    contracts
                )));
            }
        }
        if update.pnl.is_some_and(|pnl| !pnl.is_finite()) {
            return Err(JournalError::Validation("P&L must be a finite number".to_string()));
        }

        {
            let conn = self.lock()?;

            let mut updates = vec!["updated_at = ?"];
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(Utc::now().timestamp())];

            macro_rules! set {
                ($column:literal, $value:expr) => {
                    if let Some(value) = $value {
                        updates.push(concat!($column, " = ?"));
                        values.push(Box::new(value));
                    }
                };
            }

            set!("date", update.date);
            set!("entry_time", update.entry_time.clone());
            set!("exit_time", update.exit_time.clone());
            set!("asset", update.asset.as_ref().map(|s| s.trim().to_string()));
            set!("setup", update.setup.as_ref().map(|s| s.trim().to_string()));
            set!("direction", update.direction.map(|d| d.as_str()));
            set!("trend", update.trend.clone());
            set!("timeframe", update.timeframe.clone());
            set!("session", update.session.as_ref().map(|s| s.trim().to_string()));
            set!("contracts", update.contracts);
            set!("result", update.result.map(|r| r.as_str()));
            set!("result_detail", update.result_detail.clone());
            set!("pnl", update.pnl);
            set!("points", update.points);
            set!("comment", update.comment.clone());
            set!("image_url", update.image_url.clone());

            values.push(Box::new(id.to_string()));
            let query = format!("UPDATE trades SET {} WHERE id = ?", updates.join(", "));
            let param_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|p| p.as_ref()).collect();

            let changed = conn.execute(&query, param_refs.as_slice())?;
            if changed == 0 {
                return Err(JournalError::not_found("Trade", id));
            }
        }

        self.get_trade(id)
    }

    pub fn delete_trade(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM trades WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(JournalError::not_found("Trade", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, TradeResult};
    use chrono::NaiveDate;

    fn input(date: NaiveDate, result: TradeResult, pnl: f64) -> CreateTradeInput {
        CreateTradeInput {
            date,
            entry_time: "09:35".to_string(),
            exit_time: "10:05".to_string(),
            asset: "NQ".to_string(),
            setup: "Breakout".to_string(),
            direction: Direction::Long,
            trend: "Up".to_string(),
            timeframe: "5m".to_string(),
            session: "NY Open".to_string(),
            contracts: 2.0,
            result,
            result_detail: "TP1".to_string(),
            pnl,
            points: 12.5,
            comment: String::new(),
            image_url: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_trade("user-1", &input(day(1), TradeResult::Won, 250.0)).unwrap();

        assert!(created.id.starts_with("TRADE-"));
        assert_eq!(created.user_id, "user-1");
        assert_eq!(created.result, TradeResult::Won);
        assert_eq!(created.direction, Direction::Long);
        assert_eq!(created.date, day(1));

        let fetched = db.get_trade(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_list_is_scoped_and_chronological() {
        let db = Database::open_in_memory().unwrap();
        db.create_trade("user-1", &input(day(3), TradeResult::Lose, -100.0)).unwrap();
        db.create_trade("user-1", &input(day(1), TradeResult::Won, 50.0)).unwrap();
        db.create_trade("user-2", &input(day(2), TradeResult::Won, 75.0)).unwrap();

        let trades = db.list_trades("user-1").unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].date, day(1));
        assert_eq!(trades[1].date, day(3));
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut bad = input(day(1), TradeResult::Won, 10.0);
        bad.contracts = 0.0;
        assert!(matches!(db.create_trade("user-1", &bad), Err(JournalError::Validation(_))));
    }

    #[test]
    fn test_partial_update() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_trade("user-1", &input(day(1), TradeResult::Won, 250.0)).unwrap();

        let updated = db
            .update_trade(
                &created.id,
                &TradeUpdate {
                    result: Some(TradeResult::Breakeven),
                    pnl: Some(0.0),
                    ..TradeUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.result, TradeResult::Breakeven);
        assert_eq!(updated.pnl, 0.0);
        assert_eq!(updated.asset, "NQ");
        assert_eq!(updated.points, 12.5);
    }

    #[test]
    fn test_missing_trade_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_trade("TRADE-0"), Err(JournalError::NotFound { .. })));
        assert!(matches!(db.delete_trade("TRADE-0"), Err(JournalError::NotFound { .. })));
        assert!(matches!(
            db.update_trade("TRADE-0", &TradeUpdate { pnl: Some(1.0), ..TradeUpdate::default() }),
            Err(JournalError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_trade("user-1", &input(day(1), TradeResult::Won, 250.0)).unwrap();
        db.delete_trade(&created.id).unwrap();
        assert!(db.list_trades("user-1").unwrap().is_empty());
    }
}
