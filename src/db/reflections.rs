use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{JournalError, Result};
use crate::models::{CreateReflectionInput, Reflection};

const REFLECTION_COLUMNS: &str = "id, user_id, date, went_well, to_improve, plan_adherence, discipline, \
     success_attribution, hit_take_profit, no_setup_no_trade, controlled_losses, moved_to_breakeven, \
     broke_plan, created_at";

fn map_row_to_reflection(row: &rusqlite::Row) -> rusqlite::Result<Reflection> {
    Ok(Reflection {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        went_well: row.get(3)?,
        to_improve: row.get(4)?,
        plan_adherence: row.get(5)?,
        discipline: row.get(6)?,
        success_attribution: row.get(7)?,
        hit_take_profit: row.get(8)?,
        no_setup_no_trade: row.get(9)?,
        controlled_losses: row.get(10)?,
        moved_to_breakeven: row.get(11)?,
        broke_plan: row.get(12)?,
        created_at: row.get(13)?,
    })
}

impl Database {
    /// Reflections of a user, newest first.
    pub fn list_reflections(&self, user_id: &str) -> Result<Vec<Reflection>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reflections WHERE user_id = ? ORDER BY date DESC, created_at DESC",
            REFLECTION_COLUMNS
        ))?;
        let reflections = stmt
            .query_map([user_id], map_row_to_reflection)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reflections)
    }

    pub fn get_reflection(&self, id: &str) -> Result<Reflection> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {} FROM reflections WHERE id = ?", REFLECTION_COLUMNS),
            [id],
            map_row_to_reflection,
        )
        .optional()?
        .ok_or_else(|| JournalError::not_found("Reflection", id))
    }

    pub fn create_reflection(&self, user_id: &str, input: &CreateReflectionInput) -> Result<Reflection> {
        let id = format!("REFLECTION-{}-{}", Utc::now().timestamp_millis(), uuid::Uuid::new_v4());
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO reflections (
                    id, user_id, date, went_well, to_improve, plan_adherence, discipline,
                    success_attribution, hit_take_profit, no_setup_no_trade, controlled_losses,
                    moved_to_breakeven, broke_plan, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    user_id,
                    input.date,
                    input.went_well,
                    input.to_improve,
                    input.plan_adherence,
                    input.discipline,
                    input.success_attribution,
                    input.hit_take_profit,
                    input.no_setup_no_trade,
                    input.controlled_losses,
                    input.moved_to_breakeven,
                    input.broke_plan,
                    Utc::now().timestamp()
                ],
            )?;
        }

        self.get_reflection(&id)
    }

    pub fn delete_reflection(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM reflections WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(JournalError::not_found("Reflection", id));
        }
        Ok(())
    }
}
