use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Daily reflection written after a trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,

    pub went_well: String,
    pub to_improve: String,
    pub plan_adherence: String,
    pub discipline: String,
    pub success_attribution: String,

    pub hit_take_profit: bool,
    pub no_setup_no_trade: bool,
    pub controlled_losses: bool,
    pub moved_to_breakeven: bool,
    pub broke_plan: bool,

    pub created_at: i64,
}

impl Reflection {
    /// Newest first: later date wins, then later creation time.
    pub fn recency_cmp(&self, other: &Reflection) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| other.created_at.cmp(&self.created_at))
    }
}

/// The `n` most recent reflections, newest first.
pub fn most_recent(reflections: &[Reflection], n: usize) -> Vec<&Reflection> {
    let mut sorted: Vec<&Reflection> = reflections.iter().collect();
    sorted.sort_by(|a, b| a.recency_cmp(b));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReflectionInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub went_well: String,
    #[serde(default)]
    pub to_improve: String,
    #[serde(default)]
    pub plan_adherence: String,
    #[serde(default)]
    pub discipline: String,
    #[serde(default)]
    pub success_attribution: String,
    #[serde(default)]
    pub hit_take_profit: bool,
    #[serde(default)]
    pub no_setup_no_trade: bool,
    #[serde(default)]
    pub controlled_losses: bool,
    #[serde(default)]
    pub moved_to_breakeven: bool,
    #[serde(default)]
    pub broke_plan: bool,
}
