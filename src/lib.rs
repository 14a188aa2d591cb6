//! Trading journal core: performance statistics, best-session and
//! best-setup selection, AI narrative analysis and gamification.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod gamification;
pub mod insights;
pub mod models;
pub mod stats;

use std::path::Path;
use std::sync::Arc;

pub use commands::AppContext;
pub use config::{ConfigError, JournalConfig};
pub use db::{Database, ProfileRepository};
pub use error::JournalError;
pub use gamification::{
    apply_event, award_badge, award_xp, level_for, update_streak, xp_to_next_level, Badge, BadgeStats,
    LedgerEvent,
};
pub use insights::{
    request_emotional_insight, request_technical_insight, EmotionalInsight, Insight, InsightError,
    NarrativeService, TechnicalInsight,
};
pub use stats::{
    compute_equity_curve, compute_stats, group_by, select_best_session, select_best_setup, DerivedStats,
    Dimension, ProfitFactor,
};

pub const DATABASE_FILE: &str = "trading_journal.db";

/// Open (and migrate) the journal database under `data_dir` and wire the
/// Anthropic narrative backend. Without `ANTHROPIC_API_KEY` the journal still
/// opens and only the analyses fail.
pub fn open(data_dir: &Path, config: JournalConfig) -> Result<AppContext, JournalError> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| JournalError::Database(format!("Failed to create data directory: {}", e)))?;

    let db_path = data_dir.join(DATABASE_FILE);
    log::info!("Database path: {}", db_path.display());

    let db_path = db_path
        .to_str()
        .ok_or_else(|| JournalError::Database(format!("Non UTF-8 database path: {}", db_path.display())))?;

    let database = Database::new(db_path).map_err(|e| {
        log::error!("Database initialization failed: {}", e);
        log::error!("Backups are kept in {}", data_dir.join("backups").display());
        JournalError::from(e)
    })?;

    Ok(AppContext::from_config(Arc::new(database), config))
}
