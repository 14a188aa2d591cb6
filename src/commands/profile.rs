use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::context::AppContext;
use crate::db::ProfileRepository;
use crate::error::Result;
use crate::gamification::{
    apply_event, level_for, xp_to_next_level, Badge, BadgeStats, LedgerEvent, LedgerOutcome, LevelInfo,
    NextLevelProgress,
};
use crate::models::{CreateReflectionInput, CreateTradeInput, Reflection, Trade, UserProfile};

#[derive(Debug, Clone, Serialize)]
pub struct Recorded<T> {
    pub record: T,
    pub ledger: LedgerOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeView {
    pub id: &'static str,
    pub name: &'static str,
    pub requirement: &'static str,
    pub earned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub xp: u64,
    pub level: LevelInfo,
    pub next_level: NextLevelProgress,
    pub streak: u32,
    pub badges: Vec<BadgeView>,
}

fn load_or_new(repo: &dyn ProfileRepository, user_id: &str) -> Result<UserProfile> {
    match repo.load_profile(user_id)? {
        Some(profile) => Ok(profile),
        None => Ok(UserProfile::new(user_id, "", Utc::now().timestamp())),
    }
}

/// Load, fold one event, save. Not atomic across devices.
fn run_ledger(ctx: &AppContext, user_id: &str, event: LedgerEvent, today: NaiveDate) -> Result<LedgerOutcome> {
    let profile = load_or_new(&*ctx.db, user_id)?;
    let trades = ctx.db.list_trades(user_id)?;
    let reflections = ctx.db.list_reflections(user_id)?;
    let snapshot = BadgeStats::collect(&trades, &reflections, profile.streak, today);

    let outcome = apply_event(&profile, &event, &snapshot);
    ctx.db.save_profile(&outcome.profile)?;
    Ok(outcome)
}

/// Store a trade and credit it to the ledger.
pub async fn record_trade(
    ctx: &AppContext,
    user_id: &str,
    trade: CreateTradeInput,
    today: NaiveDate,
) -> Result<Recorded<Trade>> {
    let record = ctx.db.create_trade(user_id, &trade)?;
    let event = LedgerEvent::TradeSaved {
        date: record.date,
        result: record.result,
    };
    let ledger = run_ledger(ctx, user_id, event, today)?;
    Ok(Recorded { record, ledger })
}

pub async fn record_reflection(
    ctx: &AppContext,
    user_id: &str,
    reflection: CreateReflectionInput,
    today: NaiveDate,
) -> Result<Recorded<Reflection>> {
    let record = ctx.db.create_reflection(user_id, &reflection)?;
    let ledger = run_ledger(ctx, user_id, LedgerEvent::ReflectionSaved, today)?;
    Ok(Recorded { record, ledger })
}

pub async fn record_trading_plan(ctx: &AppContext, user_id: &str, today: NaiveDate) -> Result<LedgerOutcome> {
    run_ledger(ctx, user_id, LedgerEvent::TradingPlanCompleted, today)
}

pub async fn get_progress(ctx: &AppContext, user_id: &str) -> Result<Progress> {
    let profile = load_or_new(&*ctx.db, user_id)?;
    let badges = Badge::ALL
        .into_iter()
        .map(|badge| BadgeView {
            id: badge.id(),
            name: badge.name(),
            requirement: badge.requirement(),
            earned: profile.badges.contains(badge.id()),
        })
        .collect();

    Ok(Progress {
        xp: profile.xp,
        level: level_for(profile.xp),
        next_level: xp_to_next_level(profile.xp),
        streak: profile.streak,
        badges,
    })
}
