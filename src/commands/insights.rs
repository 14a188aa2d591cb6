use super::context::AppContext;
use crate::error::Result;
use crate::insights::{request_emotional_insight, request_technical_insight, Insight};

/// Technical narrative over every stored trade. Blocked below the
/// configured trade count without calling the backend.
pub async fn analyze_technical(ctx: &AppContext, user_id: &str) -> Result<Insight> {
    let trades = ctx.db.list_trades(user_id)?;
    let insight = request_technical_insight(ctx.narrative.as_ref(), &trades, &ctx.config.analysis).await?;
    Ok(insight.into())
}

pub async fn analyze_emotional(ctx: &AppContext, user_id: &str) -> Result<Insight> {
    let reflections = ctx.db.list_reflections(user_id)?;
    let trades = ctx.db.list_trades(user_id)?;
    let insight =
        request_emotional_insight(ctx.narrative.as_ref(), &reflections, &trades, &ctx.config.analysis).await?;
    Ok(insight.into())
}
