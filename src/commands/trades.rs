use super::context::AppContext;
use crate::error::Result;
use crate::models::{CreateTradeInput, Trade, TradeUpdate};

pub async fn get_trades(ctx: &AppContext, user_id: &str) -> Result<Vec<Trade>> {
    ctx.db.list_trades(user_id)
}

pub async fn get_trade(ctx: &AppContext, id: &str) -> Result<Trade> {
    ctx.db.get_trade(id)
}

/// Store a trade without touching the ledger. `profile::record_trade` also
/// awards XP.
pub async fn create_trade(ctx: &AppContext, user_id: &str, trade: CreateTradeInput) -> Result<Trade> {
    let created = ctx.db.create_trade(user_id, &trade)?;
    log::info!("Created trade {}", created.id);
    Ok(created)
}

pub async fn update_trade(ctx: &AppContext, id: &str, update: TradeUpdate) -> Result<Trade> {
    if update.is_empty() {
        return ctx.db.get_trade(id);
    }
    ctx.db.update_trade(id, &update)
}

pub async fn delete_trade(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.db.delete_trade(id)?;
    log::info!("Deleted trade {}", id);
    Ok(())
}
