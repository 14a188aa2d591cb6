use super::context::AppContext;
use crate::error::Result;
use crate::models::{Settings, UpdateSettingsInput};

pub async fn get_settings(ctx: &AppContext, user_id: &str) -> Result<Settings> {
    ctx.db.get_settings(user_id)
}

pub async fn update_settings(ctx: &AppContext, user_id: &str, settings: UpdateSettingsInput) -> Result<Settings> {
    ctx.db.save_settings(user_id, &settings)
}
