use super::context::AppContext;
use crate::error::Result;
use crate::models::{CreateReflectionInput, Reflection};

pub async fn get_reflections(ctx: &AppContext, user_id: &str) -> Result<Vec<Reflection>> {
    ctx.db.list_reflections(user_id)
}

pub async fn create_reflection(
    ctx: &AppContext,
    user_id: &str,
    reflection: CreateReflectionInput,
) -> Result<Reflection> {
    ctx.db.create_reflection(user_id, &reflection)
}

pub async fn delete_reflection(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.db.delete_reflection(id)
}
