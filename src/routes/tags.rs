use axum::{
    Json,
    extract::{Path, State},
};
use cookshelf_recipe::Tag;

use super::AppState;
use crate::error::{AppError, Result};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    Ok(Json(state.query.tags().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tag>> {
    state
        .query
        .find_tag(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("tag not found".to_owned()))
}
