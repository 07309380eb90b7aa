use axum::{
    Json,
    extract::{Path, Query, State},
};
use cookshelf_recipe::Ingredient;
use serde::Deserialize;

use super::AppState;
use crate::error::{AppError, Result};

#[derive(Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Ingredient>>> {
    Ok(Json(state.query.ingredients(params.name.as_deref()).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>> {
    state
        .query
        .find_ingredient(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("ingredient not found".to_owned()))
}
