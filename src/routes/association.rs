use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cookshelf_recipe::{Association, RecipeSnippet};

use super::AppState;
use crate::{auth::AuthUser, error::Result};

pub async fn add<A: Association + 'static>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeSnippet>)> {
    let snippet = state.command.add_recipe::<A>(&id, &user.id).await?;

    Ok((StatusCode::CREATED, Json(snippet)))
}

pub async fn remove<A: Association + 'static>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.command.remove_recipe::<A>(&id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
