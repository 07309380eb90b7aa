use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use cookshelf_recipe::{CreateInput, RecipeFilter, RecipeView, UpdateInput};
use cookshelf_shared::page::{DEFAULT_LIMIT, PageArgs};
use serde::{Deserialize, Deserializer, Serialize};

use super::AppState;
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
};

const LIST_PATH: &str = "/api/recipes/";

/// `?tags=a&tags=b&author=..&is_favorited=1&page=2&limit=6`
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_favorited: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_in_shopping_cart: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;

    Ok(matches!(value.as_str(), "1" | "true"))
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List URL with the same query string, `page` replaced.
fn page_url(raw_query: Option<&str>, page: u32) -> String {
    let mut pairs = raw_query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page=") && *pair != "page")
        .collect::<Vec<_>>()
        .join("&");

    if !pairs.is_empty() {
        pairs.push('&');
    }

    format!("{LIST_PATH}?{pairs}page={page}")
}

pub async fn list(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(params): Query<ListParams>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Paginated<RecipeView>>> {
    let args = PageArgs::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_LIMIT),
    );
    let filter = RecipeFilter {
        tags: params.tags,
        author: params.author,
        is_favorited: params.is_favorited,
        is_in_shopping_cart: params.is_in_shopping_cart,
    };
    let viewer = user.as_ref().map(|AuthUser(user)| user.id.as_str());

    let page = state.query.list(&filter, viewer, args).await?;
    let raw_query = raw_query.as_deref();

    Ok(Json(Paginated {
        count: page.count,
        next: page
            .has_next()
            .then(|| page_url(raw_query, page.args.page() + 1)),
        previous: page
            .has_previous()
            .then(|| page_url(raw_query, page.args.page() - 1)),
        results: page.results,
    }))
}

async fn view(state: &AppState, id: &str, viewer: Option<&str>) -> Result<RecipeView> {
    state
        .query
        .find(id, viewer)
        .await?
        .ok_or_else(|| AppError::NotFound("recipe not found".to_owned()))
}

pub async fn detail(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>> {
    let viewer = user.as_ref().map(|AuthUser(user)| user.id.as_str());

    Ok(Json(view(&state, &id, viewer).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreateInput>,
) -> Result<(StatusCode, Json<RecipeView>)> {
    let id = state.command.create(input, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(view(&state, &id, Some(&user.id)).await?),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateInput>,
) -> Result<Json<RecipeView>> {
    state.command.update(&id, input, &user.id).await?;

    Ok(Json(view(&state, &id, Some(&user.id)).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.command.delete(&id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
