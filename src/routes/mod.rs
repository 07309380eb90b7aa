use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use cookshelf_recipe::{Favorite, ShoppingCart};
use cookshelf_shopping::{FontResource, PdfRenderer, RecipeStore, SqliteRecipeStore};
use sqlx::SqlitePool;

use crate::error::AppError;

mod association;
mod health;
mod ingredients;
mod recipes;
mod shopping;
mod tags;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub command: cookshelf_recipe::Command,
    pub query: cookshelf_recipe::Query,
    pub store: Arc<dyn RecipeStore>,
    /// Shopping list renderer, or why the export font failed to load.
    pub renderer: Result<Arc<PdfRenderer>, String>,
    pub pool: SqlitePool,
}

impl AppState {
    /// Loads the export font once. A font that fails to load only disables
    /// the shopping list download.
    pub fn new(config: crate::config::Config, state: cookshelf_shared::State) -> Self {
        let renderer = FontResource::load(
            &config.export.font_name,
            config.export.font_path.as_deref(),
        )
        .map(|font| Arc::new(PdfRenderer::new(Arc::new(font))))
        .map_err(|err| {
            tracing::error!(error = %err, "shopping list export disabled");
            err.to_string()
        });

        Self {
            store: Arc::new(SqliteRecipeStore::new(state.read_db.clone())),
            pool: state.read_db.clone(),
            command: cookshelf_recipe::Command(state.clone()),
            query: cookshelf_recipe::Query(state),
            renderer,
            config,
        }
    }
}

pub async fn fallback() -> AppError {
    AppError::NotFound("Not found.".to_owned())
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/api/tags/", get(tags::list))
        .route("/api/tags/{id}/", get(tags::detail))
        .route("/api/ingredients/", get(ingredients::list))
        .route("/api/ingredients/{id}/", get(ingredients::detail))
        .route("/api/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(shopping::download),
        )
        .route(
            "/api/recipes/{id}/",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(association::add::<Favorite>).delete(association::remove::<Favorite>),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(association::add::<ShoppingCart>).delete(association::remove::<ShoppingCart>),
        )
        .fallback(fallback)
        .with_state(app_state)
}
