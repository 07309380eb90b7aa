use cookshelf_db::table::{Ingredient, RecipeIngredient, ShoppingCart};
use sea_query::{Alias, Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::IngredientLine;

/// Source of the raw, not yet aggregated, ingredient lines of a cart.
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// One entry per ingredient per recipe in the user's cart.
    async fn ingredient_lines_for_cart_user(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<IngredientLine>>;
}

#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: sqlx::SqlitePool,
}

impl SqliteRecipeStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn ingredient_lines_for_cart_user(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<IngredientLine>> {
        let (sql, values) = sea_query::Query::select()
            .expr_as(
                Expr::col((Ingredient::Table, Ingredient::Name)),
                Alias::new("ingredient_name"),
            )
            .expr_as(
                Expr::col((Ingredient::Table, Ingredient::MeasurementUnit)),
                Alias::new("unit"),
            )
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(ShoppingCart::Table)
            .inner_join(
                RecipeIngredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .equals((ShoppingCart::Table, ShoppingCart::RecipeId)),
            )
            .inner_join(
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(Expr::col((ShoppingCart::Table, ShoppingCart::UserId)).eq(user_id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientLine, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?)
    }
}
