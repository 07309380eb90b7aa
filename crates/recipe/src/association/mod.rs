mod favorite;
mod shopping_cart;

pub use favorite::Favorite;
pub use shopping_cart::ShoppingCart;

use cookshelf_db::table::Recipe;
use sea_query::{
    DeleteStatement, Expr, ExprTrait, InsertStatement, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

/// Short representation returned when a recipe joins a user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RecipeSnippet {
    pub id: String,
    pub name: String,
    pub cooking_time: u32,
}

/// A per-user collection of recipes backed by a `(user_id, recipe_id)` table.
///
/// Favorites and the shopping cart only differ by the table they touch and
/// the messages they answer with, so both flows go through
/// [`Command::add_recipe`](crate::Command::add_recipe) and
/// [`Command::remove_recipe`](crate::Command::remove_recipe).
pub trait Association {
    const ALREADY_PRESENT: &'static str;
    const ABSENT: &'static str;

    /// `SELECT recipe_id` of every row owned by `user_id`.
    fn recipe_ids(user_id: &str) -> SelectStatement;

    /// Insert that does nothing when the row already exists.
    fn insert(user_id: &str, recipe_id: &str) -> InsertStatement;

    fn delete(user_id: &str, recipe_id: &str) -> DeleteStatement;
}

impl crate::Command {
    pub async fn add_recipe<A: Association>(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> cookshelf_shared::Result<RecipeSnippet> {
        let Some(recipe) = self.snippet(recipe_id).await? else {
            cookshelf_shared::not_found!("recipe not found");
        };

        let (sql, values) = A::insert(user_id, recipe_id).build_sqlx(SqliteQueryBuilder);
        let inserted = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?
            .rows_affected();

        if inserted == 0 {
            cookshelf_shared::user!("{}", A::ALREADY_PRESENT);
        }

        Ok(recipe)
    }

    pub async fn remove_recipe<A: Association>(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> cookshelf_shared::Result<()> {
        if self.snippet(recipe_id).await?.is_none() {
            cookshelf_shared::not_found!("recipe not found");
        }

        let (sql, values) = A::delete(user_id, recipe_id).build_sqlx(SqliteQueryBuilder);
        let deleted = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?
            .rows_affected();

        if deleted == 0 {
            cookshelf_shared::user!("{}", A::ABSENT);
        }

        Ok(())
    }

    async fn snippet(&self, recipe_id: &str) -> cookshelf_shared::Result<Option<RecipeSnippet>> {
        let (sql, values) = sea_query::Query::select()
            .columns([Recipe::Id, Recipe::Name, Recipe::CookingTime])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RecipeSnippet, _>(&sql, values)
            .fetch_optional(&self.write_db)
            .await?)
    }
}

impl crate::Query {
    /// Ids of every recipe the user holds in association `A`.
    pub async fn recipe_ids<A: Association>(
        &self,
        user_id: &str,
    ) -> cookshelf_shared::Result<Vec<String>> {
        let (sql, values) = A::recipe_ids(user_id).build_sqlx(SqliteQueryBuilder);
        let rows: Vec<(String,)> = sqlx::query_as_with(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
