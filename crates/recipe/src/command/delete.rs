use cookshelf_db::table::{Favorite, Recipe, RecipeIngredient, RecipeTag, ShoppingCart};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl crate::Command {
    pub async fn delete(&self, id: &str, request_by: &str) -> cookshelf_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;
        super::ensure_author(&mut tx, id, request_by).await?;

        let statements = [
            sea_query::Query::delete()
                .from_table(RecipeTag::Table)
                .and_where(Expr::col(RecipeTag::RecipeId).eq(id))
                .to_owned(),
            sea_query::Query::delete()
                .from_table(RecipeIngredient::Table)
                .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id))
                .to_owned(),
            sea_query::Query::delete()
                .from_table(Favorite::Table)
                .and_where(Expr::col(Favorite::RecipeId).eq(id))
                .to_owned(),
            sea_query::Query::delete()
                .from_table(ShoppingCart::Table)
                .and_where(Expr::col(ShoppingCart::RecipeId).eq(id))
                .to_owned(),
            sea_query::Query::delete()
                .from_table(Recipe::Table)
                .and_where(Expr::col(Recipe::Id).eq(id))
                .to_owned(),
        ];

        for statement in statements {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe deleted");

        Ok(())
    }
}
