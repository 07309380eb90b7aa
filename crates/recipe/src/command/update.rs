use cookshelf_db::table::{Recipe, RecipeIngredient, RecipeTag};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use validator::Validate;

use super::IngredientInput;

/// Partial recipe update. Absent fields keep their stored value; provided
/// tag or ingredient lists replace the whole set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = 1))]
    pub cooking_time: Option<u32>,
    #[validate(length(min = 1), custom(function = "super::validate_tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 1), custom(function = "super::validate_ingredients"))]
    pub ingredients: Option<Vec<IngredientInput>>,
}

impl crate::Command {
    pub async fn update(
        &self,
        id: &str,
        input: UpdateInput,
        request_by: &str,
    ) -> cookshelf_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;
        super::ensure_author(&mut tx, id, request_by).await?;

        input.validate()?;

        super::ensure_exist(
            &mut tx,
            input.tags.as_deref().unwrap_or_default(),
            input.ingredients.as_deref().unwrap_or_default(),
        )
        .await?;

        let mut columns = Vec::new();
        if let Some(name) = input.name {
            columns.push((Recipe::Name, Expr::val(name)));
        }
        if let Some(text) = input.text {
            columns.push((Recipe::Text, Expr::val(text)));
        }
        if let Some(cooking_time) = input.cooking_time {
            columns.push((Recipe::CookingTime, Expr::val(cooking_time)));
        }

        if !columns.is_empty() {
            let (sql, values) = sea_query::Query::update()
                .table(Recipe::Table)
                .values(columns)
                .and_where(Expr::col(Recipe::Id).eq(id))
                .build_sqlx(SqliteQueryBuilder);

            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        if let Some(tags) = input.tags {
            let (sql, values) = sea_query::Query::delete()
                .from_table(RecipeTag::Table)
                .and_where(Expr::col(RecipeTag::RecipeId).eq(id))
                .build_sqlx(SqliteQueryBuilder);

            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
            super::insert_tags(&mut tx, id, &tags).await?;
        }

        if let Some(ingredients) = input.ingredients {
            let (sql, values) = sea_query::Query::delete()
                .from_table(RecipeIngredient::Table)
                .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id))
                .build_sqlx(SqliteQueryBuilder);

            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
            super::insert_ingredients(&mut tx, id, &ingredients).await?;
        }

        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe updated");

        Ok(())
    }
}
