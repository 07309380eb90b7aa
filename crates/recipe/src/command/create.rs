use cookshelf_db::table::Recipe;
use sea_query::SqliteQueryBuilder;
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use super::IngredientInput;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1))]
    pub cooking_time: u32,
    #[validate(length(min = 1), custom(function = "super::validate_tags"))]
    pub tags: Vec<String>,
    #[validate(length(min = 1), custom(function = "super::validate_ingredients"))]
    pub ingredients: Vec<IngredientInput>,
}

impl crate::Command {
    /// Stores a new recipe and its tag and ingredient links, returning its id.
    pub async fn create(
        &self,
        input: CreateInput,
        request_by: &str,
    ) -> cookshelf_shared::Result<String> {
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        super::ensure_exist(&mut tx, &input.tags, &input.ingredients).await?;

        let id = Ulid::new().to_string();
        let (sql, values) = sea_query::Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::Id,
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Text,
                Recipe::CookingTime,
                Recipe::CreatedAt,
            ])
            .values_panic([
                id.as_str().into(),
                request_by.into(),
                input.name.into(),
                input.text.into(),
                input.cooking_time.into(),
                cookshelf_shared::now().into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        super::insert_tags(&mut tx, &id, &input.tags).await?;
        super::insert_ingredients(&mut tx, &id, &input.ingredients).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = %id, author_id = request_by, "recipe created");

        Ok(id)
    }
}
