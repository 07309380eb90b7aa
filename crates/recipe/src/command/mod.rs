use std::collections::HashSet;

use cookshelf_db::table::{
    Ingredient as IngredientTable, Recipe, RecipeIngredient, RecipeTag, Tag as TagTable,
};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::{ValidationError, ValidationErrors};

mod create;
mod delete;
mod update;

pub use create::CreateInput;
pub use update::UpdateInput;

/// One ingredient of a recipe and the quantity it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub id: String,
    pub amount: u32,
}

fn validate_ingredients(ingredients: &[IngredientInput]) -> Result<(), ValidationError> {
    if ingredients.iter().any(|i| i.amount < 1) {
        return Err(ValidationError::new("amount")
            .with_message("ingredient amount must be at least 1".into()));
    }

    let mut seen = HashSet::new();
    if !ingredients.iter().all(|i| seen.insert(i.id.as_str())) {
        return Err(ValidationError::new("unique")
            .with_message("ingredients must not repeat".into()));
    }

    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if !tags.iter().all(|id| seen.insert(id.as_str())) {
        return Err(ValidationError::new("unique").with_message("tags must not repeat".into()));
    }

    Ok(())
}

fn invalid(field: &'static str, message: String) -> cookshelf_shared::Error {
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("not_found").with_message(message.into()),
    );

    errors.into()
}

/// Fails with a field error naming the first id that has no row.
async fn ensure_exist(
    conn: &mut SqliteConnection,
    tags: &[String],
    ingredients: &[IngredientInput],
) -> cookshelf_shared::Result<()> {
    let (sql, values) = sea_query::Query::select()
        .column(TagTable::Id)
        .from(TagTable::Table)
        .and_where(Expr::col(TagTable::Id).is_in(tags.iter().map(String::as_str)))
        .build_sqlx(SqliteQueryBuilder);

    let found: HashSet<String> = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect();

    if let Some(id) = tags.iter().find(|id| !found.contains(*id)) {
        return Err(invalid("tags", format!("tag {id} does not exist")));
    }

    let (sql, values) = sea_query::Query::select()
        .column(IngredientTable::Id)
        .from(IngredientTable::Table)
        .and_where(
            Expr::col(IngredientTable::Id).is_in(ingredients.iter().map(|i| i.id.as_str())),
        )
        .build_sqlx(SqliteQueryBuilder);

    let found: HashSet<String> = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect();

    if let Some(input) = ingredients.iter().find(|i| !found.contains(&i.id)) {
        return Err(invalid(
            "ingredients",
            format!("ingredient {} does not exist", input.id),
        ));
    }

    Ok(())
}

async fn insert_tags(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    tags: &[String],
) -> cookshelf_shared::Result<()> {
    for tag_id in tags {
        let (sql, values) = sea_query::Query::insert()
            .into_table(RecipeTag::Table)
            .columns([RecipeTag::RecipeId, RecipeTag::TagId])
            .values_panic([recipe_id.into(), tag_id.as_str().into()])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    ingredients: &[IngredientInput],
) -> cookshelf_shared::Result<()> {
    for input in ingredients {
        let (sql, values) = sea_query::Query::insert()
            .into_table(RecipeIngredient::Table)
            .columns([
                RecipeIngredient::RecipeId,
                RecipeIngredient::IngredientId,
                RecipeIngredient::Amount,
            ])
            .values_panic([
                recipe_id.into(),
                input.id.as_str().into(),
                input.amount.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}

#[derive(FromRow)]
struct Owner {
    author_id: String,
}

/// Loads the recipe author, failing with not found or forbidden.
async fn ensure_author(
    conn: &mut SqliteConnection,
    id: &str,
    request_by: &str,
) -> cookshelf_shared::Result<()> {
    let (sql, values) = sea_query::Query::select()
        .column(Recipe::AuthorId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .build_sqlx(SqliteQueryBuilder);

    let Some(owner) = sqlx::query_as_with::<_, Owner, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?
    else {
        cookshelf_shared::not_found!("recipe not found");
    };

    if owner.author_id != request_by {
        cookshelf_shared::forbidden!("not author of recipe");
    }

    Ok(())
}
