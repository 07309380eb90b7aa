use std::collections::{HashMap, HashSet};

use cookshelf_db::table::{
    Ingredient as IngredientTable, Recipe, RecipeIngredient as RecipeIngredientTable, RecipeTag,
    Tag as TagTable, User as UserTable,
};
use cookshelf_shared::page::{Page, PageArgs};
use sea_query::{Expr, ExprTrait, Func, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::{Association, Favorite, ShoppingCart, Tag, User};

pub type Author = User;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub id: String,
    pub tags: Vec<Tag>,
    pub author: Author,
    pub ingredients: Vec<RecipeIngredient>,
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Recipe list filters. Tag slugs match any-of; the two flags only match
/// recipes of the viewer and match nothing without one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub is_in_shopping_cart: bool,
}

#[derive(FromRow)]
struct RecipeRow {
    id: String,
    author_id: String,
    name: String,
    text: String,
    cooking_time: u32,
}

#[derive(FromRow)]
struct TagRow {
    recipe_id: String,
    id: String,
    name: String,
    color: String,
    slug: String,
}

#[derive(FromRow)]
struct IngredientRow {
    recipe_id: String,
    id: String,
    name: String,
    measurement_unit: String,
    amount: u32,
}

const RECIPE_COLUMNS: [Recipe; 5] = [
    Recipe::Id,
    Recipe::AuthorId,
    Recipe::Name,
    Recipe::Text,
    Recipe::CookingTime,
];

/// Base statement of the recipe list, or `None` when the filter can't match.
fn filtered(filter: &RecipeFilter, viewer: Option<&str>) -> Option<SelectStatement> {
    let mut statement = sea_query::Query::select().from(Recipe::Table).to_owned();

    if !filter.tags.is_empty() {
        statement.and_where(
            Expr::col(Recipe::Id).in_subquery(
                sea_query::Query::select()
                    .column((RecipeTag::Table, RecipeTag::RecipeId))
                    .from(RecipeTag::Table)
                    .inner_join(
                        TagTable::Table,
                        Expr::col((TagTable::Table, TagTable::Id))
                            .equals((RecipeTag::Table, RecipeTag::TagId)),
                    )
                    .and_where(
                        Expr::col((TagTable::Table, TagTable::Slug))
                            .is_in(filter.tags.iter().map(String::as_str)),
                    )
                    .to_owned(),
            ),
        );
    }

    if let Some(author) = filter.author.as_deref() {
        statement.and_where(Expr::col(Recipe::AuthorId).eq(author));
    }

    if filter.is_favorited {
        statement.and_where(Expr::col(Recipe::Id).in_subquery(Favorite::recipe_ids(viewer?)));
    }

    if filter.is_in_shopping_cart {
        statement.and_where(Expr::col(Recipe::Id).in_subquery(ShoppingCart::recipe_ids(viewer?)));
    }

    Some(statement)
}

impl super::Query {
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<&str>,
        args: PageArgs,
    ) -> cookshelf_shared::Result<Page<RecipeView>> {
        let Some(statement) = filtered(filter, viewer) else {
            return Ok(Page {
                count: 0,
                args,
                results: vec![],
            });
        };

        let (sql, values) = statement
            .clone()
            .expr(Func::count(Expr::col(Recipe::Id)))
            .build_sqlx(SqliteQueryBuilder);

        let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        let (sql, values) = statement
            .clone()
            .columns(RECIPE_COLUMNS)
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .limit(args.limit().into())
            .offset(args.offset())
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(Page {
            count: count.try_into().unwrap_or_default(),
            args,
            results: self.hydrate(rows, viewer).await?,
        })
    }

    pub async fn find(
        &self,
        id: &str,
        viewer: Option<&str>,
    ) -> cookshelf_shared::Result<Option<RecipeView>> {
        let (sql, values) = sea_query::Query::select()
            .columns(RECIPE_COLUMNS)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row], viewer).await?.pop())
    }

    /// Batch-loads authors, tags, ingredients and viewer flags for `rows`,
    /// keeping their order.
    async fn hydrate(
        &self,
        rows: Vec<RecipeRow>,
        viewer: Option<&str>,
    ) -> cookshelf_shared::Result<Vec<RecipeView>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let author_ids: Vec<&str> = rows.iter().map(|r| r.author_id.as_str()).collect();

        let (sql, values) = sea_query::Query::select()
            .columns([
                UserTable::Id,
                UserTable::Email,
                UserTable::Username,
                UserTable::FirstName,
                UserTable::LastName,
            ])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).is_in(author_ids))
            .build_sqlx(SqliteQueryBuilder);

        let authors: HashMap<String, Author> = sqlx::query_as_with::<_, Author, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(|a| (a.id.to_owned(), a))
            .collect();

        let (sql, values) = sea_query::Query::select()
            .column((RecipeTag::Table, RecipeTag::RecipeId))
            .columns([
                (TagTable::Table, TagTable::Id),
                (TagTable::Table, TagTable::Name),
                (TagTable::Table, TagTable::Color),
                (TagTable::Table, TagTable::Slug),
            ])
            .from(RecipeTag::Table)
            .inner_join(
                TagTable::Table,
                Expr::col((TagTable::Table, TagTable::Id))
                    .equals((RecipeTag::Table, RecipeTag::TagId)),
            )
            .and_where(Expr::col((RecipeTag::Table, RecipeTag::RecipeId)).is_in(ids.clone()))
            .order_by((TagTable::Table, TagTable::Name), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
        for row in sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
        {
            tags.entry(row.recipe_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
                color: row.color,
                slug: row.slug,
            });
        }

        let (sql, values) = sea_query::Query::select()
            .column((RecipeIngredientTable::Table, RecipeIngredientTable::RecipeId))
            .columns([
                (IngredientTable::Table, IngredientTable::Id),
                (IngredientTable::Table, IngredientTable::Name),
                (IngredientTable::Table, IngredientTable::MeasurementUnit),
            ])
            .column((RecipeIngredientTable::Table, RecipeIngredientTable::Amount))
            .from(RecipeIngredientTable::Table)
            .inner_join(
                IngredientTable::Table,
                Expr::col((IngredientTable::Table, IngredientTable::Id)).equals((
                    RecipeIngredientTable::Table,
                    RecipeIngredientTable::IngredientId,
                )),
            )
            .and_where(
                Expr::col((RecipeIngredientTable::Table, RecipeIngredientTable::RecipeId))
                    .is_in(ids),
            )
            .order_by((IngredientTable::Table, IngredientTable::Name), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let mut ingredients: HashMap<String, Vec<RecipeIngredient>> = HashMap::new();
        for row in sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
        {
            ingredients
                .entry(row.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    id: row.id,
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: row.amount,
                });
        }

        let (favorites, cart) = match viewer {
            Some(viewer) => (
                self.recipe_ids::<Favorite>(viewer)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
                self.recipe_ids::<ShoppingCart>(viewer)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
            ),
            None => (HashSet::new(), HashSet::new()),
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(author) = authors.get(&row.author_id).cloned() else {
                cookshelf_shared::bail!("author {} of recipe {} is missing", row.author_id, row.id);
            };

            views.push(RecipeView {
                tags: tags.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                is_favorited: favorites.contains(&row.id),
                is_in_shopping_cart: cart.contains(&row.id),
                author,
                id: row.id,
                name: row.name,
                text: row.text,
                cooking_time: row.cooking_time,
            });
        }

        Ok(views)
    }
}
