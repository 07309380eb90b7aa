use cookshelf_db::table::Favorite as FavoriteTable;
use sea_query::{
    DeleteStatement, Expr, ExprTrait, InsertStatement, OnConflict, SelectStatement,
};

pub struct Favorite;

impl super::Association for Favorite {
    const ALREADY_PRESENT: &'static str = "Recipe already in favorites";
    const ABSENT: &'static str = "Recipe not in favorites";

    fn recipe_ids(user_id: &str) -> SelectStatement {
        sea_query::Query::select()
            .column(FavoriteTable::RecipeId)
            .from(FavoriteTable::Table)
            .and_where(Expr::col(FavoriteTable::UserId).eq(user_id))
            .to_owned()
    }

    fn insert(user_id: &str, recipe_id: &str) -> InsertStatement {
        sea_query::Query::insert()
            .into_table(FavoriteTable::Table)
            .columns([
                FavoriteTable::UserId,
                FavoriteTable::RecipeId,
                FavoriteTable::CreatedAt,
            ])
            .values_panic([
                user_id.into(),
                recipe_id.into(),
                cookshelf_shared::now().into(),
            ])
            .on_conflict(
                OnConflict::columns([FavoriteTable::UserId, FavoriteTable::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned()
    }

    fn delete(user_id: &str, recipe_id: &str) -> DeleteStatement {
        sea_query::Query::delete()
            .from_table(FavoriteTable::Table)
            .and_where(Expr::col(FavoriteTable::UserId).eq(user_id))
            .and_where(Expr::col(FavoriteTable::RecipeId).eq(recipe_id))
            .to_owned()
    }
}
