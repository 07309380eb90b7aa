use cookshelf_db::table::ShoppingCart as ShoppingCartTable;
use sea_query::{
    DeleteStatement, Expr, ExprTrait, InsertStatement, OnConflict, SelectStatement,
};

pub struct ShoppingCart;

impl super::Association for ShoppingCart {
    const ALREADY_PRESENT: &'static str = "Recipe already in shopping cart";
    const ABSENT: &'static str = "Recipe not in shopping cart";

    fn recipe_ids(user_id: &str) -> SelectStatement {
        sea_query::Query::select()
            .column(ShoppingCartTable::RecipeId)
            .from(ShoppingCartTable::Table)
            .and_where(Expr::col(ShoppingCartTable::UserId).eq(user_id))
            .to_owned()
    }

    fn insert(user_id: &str, recipe_id: &str) -> InsertStatement {
        sea_query::Query::insert()
            .into_table(ShoppingCartTable::Table)
            .columns([
                ShoppingCartTable::UserId,
                ShoppingCartTable::RecipeId,
                ShoppingCartTable::CreatedAt,
            ])
            .values_panic([
                user_id.into(),
                recipe_id.into(),
                cookshelf_shared::now().into(),
            ])
            .on_conflict(
                OnConflict::columns([ShoppingCartTable::UserId, ShoppingCartTable::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned()
    }

    fn delete(user_id: &str, recipe_id: &str) -> DeleteStatement {
        sea_query::Query::delete()
            .from_table(ShoppingCartTable::Table)
            .and_where(Expr::col(ShoppingCartTable::UserId).eq(user_id))
            .and_where(Expr::col(ShoppingCartTable::RecipeId).eq(recipe_id))
            .to_owned()
    }
}
