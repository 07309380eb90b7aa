mod ingredient_create_table;
mod recipe_create_table;
mod recipe_relation_create_tables;
mod tag_create_table;
mod user_create_table;
mod user_recipe_create_tables;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "cookshelf",
    "m0_1",
    vec_box![],
    vec_box![
        user_create_table::Operation,
        tag_create_table::Operation,
        ingredient_create_table::Operation,
        recipe_create_table::Operation,
        recipe_relation_create_tables::Operation,
        user_recipe_create_tables::Operation,
    ]
);
