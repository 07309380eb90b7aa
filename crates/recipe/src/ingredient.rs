use cookshelf_db::table::Ingredient as IngredientTable;
use sea_query::{Expr, ExprTrait, LikeExpr, OnConflict, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

/// One entry of an ingredient fixture file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientFixture {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

const COLUMNS: [IngredientTable; 3] = [
    IngredientTable::Id,
    IngredientTable::Name,
    IngredientTable::MeasurementUnit,
];

/// LIKE pattern matching names that start with `prefix`, wildcards escaped.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl super::Query {
    /// All ingredients ordered by name. When `name` is given only those whose
    /// name starts with it are returned (SQLite LIKE, ASCII case-insensitive).
    pub async fn ingredients(&self, name: Option<&str>) -> cookshelf_shared::Result<Vec<Ingredient>> {
        let mut statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(IngredientTable::Table)
            .order_by(IngredientTable::Name, Order::Asc)
            .order_by(IngredientTable::MeasurementUnit, Order::Asc)
            .to_owned();

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            statement.and_where(
                Expr::col(IngredientTable::Name)
                    .like(LikeExpr::new(prefix_pattern(name)).escape('\\')),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find_ingredient(
        &self,
        id: &str,
    ) -> cookshelf_shared::Result<Option<Ingredient>> {
        let (sql, values) = sea_query::Query::select()
            .columns(COLUMNS)
            .from(IngredientTable::Table)
            .and_where(Expr::col(IngredientTable::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

impl super::Command {
    /// Insert ingredients from a fixture, skipping (name, unit) pairs that
    /// already exist. Returns how many rows were inserted.
    pub async fn import_ingredients(
        &self,
        fixtures: Vec<IngredientFixture>,
    ) -> cookshelf_shared::Result<u64> {
        let mut tx = self.write_db.begin().await?;
        let mut inserted = 0;

        for fixture in fixtures {
            fixture.validate()?;

            let (sql, values) = sea_query::Query::insert()
                .into_table(IngredientTable::Table)
                .columns(COLUMNS)
                .values_panic([
                    Ulid::new().to_string().into(),
                    fixture.name.into(),
                    fixture.measurement_unit.into(),
                ])
                .on_conflict(
                    OnConflict::columns([IngredientTable::Name, IngredientTable::MeasurementUnit])
                        .do_nothing()
                        .to_owned(),
                )
                .build_sqlx(SqliteQueryBuilder);

            inserted += sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(inserted, "ingredients imported");

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::prefix_pattern;

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("flo"), "flo%");
        assert_eq!(prefix_pattern("50%"), "50\\%%");
        assert_eq!(prefix_pattern("a_b"), "a\\_b%");
    }
}
