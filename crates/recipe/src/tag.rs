use cookshelf_db::table::Tag as TagTable;
use sea_query::{Expr, ExprTrait, OnConflict, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// One entry of a tag fixture file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagFixture {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: String,
}

fn validate_hex_color(color: &str) -> Result<(), validator::ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        return Err(validator::ValidationError::new("color")
            .with_message("color must look like #RRGGBB".into()));
    }

    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(validator::ValidationError::new("slug")
            .with_message("slug may only contain letters, digits, - and _".into()));
    }

    Ok(())
}

const COLUMNS: [TagTable; 4] = [
    TagTable::Id,
    TagTable::Name,
    TagTable::Color,
    TagTable::Slug,
];

impl super::Query {
    pub async fn tags(&self) -> cookshelf_shared::Result<Vec<Tag>> {
        let (sql, values) = sea_query::Query::select()
            .columns(COLUMNS)
            .from(TagTable::Table)
            .order_by(TagTable::Name, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find_tag(&self, id: &str) -> cookshelf_shared::Result<Option<Tag>> {
        let (sql, values) = sea_query::Query::select()
            .columns(COLUMNS)
            .from(TagTable::Table)
            .and_where(Expr::col(TagTable::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

impl super::Command {
    /// Insert tags from a fixture, skipping slugs that already exist.
    /// Returns how many rows were inserted.
    pub async fn import_tags(&self, fixtures: Vec<TagFixture>) -> cookshelf_shared::Result<u64> {
        let mut tx = self.write_db.begin().await?;
        let mut inserted = 0;

        for fixture in fixtures {
            fixture.validate()?;

            let (sql, values) = sea_query::Query::insert()
                .into_table(TagTable::Table)
                .columns(COLUMNS)
                .values_panic([
                    Ulid::new().to_string().into(),
                    fixture.name.into(),
                    fixture.color.into(),
                    fixture.slug.into(),
                ])
                .on_conflict(OnConflict::column(TagTable::Slug).do_nothing().to_owned())
                .build_sqlx(SqliteQueryBuilder);

            inserted += sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(inserted, "tags imported");

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_validation() {
        assert!(validate_hex_color("#E26C2D").is_ok());
        assert!(validate_hex_color("#e26c2d").is_ok());
        assert!(validate_hex_color("E26C2D").is_err());
        assert!(validate_hex_color("#E26C2").is_err());
        assert!(validate_hex_color("#G26C2D").is_err());
    }

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("breakfast").is_ok());
        assert!(validate_slug("late_dinner-2").is_ok());
        assert!(validate_slug("late dinner").is_err());
    }
}
