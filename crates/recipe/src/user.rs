use cookshelf_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(max = 150))]
    pub first_name: String,
    #[validate(length(max = 150))]
    pub last_name: String,
}

/// Letters, digits and `@ . + - _` only.
fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(validator::ValidationError::new("username")
            .with_message("username may only contain letters, digits and @.+-_".into()));
    }

    Ok(())
}

const COLUMNS: [UserTable; 5] = [
    UserTable::Id,
    UserTable::Email,
    UserTable::Username,
    UserTable::FirstName,
    UserTable::LastName,
];

impl super::Query {
    pub async fn find_user(&self, id: &str) -> cookshelf_shared::Result<Option<User>> {
        self.find_user_by(UserTable::Id, id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> cookshelf_shared::Result<Option<User>> {
        self.find_user_by(UserTable::Email, email).await
    }

    async fn find_user_by(
        &self,
        column: UserTable,
        value: &str,
    ) -> cookshelf_shared::Result<Option<User>> {
        let (sql, values) = sea_query::Query::select()
            .columns(COLUMNS)
            .from(UserTable::Table)
            .and_where(Expr::col(column).eq(value))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

impl super::Command {
    pub async fn create_user(&self, input: CreateUserInput) -> cookshelf_shared::Result<String> {
        input.validate()?;

        let id = Ulid::new().to_string();
        let (sql, values) = sea_query::Query::insert()
            .into_table(UserTable::Table)
            .columns([
                UserTable::Id,
                UserTable::Email,
                UserTable::Username,
                UserTable::FirstName,
                UserTable::LastName,
                UserTable::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.email.into(),
                input.username.into(),
                input.first_name.into(),
                input.last_name.into(),
                cookshelf_shared::now().into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                cookshelf_shared::user!("a user with this email or username already exists");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user = id, "user created");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(validate_username("john.doe+1@home").is_ok());
        assert!(validate_username("john doe").is_err());
        assert!(validate_username("john/doe").is_err());
    }

    #[test]
    fn test_input_requires_email() {
        let input = CreateUserInput {
            email: "not-an-email".to_owned(),
            username: "john".to_owned(),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
