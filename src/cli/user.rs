use cookshelf_recipe::CreateUserInput;

async fn state(config: &crate::config::Config) -> anyhow::Result<cookshelf_shared::State> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    cookshelf_db::migrate(&pool).await?;

    Ok(cookshelf_shared::State::single(pool))
}

/// Registers a user and returns a fresh token for it.
pub async fn create_user(
    config: crate::config::Config,
    input: CreateUserInput,
) -> anyhow::Result<String> {
    let state = state(&config).await?;
    let id = cookshelf_recipe::Command(state).create_user(input).await?;

    crate::auth::generate_token(&config.jwt, id)
}

/// Token for an existing user.
pub async fn issue_token(config: crate::config::Config, email: String) -> anyhow::Result<String> {
    let state = state(&config).await?;

    let Some(user) = cookshelf_recipe::Query(state)
        .find_user_by_email(&email)
        .await?
    else {
        anyhow::bail!("user {email} not found");
    };

    crate::auth::generate_token(&config.jwt, user.id)
}
