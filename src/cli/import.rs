use std::path::Path;

use cookshelf_recipe::{IngredientFixture, TagFixture};
use serde::de::DeserializeOwned;

fn read_fixtures<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(path)?;

    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

async fn command(config: &crate::config::Config) -> anyhow::Result<cookshelf_recipe::Command> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    cookshelf_db::migrate(&pool).await?;

    Ok(cookshelf_recipe::Command(cookshelf_shared::State::single(pool)))
}

/// Loads `[{"name": .., "measurement_unit": ..}]`, skipping known pairs.
pub async fn import_ingredients(
    config: crate::config::Config,
    path: &Path,
) -> anyhow::Result<u64> {
    let fixtures = read_fixtures::<IngredientFixture>(path)?;
    let total = fixtures.len();
    let inserted = command(&config).await?.import_ingredients(fixtures).await?;

    tracing::info!(total, inserted, "ingredients imported");

    Ok(inserted)
}

/// Loads `[{"name": .., "color": .., "slug": ..}]`, skipping known slugs.
pub async fn import_tags(config: crate::config::Config, path: &Path) -> anyhow::Result<u64> {
    let fixtures = read_fixtures::<TagFixture>(path)?;
    let total = fixtures.len();
    let inserted = command(&config).await?.import_tags(fixtures).await?;

    tracing::info!(total, inserted, "tags imported");

    Ok(inserted)
}
