#![allow(dead_code)]

use cookshelf_recipe::{
    Command, CreateInput, CreateUserInput, IngredientFixture, IngredientInput, Query, TagFixture,
};
use cookshelf_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use std::{path::PathBuf, str::FromStr};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    cookshelf_db::migrate(&pool).await?;

    Ok(State::single(pool))
}

pub struct Catalog {
    pub breakfast: String,
    pub dinner: String,
    pub flour: String,
    pub flour_kg: String,
    pub milk: String,
}

/// Imports two tags and three ingredients and returns their ids.
pub async fn seed_catalog(state: &State) -> anyhow::Result<Catalog> {
    let cmd = Command(state.clone());
    cmd.import_tags(vec![
        TagFixture {
            name: "Breakfast".to_owned(),
            color: "#E26C2D".to_owned(),
            slug: "breakfast".to_owned(),
        },
        TagFixture {
            name: "Dinner".to_owned(),
            color: "#49B64E".to_owned(),
            slug: "dinner".to_owned(),
        },
    ])
    .await?;

    cmd.import_ingredients(vec![
        ingredient("Flour", "g"),
        ingredient("Flour", "kg"),
        ingredient("Milk", "ml"),
    ])
    .await?;

    let query = Query(state.clone());
    let tags = query.tags().await?;
    let ingredients = query.ingredients(None).await?;
    let id_of = |name: &str, unit: &str| {
        ingredients
            .iter()
            .find(|i| i.name == name && i.measurement_unit == unit)
            .map(|i| i.id.to_owned())
            .unwrap()
    };

    Ok(Catalog {
        breakfast: tags[0].id.to_owned(),
        dinner: tags[1].id.to_owned(),
        flour: id_of("Flour", "g"),
        flour_kg: id_of("Flour", "kg"),
        milk: id_of("Milk", "ml"),
    })
}

pub fn ingredient(name: &str, unit: &str) -> IngredientFixture {
    IngredientFixture {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

pub async fn create_user(state: &State, username: &str) -> anyhow::Result<String> {
    Ok(Command(state.clone())
        .create_user(CreateUserInput {
            email: format!("{username}@cookshelf.test"),
            username: username.to_owned(),
            ..Default::default()
        })
        .await?)
}

pub fn recipe_input<T: AsRef<str>, I: AsRef<str>>(
    name: &str,
    tags: &[T],
    ingredients: &[(I, u32)],
) -> CreateInput {
    CreateInput {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        cooking_time: 15,
        tags: tags.iter().map(|t| t.as_ref().to_owned()).collect(),
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientInput {
                id: id.as_ref().to_owned(),
                amount: *amount,
            })
            .collect(),
    }
}
