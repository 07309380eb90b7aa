mod association;
mod command;
mod ingredient;
mod query;
mod tag;
mod user;

pub use association::{Association, Favorite, RecipeSnippet, ShoppingCart};
pub use command::{CreateInput, IngredientInput, UpdateInput};
pub use ingredient::{Ingredient, IngredientFixture};
pub use query::{Author, RecipeFilter, RecipeIngredient, RecipeView};
pub use tag::{Tag, TagFixture};
pub use user::{CreateUserInput, User};

use std::ops::Deref;

/// Write side: every statement runs on the write pool.
#[derive(Clone)]
pub struct Command(pub cookshelf_shared::State);

impl Deref for Command {
    type Target = cookshelf_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Read side: every statement runs on the read pool.
#[derive(Clone)]
pub struct Query(pub cookshelf_shared::State);

impl Deref for Query {
    type Target = cookshelf_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
