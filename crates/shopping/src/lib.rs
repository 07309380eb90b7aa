//! Shopping list export: aggregates the ingredients of every recipe in a
//! user's cart and lays them out as a paginated PDF.

mod aggregation;
mod error;
mod font;
mod layout;
mod render;
mod store;

pub use aggregation::{
    AggregatedIngredient, IngredientLine, ShoppingList, build_shopping_list,
    build_shopping_list_within,
};
pub use error::{ExportError, RenderError};
pub use font::{BUNDLED_FONT, FontResource};
pub use layout::{EMPTY_MESSAGE, Layout, PlacedLine, RenderedPage, TITLE, paginate};
pub use render::{
    DocumentRenderer, PdfRenderer, ShoppingListDocument, export_shopping_list,
    render_shopping_list,
};
pub use store::{RecipeStore, SqliteRecipeStore};
