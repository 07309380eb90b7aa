mod import;
mod server;
mod user;

pub use import::{import_ingredients, import_tags};
pub use server::{migrate, serve};
pub use user::{create_user, issue_token};
