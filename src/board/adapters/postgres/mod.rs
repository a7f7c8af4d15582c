//! `PostgreSQL` adapters for board persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardRepository};
pub(crate) use repository::replace_board_document;
