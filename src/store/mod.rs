//! Persistence seams.
//!
//! The engine only ever talks to [`QuestionStore`] and [`CategoryStore`]; the
//! SQLite [`Database`](sqlite::Database) is the production implementation and
//! [`MemoryStore`](memory::MemoryStore) backs the engine tests.

#[cfg(test)]
pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::models::{Category, NewQuestion, Question};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait QuestionStore {
    /// Every question, in id order.
    fn list_all(&self) -> StoreResult<Vec<Question>>;

    /// Questions in one category, in id order. Unknown categories yield an empty list.
    fn list_by_category(&self, category_id: i64) -> StoreResult<Vec<Question>>;

    /// Case-insensitive containment match on the question text, in id order.
    fn search_by_text(&self, needle: &str) -> StoreResult<Vec<Question>>;

    fn get(&self, id: i64) -> StoreResult<Option<Question>>;

    /// Stores a question under a freshly assigned id that was never used before.
    fn insert(&self, question: &NewQuestion) -> StoreResult<Question>;

    /// Returns `true` if a question existed and was removed.
    fn delete(&self, id: i64) -> StoreResult<bool>;
}

pub trait CategoryStore {
    /// Every category, in id order.
    fn list_categories(&self) -> StoreResult<Vec<Category>>;
}
