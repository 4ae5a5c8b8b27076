pub mod memory;
pub mod repository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewTodo, Todo, TodoPatch};

pub use memory::MemoryTodoStore;
pub use repository::SqliteTodoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Identifier format shared by every store: a hyphenated UUID.
pub fn is_valid_todo_id(id: &str) -> bool {
    Uuid::try_parse(id).is_ok()
}

pub fn new_todo_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn ensure_valid_id(id: &str) -> Result<(), StoreError> {
    if is_valid_todo_id(id) {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(id.to_string()))
    }
}

/// Id-keyed persistence for todos.
///
/// Id-bearing calls fail with [`StoreError::InvalidIdentifier`] before
/// touching storage when `id` is malformed. `find_and_remove` and
/// `find_and_update` are atomic per id.
#[async_trait]
pub trait TodoStore: Send + Sync {
    fn is_valid_id(&self, id: &str) -> bool {
        is_valid_todo_id(id)
    }

    async fn ping(&self) -> Result<(), StoreError>;
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError>;
    async fn find_and_remove(&self, id: &str) -> Result<Option<Todo>, StoreError>;
    async fn find_and_update(&self, id: &str, patch: TodoPatch) -> Result<Option<Todo>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_format() {
        assert!(is_valid_todo_id(&new_todo_id()));
        assert!(is_valid_todo_id("00000000-0000-0000-0000-000000000000"));
        assert!(!is_valid_todo_id("banana456"));
        assert!(!is_valid_todo_id(""));
    }
}
