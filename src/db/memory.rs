use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::{StoreError, TodoStore, ensure_valid_id, new_todo_id};
use crate::models::{NewTodo, Todo, TodoPatch};

/// In-process store. Keeps insertion order; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self { todos: RwLock::new(todos) }
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let todo = Todo {
            id: new_todo_id(),
            text: todo.text,
            completed: false,
            completed_at: None,
        };
        self.todos.write().await.push(todo.clone());
        debug!("inserted todo {}", todo.id);
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn find_and_remove(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let mut todos = self.todos.write().await;
        let Some(idx) = todos.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        Ok(Some(todos.remove(idx)))
    }

    async fn find_and_update(&self, id: &str, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply(todo);
        Ok(Some(todo.clone()))
    }
}
