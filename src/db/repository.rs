use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{StoreError, TodoStore, ensure_valid_id, new_todo_id};
use crate::models::{NewTodo, Todo, TodoPatch};

pub struct SqliteTodoStore {
    db: SqlitePool,
}

impl SqliteTodoStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let id = new_todo_id();

        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, text, completed, completed_at)
            VALUES (?1, ?2, 0, NULL)
            RETURNING id, text, completed, completed_at
            "#,
        )
        .bind(&id)
        .bind(&todo.text)
        .fetch_one(&self.db)
        .await?;

        debug!("inserted todo {}", todo.id);
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, text, completed, completed_at FROM todos ORDER BY rowid ASC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(todos)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, text, completed, completed_at FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn find_and_remove(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let todo = sqlx::query_as::<_, Todo>(
            "DELETE FROM todos WHERE id = ?1 RETURNING id, text, completed, completed_at",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn find_and_update(&self, id: &str, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        ensure_valid_id(id)?;
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = COALESCE(?1, text),
                completed = ?2,
                completed_at = ?3
            WHERE id = ?4
            RETURNING id, text, completed, completed_at
            "#,
        )
        .bind(patch.text)
        .bind(patch.completed)
        .bind(patch.completed_at)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }
}
