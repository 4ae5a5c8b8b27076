pub mod extract;

use axum::Json;
use axum::extract::Path;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use tracing::debug;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

use self::extract::JsonBody;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).delete(delete_todo).patch(update_todo),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn create_todo(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let new_todo = req.validate()?;
    let todo = state.store.insert(new_todo).await?;
    debug!("created todo {}", todo.id);
    Ok(Json(todo))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<TodoList>, AppError> {
    let todos = state.store.find_all().await?;
    Ok(Json(TodoList { todos }))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, AppError> {
    check_id(&state, &id)?;
    let todo = state.store.find_by_id(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(TodoEnvelope { todo }))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, AppError> {
    check_id(&state, &id)?;
    let todo = state
        .store
        .find_and_remove(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    debug!("deleted todo {}", todo.id);
    Ok(Json(TodoEnvelope { todo }))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateTodoRequest>, AppError>,
) -> Result<Json<TodoEnvelope>, AppError> {
    // The id is judged before the body.
    check_id(&state, &id)?;
    let JsonBody(req) = body?;

    let patch = req.reconcile(Utc::now().timestamp_millis())?;
    let todo = state
        .store
        .find_and_update(&id, patch)
        .await?
        .ok_or(AppError::NotFound)?;
    debug!("updated todo {} (completed={})", todo.id, todo.completed);
    Ok(Json(TodoEnvelope { todo }))
}

fn check_id(state: &AppState, id: &str) -> Result<(), AppError> {
    if state.store.is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::InvalidIdentifier(id.to_string()))
    }
}
