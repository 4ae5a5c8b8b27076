use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds. Set iff `completed` is true.
    pub completed_at: Option<i64>,
}

/// Validated input for a new todo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub text: String,
}

/// Partial update handed to the store.
///
/// `completed` and `completed_at` always travel together; `text` is only
/// written when present.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodoRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

/// Allow-listed fields of a PATCH body. Anything else is dropped on parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub completed: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidField {
    #[error("text is required")]
    MissingText,

    #[error("text must be a non-empty string")]
    BadText,
}

impl NewTodoRequest {
    pub fn validate(self) -> Result<NewTodo, InvalidField> {
        match self.text {
            None | Some(Value::Null) => Err(InvalidField::MissingText),
            Some(value) => Ok(NewTodo { text: non_empty_text(value)? }),
        }
    }
}

impl UpdateTodoRequest {
    /// Derives the store patch. Only a literal JSON `true` completes the
    /// todo; every other `completed` value resets it to active.
    pub fn reconcile(self, now_millis: i64) -> Result<TodoPatch, InvalidField> {
        let text = match self.text {
            None | Some(Value::Null) => None,
            Some(value) => Some(non_empty_text(value)?),
        };

        let patch = if matches!(self.completed, Some(Value::Bool(true))) {
            TodoPatch {
                text,
                completed: true,
                completed_at: Some(now_millis),
            }
        } else {
            TodoPatch {
                text,
                completed: false,
                completed_at: None,
            }
        };
        Ok(patch)
    }
}

impl TodoPatch {
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        todo.completed = self.completed;
        todo.completed_at = self.completed_at;
    }
}

fn non_empty_text(value: Value) -> Result<String, InvalidField> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s),
        _ => Err(InvalidField::BadText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(body: Value) -> UpdateTodoRequest {
        serde_json::from_value(body).expect("body should parse")
    }

    #[test]
    fn create_requires_non_empty_string() {
        for body in [json!({}), json!({"text": null}), json!({"text": ""}), json!({"text": 0}), json!({"text": false})] {
            let req: NewTodoRequest = serde_json::from_value(body).unwrap();
            assert!(req.validate().is_err());
        }

        let req: NewTodoRequest = serde_json::from_value(json!({"text": "buy milk"})).unwrap();
        assert_eq!(req.validate().unwrap(), NewTodo { text: "buy milk".to_string() });
    }

    #[test]
    fn completed_true_stamps_time() {
        let patch = update(json!({"completed": true, "text": "x"})).reconcile(1_700).unwrap();
        assert_eq!(patch.text.as_deref(), Some("x"));
        assert!(patch.completed);
        assert_eq!(patch.completed_at, Some(1_700));
    }

    #[test]
    fn non_boolean_completed_is_not_done() {
        for value in [json!("true"), json!(1), json!(null), json!({}), json!(false)] {
            let patch = update(json!({ "completed": value })).reconcile(5).unwrap();
            assert!(!patch.completed);
            assert_eq!(patch.completed_at, None);
        }
    }

    #[test]
    fn missing_completed_resets_to_active() {
        let patch = update(json!({"text": "renamed"})).reconcile(5).unwrap();
        assert_eq!(
            patch,
            TodoPatch { text: Some("renamed".to_string()), completed: false, completed_at: None }
        );
    }

    #[test]
    fn unlisted_fields_are_dropped() {
        let patch = update(json!({"_id": "other", "completedAt": 42, "owner": "x"}))
            .reconcile(9)
            .unwrap();
        assert_eq!(patch, TodoPatch { text: None, completed: false, completed_at: None });
    }

    #[test]
    fn empty_text_on_update_is_rejected() {
        assert_eq!(
            update(json!({"text": ""})).reconcile(1).unwrap_err(),
            InvalidField::BadText
        );
    }

    #[test]
    fn apply_refreshes_and_clears_timestamp() {
        let mut todo = Todo {
            id: "a".to_string(),
            text: "t".to_string(),
            completed: true,
            completed_at: Some(10),
        };

        update(json!({"completed": true})).reconcile(20).unwrap().apply(&mut todo);
        assert_eq!(todo.completed_at, Some(20));

        let inactive = update(json!({"completed": false})).reconcile(30).unwrap();
        inactive.apply(&mut todo);
        let first = todo.clone();
        inactive.apply(&mut todo);
        assert_eq!(todo, first);
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
        assert_eq!(todo.text, "t");
    }
}
