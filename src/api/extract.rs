use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// JSON body that tolerates a missing body or content type.
///
/// An empty body decodes as `T::default()`. Undecodable JSON is a
/// validation error rather than axum's 415/422 rejections, and so is any
/// JSON value that is not an object.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("malformed body: {}", e)))?;

        // Fields are read by name only; arrays would bind by position.
        if !value.is_object() {
            return Err(AppError::Validation("body must be a JSON object".to_string()));
        }

        serde_json::from_value(value)
            .map(Self)
            .map_err(|e| AppError::Validation(format!("malformed body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateTodoRequest;

    async fn extract(body: &str) -> Result<UpdateTodoRequest, AppError> {
        let req = Request::builder()
            .method("PATCH")
            .uri("/")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        JsonBody::<UpdateTodoRequest>::from_request(req, &()).await.map(|b| b.0)
    }

    #[tokio::test]
    async fn empty_body_is_default() {
        let req = extract("").await.unwrap();
        assert!(req.text.is_none());
        assert!(req.completed.is_none());
    }

    #[tokio::test]
    async fn parses_without_content_type() {
        let req = extract(r#"{"completed": true, "extra": 1}"#).await.unwrap();
        assert_eq!(req.completed, Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn garbage_is_validation_error() {
        let err = extract("{not json").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = extract("[1, 2]").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        for body in [r#"[null, true]"#, "42", r#""buy milk""#, "true", "null"] {
            let err = extract(body).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "accepted {body}");
        }
    }
}
