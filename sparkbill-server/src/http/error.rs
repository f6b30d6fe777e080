//! API error types with IntoResponse
//!
//! Errors are converted to JSON bodies of the form
//! `{"error": "<kind>", "detail": "<message>"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad identifier or query value (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Write rejected by storage (400, cause embedded in the detail)
    Persistence {
        context: &'static str,
        source: DbError,
    },

    /// Request body missing, malformed or mistyped (422)
    InvalidBody { message: String },

    /// Storage failure on a read or delete path (500, logged)
    Internal(DbError),
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Wrap a failed create/update. A missing parent stays a 404.
    pub fn persistence(context: &'static str, source: DbError) -> Self {
        match source {
            DbError::NotFound { resource, .. } => Self::NotFound { resource },
            source => Self::Persistence { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Persistence { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidBody { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// "rate card" -> "Rate card not found"
fn not_found_detail(resource: &str) -> String {
    let mut chars = resource.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(e) => json!({
                "error": "bad_request",
                "detail": e.to_string()
            }),
            Self::NotFound { resource } => json!({
                "error": "not_found",
                "detail": not_found_detail(resource)
            }),
            Self::Persistence { context, source } => {
                tracing::warn!(error = %source, "{}", context);
                json!({
                    "error": "bad_request",
                    "detail": format!("{}: {}", context, source)
                })
            }
            Self::InvalidBody { message } => json!({
                "error": "validation_error",
                "detail": message
            }),
            Self::Internal(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                json!({
                    "error": "internal_error",
                    "detail": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::NotFound { resource },
            _ => Self::Internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_id_is_400() {
        let (status, body) =
            body_of(ValidationError::InvalidId { resource: "bill" }.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["detail"], "Invalid bill ID format");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = body_of(ApiError::not_found("rate card")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Rate card not found");
    }

    #[tokio::test]
    async fn persistence_embeds_storage_message() {
        let err = ApiError::persistence(
            "Error creating bill",
            DbError::UniqueViolation {
                constraint: "bills_bill_no_key",
            },
        );
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Error creating bill: duplicate key value violates unique constraint \"bills_bill_no_key\""
        );
    }

    #[tokio::test]
    async fn persistence_keeps_missing_parent_as_404() {
        let err = ApiError::persistence(
            "Error creating item",
            DbError::NotFound {
                resource: "rate card",
                id: "x".into(),
            },
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let (status, body) = body_of(ApiError::Internal(DbError::Sqlx(sqlx::Error::PoolTimedOut))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "an internal error occurred");
    }
}
