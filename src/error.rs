use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Field name → message, as returned for rejected DTOs.
pub type FieldErrors = BTreeMap<String, String>;

/// Errors returned by handlers. Each variant maps to one status code and
/// body shape; server-side failures are logged and answered generically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(FieldErrors),

    /// Transactional write failed; the message is shown to the client.
    #[error("{0}")]
    Rejected(&'static str),

    /// No authenticated user in the session.
    #[error("authentication required")]
    Unauthorized,

    #[error("invalid credentials")]
    LoginFailed,

    #[error("not found")]
    NotFound,

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(msg)).into_response(),
            ApiError::Validation(fields) => (StatusCode::BAD_REQUEST, Json(fields)).into_response(),
            ApiError::Rejected(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, Json(false)).into_response(),
            ApiError::LoginFailed => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Not Found" })),
            )
                .into_response(),
            ApiError::Session(e) => {
                tracing::error!(error = %e, "session error");
                internal()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "internal error");
                internal()
            }
        }
    }
}

fn internal() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal Server Error" })),
    )
        .into_response()
}

/// Unwraps a JSON body, turning a rejection into a 400 with its text.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected request body");
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn parts(err: ApiError) -> (StatusCode, String) {
        let res = err.into_response();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn bad_request_is_a_json_string() {
        let (status, body) = parts(ApiError::BadRequest("failed to fetch data".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "\"failed to fetch data\"");
    }

    #[tokio::test]
    async fn validation_is_keyed_by_field() {
        let mut fields = FieldErrors::new();
        fields.insert("user_id".into(), "This field is required.".into());
        let (status, body) = parts(ApiError::Validation(fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"user_id":"This field is required."}"#);
    }

    #[tokio::test]
    async fn unauthorized_returns_false() {
        let (status, body) = parts(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "false");
    }

    #[tokio::test]
    async fn login_failed_has_no_body() {
        let (status, body) = parts(ApiError::LoginFailed).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = parts(anyhow::anyhow!("connection refused").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("connection refused"));
    }
}
