/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body `{"message": ...}`)
 * - RepoError / AuthError を統一的なレスポンスに変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound(message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::Conflict(message)
    }

    /// Log the underlying failure and answer with a generic 500 message.
    pub fn internal(err: impl std::fmt::Debug, message: &'static str) -> Self {
        tracing::error!(error = ?err, "{message}");
        Self::Internal(message)
    }

    /// Map a repository failure: unique violations become 409, anything else 500.
    pub fn from_repo(err: RepoError, conflict: &'static str, internal: &'static str) -> Self {
        match err {
            RepoError::Conflict => Self::Conflict(conflict),
            err => Self::internal(err, internal),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("Registro duplicado"),
            RepoError::Db(_) => AppError::internal(e, "Error interno"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Internal detail stays in the logs (see middleware::auth); only the fixed message goes out.
        (
            self.status(),
            Json(ErrorResponse::new(self.public_message())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn app_error_body_has_message_only() {
        let res = AppError::not_found("Usuario no encontrado").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "message": "Usuario no encontrado" })
        );
    }

    #[tokio::test]
    async fn auth_internal_fault_hides_detail() {
        let res = AuthError::InternalAuth("payload was [1,2]".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "message": "Error verificando token" })
        );
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = AppError::from_repo(RepoError::Conflict, "Categoría ya existe", "Error");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Categoría ya existe");
    }
}
