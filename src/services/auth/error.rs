/*
 * Responsibility
 * - 認証 (TokenVerifier) / 認可 (RoleGate) の失敗種別
 * - 401/403 の「想定内の拒否」と 500 の「内部障害」を型で区別する
 * - HTTP への変換 (IntoResponse) は crate::error 側
 */
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingCredential,

    #[error("authorization header is not '<scheme> <token>'")]
    MalformedCredential,

    #[error("token rejected: {0}")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),

    #[error("token verification fault: {0}")]
    InternalAuth(String),

    #[error("no identity claim on request")]
    Unauthenticated,

    #[error("role '{role}' is not allowed")]
    Forbidden { role: String },

    #[error("authorization fault: {0}")]
    InternalAuthz(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::InvalidCredential(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::InternalAuth(_) | AuthError::InternalAuthz(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the client. Never carries diagnostic detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "Token requerido",
            AuthError::MalformedCredential => "Token malformado",
            AuthError::InvalidCredential(_) => "Token inválido",
            AuthError::InternalAuth(_) => "Error verificando token",
            AuthError::Unauthenticated => "Usuario no autenticado",
            AuthError::Forbidden { .. } => "Acceso denegado (rol insuficiente)",
            AuthError::InternalAuthz(_) => "Error en autorización",
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}
