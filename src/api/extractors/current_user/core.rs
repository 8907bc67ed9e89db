use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::{AuthError, IdentityClaim};

/// Handler で IdentityClaim を受け取るための extractor
/// access middleware が IdentityClaim を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct CurrentUser(pub IdentityClaim);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaim>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::Unauthenticated)
    }
}
