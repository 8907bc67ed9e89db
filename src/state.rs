/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, verifier: TokenVerifier, issuer: TokenIssuer
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{TokenIssuer, TokenVerifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub verifier: Arc<TokenVerifier>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, verifier: Arc<TokenVerifier>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            db,
            verifier,
            issuer,
        }
    }
}
