//! Factory: build the token services from application `Config`.
//!
//! Both share `JWT_SECRET`; the secret is handed over here and never read
//! from the environment by the services themselves.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenIssuer, TokenVerifier};

pub fn build_token_verifier(config: &Config) -> Arc<TokenVerifier> {
    Arc::new(TokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.token_leeway_seconds,
    ))
}

pub fn build_token_issuer(config: &Config) -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl_seconds,
    ))
}
