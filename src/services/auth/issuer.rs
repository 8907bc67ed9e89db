use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;

/// Session token payload. The user claim is nested under `usuario`, which
/// `TokenVerifier` unwraps back into the `IdentityClaim`.
#[derive(Debug, Serialize)]
struct SessionClaims<'a, T> {
    usuario: &'a T,
    iat: i64,
    exp: i64,
}

/// Signs session tokens with the same shared secret the verifier checks.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl_seconds,
        }
    }

    pub fn issue<T: Serialize>(&self, usuario: &T) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            usuario,
            iat: now,
            exp: now + self.ttl_seconds as i64,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::TokenVerifier;
    use serde_json::json;

    #[test]
    fn issued_tokens_verify_to_the_nested_user() {
        let issuer = TokenIssuer::new(b"shared", 60);
        let verifier = TokenVerifier::new(b"shared", 0);

        let token = issuer
            .issue(&json!({ "id": 5, "correo": "a@b.cl", "tipo_usuario": "vendedor" }))
            .unwrap();
        let claim = verifier.decode(&token).unwrap();

        assert_eq!(claim.subject_id(), Some(5));
        assert_eq!(claim.role().unwrap(), "vendedor");
        assert!(serde_json::to_value(&claim).unwrap().get("exp").is_none());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let token = TokenIssuer::new(b"one", 60).issue(&json!({ "id": 1 })).unwrap();
        assert!(TokenVerifier::new(b"two", 0).decode(&token).is_err());
    }
}
