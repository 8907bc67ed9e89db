use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;

use crate::services::auth::claims::IdentityClaim;
use crate::services::auth::error::AuthError;

/// Pull the token out of `Authorization: <scheme> <token>`.
///
/// `HeaderMap` lookups are case-insensitive, so any casing of the header name
/// matches. The value must split on a single space into exactly two parts;
/// the scheme itself is not checked.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// HMAC (shared secret) access-token verifier.
///
/// - Checks the signature and `exp` when the token carries one.
/// - Key material is not printed by Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &[u8], leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // `exp` is validated only when present
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify the signature / expiry and normalize the payload into an `IdentityClaim`.
    pub fn decode(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let data = jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::InvalidCredential)?;

        IdentityClaim::from_payload(data.claims).map_err(|e| AuthError::InternalAuth(e.to_string()))
    }

    /// Full check of an inbound request: header extraction, then `decode`.
    pub fn verify(&self, headers: &HeaderMap) -> Result<IdentityClaim, AuthError> {
        let token = bearer_token(headers)?;
        self.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn sign(payload: &Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn missing_header() {
        let v = TokenVerifier::new(SECRET, 0);
        assert!(matches!(
            v.verify(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn header_must_have_exactly_two_parts() {
        let v = TokenVerifier::new(SECRET, 0);
        for value in ["Bearer", "Bearer a b", "tokenonly", "Bearer  token"] {
            assert!(
                matches!(v.verify(&headers(value)), Err(AuthError::MalformedCredential)),
                "{value:?} should be malformed"
            );
        }
    }

    #[test]
    fn scheme_is_not_checked() {
        let token = sign(&json!({ "id": 1 }), SECRET);
        let v = TokenVerifier::new(SECRET, 0);
        assert!(v.verify(&headers(&format!("Token {token}"))).is_ok());
    }

    #[test]
    fn empty_token_is_invalid_not_malformed() {
        let v = TokenVerifier::new(SECRET, 0);
        assert!(matches!(
            v.verify(&headers("Bearer ")),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = sign(&json!({ "id": 1, "exp": in_one_hour() }), b"other-secret");
        let v = TokenVerifier::new(SECRET, 0);
        assert!(matches!(
            v.verify(&headers(&format!("Bearer {token}"))),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign(&json!({ "id": 1, "exp": exp }), SECRET);
        let v = TokenVerifier::new(SECRET, 0);
        assert!(matches!(
            v.decode(&token),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let v = TokenVerifier::new(SECRET, 0);
        assert!(matches!(
            v.decode("not.a.jwt"),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn nested_claim_is_unwrapped() {
        let token = sign(
            &json!({ "usuario": { "id": 7, "rol": "Admin" }, "exp": in_one_hour() }),
            SECRET,
        );
        let claim = TokenVerifier::new(SECRET, 0).decode(&token).unwrap();
        assert_eq!(
            serde_json::to_value(&claim).unwrap(),
            json!({ "id": 7, "rol": "Admin" })
        );
    }

    #[test]
    fn flat_payload_without_exp_is_accepted_as_is() {
        let payload = json!({ "id": 7, "rol": "admin" });
        let token = sign(&payload, SECRET);
        let claim = TokenVerifier::new(SECRET, 0).decode(&token).unwrap();
        assert_eq!(serde_json::to_value(&claim).unwrap(), payload);
    }

    #[test]
    fn hs512_tokens_are_accepted() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &json!({ "id": 3 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        let claim = TokenVerifier::new(SECRET, 0).decode(&token).unwrap();
        assert_eq!(claim.subject_id(), Some(3));
    }

    #[test]
    fn verification_is_repeatable() {
        let token = sign(&json!({ "usuario": { "id": 9, "rol": "vendedor" } }), SECRET);
        let h = headers(&format!("Bearer {token}"));
        let v = TokenVerifier::new(SECRET, 0);
        assert_eq!(v.verify(&h).unwrap(), v.verify(&h).unwrap());
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let v = TokenVerifier::new(b"super-secret-value", 0);
        assert!(!format!("{v:?}").contains("super-secret-value"));
    }
}
