/*
 * Responsibility
 * - 検証済みトークンから取り出した「認証済み主体」(IdentityClaim) の型
 * - payload の正規化 ({ usuario: {...} } のネストを剥がす)
 * - role 属性の別名 (rol / tipo_usuario / tipoUsuario / role) の解決
 *
 * Notes
 * - Claim はリクエスト単位で生成され、永続化はしない
 * - role の比較 (小文字化) は RoleGate 側の責務
 */
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys under which an issuer may nest the actual user claim.
const NESTED_CLAIM_KEYS: [&str; 2] = ["usuario", "user"];

/// Keys holding the subject identifier, in lookup order.
const SUBJECT_KEYS: [&str; 2] = ["id", "sub"];

type RoleAccessor = fn(&Map<String, Value>) -> Option<&Value>;

fn rol(claim: &Map<String, Value>) -> Option<&Value> {
    claim.get("rol")
}

fn tipo_usuario(claim: &Map<String, Value>) -> Option<&Value> {
    claim.get("tipo_usuario")
}

fn tipo_usuario_camel(claim: &Map<String, Value>) -> Option<&Value> {
    claim.get("tipoUsuario")
}

fn role(claim: &Map<String, Value>) -> Option<&Value> {
    claim.get("role")
}

/// Role attribute aliases, highest priority first.
///
/// Tokens issued over time carry the role under different names. This order
/// is a compatibility contract with already-issued tokens: reordering it can
/// silently deny a legitimate role.
const ROLE_ACCESSORS: [(&str, RoleAccessor); 4] = [
    ("rol", rol),
    ("tipo_usuario", tipo_usuario),
    ("tipoUsuario", tipo_usuario_camel),
    ("role", role),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("token payload is not a JSON object")]
    NotAnObject,
    #[error("role attribute '{0}' is not a scalar value")]
    RoleNotScalar(&'static str),
}

/// Identity of the authenticated principal for the duration of one request.
///
/// Immutable once built: only read accessors are exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IdentityClaim(Map<String, Value>);

impl IdentityClaim {
    /// Build the claim from a decoded token payload.
    ///
    /// `{ "usuario": { ... } }` (or `user`) is unwrapped to the nested object.
    /// Any other payload object is used as-is, including legacy tokens where
    /// `usuario` holds a plain string.
    pub fn from_payload(payload: Value) -> Result<Self, ClaimError> {
        let Value::Object(mut payload) = payload else {
            return Err(ClaimError::NotAnObject);
        };

        for key in NESTED_CLAIM_KEYS {
            if matches!(payload.get(key), Some(Value::Object(_)))
                && let Some(Value::Object(nested)) = payload.remove(key)
            {
                return Ok(Self(nested));
            }
        }

        Ok(Self(payload))
    }

    /// Subject identifier (`id`, then `sub`).
    pub fn subject(&self) -> Option<&Value> {
        SUBJECT_KEYS.iter().find_map(|key| match self.0.get(*key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        })
    }

    /// Subject identifier as an integer, when it is one (number or numeric string).
    pub fn subject_id(&self) -> Option<i64> {
        match self.subject()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Role as issued (case preserved).
    ///
    /// Returns the first alias holding a non-empty value, or `""` when none
    /// does. Empty strings, `null`, `false` and `0` count as absent.
    pub fn role(&self) -> Result<String, ClaimError> {
        for (field, accessor) in ROLE_ACCESSORS {
            let Some(value) = accessor(&self.0) else {
                continue;
            };
            match value {
                Value::String(s) if !s.is_empty() => return Ok(s.clone()),
                Value::Number(n) if n.as_f64() != Some(0.0) => return Ok(n.to_string()),
                Value::Bool(true) => return Ok("true".to_string()),
                Value::Array(_) | Value::Object(_) => return Err(ClaimError::RoleNotScalar(field)),
                _ => continue,
            }
        }

        Ok(String::new())
    }
}
