use std::sync::Arc;

use crate::services::auth::claims::IdentityClaim;
use crate::services::auth::error::AuthError;

/// Role allow-list check.
///
/// Entries are lowercased once here; per-request evaluation only lowercases
/// the claim's role. Cloning shares the list.
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[String]>,
}

impl RoleGate {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        let allowed = roles
            .into_iter()
            .map(|r| r.as_ref().to_lowercase())
            .collect::<Arc<[String]>>();

        Self { allowed }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn check(&self, claim: Option<&IdentityClaim>) -> Result<(), AuthError> {
        let claim = claim.ok_or(AuthError::Unauthenticated)?;

        let role = claim
            .role()
            .map_err(|e| AuthError::InternalAuthz(e.to_string()))?
            .to_lowercase();

        if self.allowed.iter().any(|allowed| *allowed == role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden { role })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claim(v: serde_json::Value) -> IdentityClaim {
        IdentityClaim::from_payload(v).unwrap()
    }

    #[test]
    fn allow_list_is_lowercased_at_construction() {
        let gate = RoleGate::new(["admin", "Vendedor"]);
        assert_eq!(gate.allowed(), ["admin".to_string(), "vendedor".to_string()]);
    }

    #[test]
    fn role_match_is_case_insensitive() {
        let gate = RoleGate::new(["admin", "Vendedor"]);
        assert!(gate.check(Some(&claim(json!({ "role": "VENDEDOR" })))).is_ok());
    }

    #[test]
    fn other_roles_are_forbidden() {
        let gate = RoleGate::new(["admin", "Vendedor"]);
        let err = gate
            .check(Some(&claim(json!({ "role": "cliente" }))))
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden { ref role } if role == "cliente"));
    }

    #[test]
    fn aliased_role_field_is_honoured() {
        let gate = RoleGate::new(["admin"]);
        assert!(gate.check(Some(&claim(json!({ "tipo_usuario": "admin" })))).is_ok());
        assert!(gate.check(Some(&claim(json!({ "tipoUsuario": "ADMIN" })))).is_ok());
    }

    #[test]
    fn missing_claim_is_unauthenticated() {
        let gate = RoleGate::new(["admin"]);
        assert!(matches!(gate.check(None), Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn claim_without_role_is_forbidden() {
        let gate = RoleGate::new(["admin"]);
        assert!(matches!(
            gate.check(Some(&claim(json!({ "id": 1 })))),
            Err(AuthError::Forbidden { .. })
        ));
    }

    #[test]
    fn structured_role_is_an_internal_fault() {
        let gate = RoleGate::new(["admin"]);
        let err = gate
            .check(Some(&claim(json!({ "rol": { "name": "admin" } }))))
            .unwrap_err();
        assert!(matches!(err, AuthError::InternalAuthz(_)));
        assert!(err.is_internal());
    }

    #[test]
    fn clones_share_the_allow_list() {
        let gate = RoleGate::new(vec!["admin".to_string()]);
        let copy = gate.clone();
        assert!(std::ptr::eq(gate.allowed().as_ptr(), copy.allowed().as_ptr()));
    }
}
