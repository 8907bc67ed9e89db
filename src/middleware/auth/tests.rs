use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    routing::get,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{access, role};
use crate::api::extractors::CurrentUser;
use crate::services::auth::{RoleGate, TokenVerifier};

const SECRET: &[u8] = b"clave-de-pruebas";

fn sign(payload: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

fn token_for_role(role: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    sign(json!({ "usuario": { "id": 11, "rol": role }, "exp": exp }))
}

async fn whoami(CurrentUser(claim): CurrentUser) -> Json<Value> {
    Json(json!({ "claim": claim, "role": claim.role().unwrap() }))
}

/// `/me` behind the verifier, then each gate in `gates` (first entry is evaluated first).
fn app(gates: &[&[&str]]) -> Router {
    let mut router = Router::new().route("/me", get(whoami));
    for roles in gates.iter().rev() {
        router = role::apply(router, RoleGate::new(roles.iter().copied()));
    }
    access::apply(router, Arc::new(TokenVerifier::new(SECRET, 0)))
}

async fn call(app: Router, auth: Option<(&str, String)>) -> (StatusCode, Value) {
    let mut req = Request::builder().uri("/me");
    if let Some((name, value)) = auth {
        req = req.header(name, value);
    }
    let res: Response = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn bearer(token: &str) -> Option<(&'static str, String)> {
    Some(("Authorization", format!("Bearer {token}")))
}

#[tokio::test]
async fn missing_header_is_401() {
    let (status, body) = call(app(&[]), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token requerido" }));
}

#[tokio::test]
async fn malformed_header_is_401() {
    let (status, body) = call(app(&[]), Some(("authorization", "Bearer".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token malformado" }));
}

#[tokio::test]
async fn bad_signature_is_401() {
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({ "id": 1 }),
        &EncodingKey::from_secret(b"otra-clave"),
    )
    .unwrap();
    let (status, body) = call(app(&[]), bearer(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token inválido" }));
}

#[tokio::test]
async fn header_name_casing_does_not_matter() {
    let token = token_for_role("cliente");
    for name in ["authorization", "Authorization", "AUTHORIZATION"] {
        let (status, _) = call(app(&[]), Some((name, format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK, "header {name}");
    }
}

#[tokio::test]
async fn verified_claim_reaches_the_handler() {
    let (status, body) = call(app(&[]), bearer(&token_for_role("Admin"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claim"], json!({ "id": 11, "rol": "Admin" }));
}

#[tokio::test]
async fn vendedor_is_denied_on_admin_route() {
    let (status, body) = call(app(&[&["admin"]]), bearer(&token_for_role("vendedor"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Acceso denegado (rol insuficiente)" }));
}

#[tokio::test]
async fn vendedor_passes_when_allowed() {
    let (status, body) = call(
        app(&[&["vendedor", "admin"]]),
        bearer(&token_for_role("vendedor")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], json!("vendedor"));
}

#[tokio::test]
async fn gate_uses_role_aliases() {
    let token = sign(json!({ "id": 3, "tipo_usuario": "ADMIN" }));
    let (status, _) = call(app(&[&["admin"]]), bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn chained_gates_see_the_same_claim() {
    let token = token_for_role("admin");
    let (status, body) = call(app(&[&["admin", "vendedor"], &["ADMIN"]]), bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claim"], json!({ "id": 11, "rol": "admin" }));

    let (status, _) = call(app(&[&["admin", "vendedor"], &["superadmin"]]), bearer(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verifier_runs_before_the_gate() {
    // Without a credential the gate must never be reached: 401, not 403.
    let (status, body) = call(app(&[&["admin"]]), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token requerido" }));
}

#[tokio::test]
async fn gate_without_verifier_is_401() {
    let router = role::apply(
        Router::new().route("/me", get(|| async { "ok" })),
        RoleGate::new(["admin"]),
    );
    let (status, body) = call(router, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Usuario no autenticado" }));
}

#[tokio::test]
async fn structured_role_is_500_without_detail() {
    let token = sign(json!({ "id": 3, "rol": ["admin"] }));
    let (status, body) = call(app(&[&["admin"]]), bearer(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error en autorización" }));
}
