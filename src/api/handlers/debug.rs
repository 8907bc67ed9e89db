/*
 * Responsibility
 * - GET /debug-token: 検証済み IdentityClaim をそのまま返す
 * - フロントエンドが login 後に payload を確認するための route
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::extractors::CurrentUser;

pub async fn debug_token(CurrentUser(claim): CurrentUser) -> Json<Value> {
    Json(json!({ "usuario": claim }))
}
