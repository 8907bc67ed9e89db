/*
 * Responsibility
 * - /productos 系 handler
 * - 参照は公開、作成/更新/削除は routes 側で admin の RoleGate を掛ける
 */
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    api::{
        dto::products::{ProductRequest, ProductResponse},
        extractors::{IdPath, JsonBody},
    },
    error::AppError,
    repos::product_repo,
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = product_repo::list(&state.db)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener productos"))?;

    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener producto"))?
        .ok_or(AppError::not_found("No encontrado"))?;

    Ok(Json(row.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let product = req.to_new_product().map_err(AppError::bad_request)?;

    let row = product_repo::create(&state.db, &product)
        .await
        .map_err(|e| AppError::from_repo(e, "Producto duplicado", "Error creando producto"))?;

    tracing::info!(product_id = row.id, "product created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let changes = req.to_changes().map_err(AppError::bad_request)?;

    let row = product_repo::update(&state.db, id, &changes)
        .await
        .map_err(|e| AppError::from_repo(e, "Producto duplicado", "Error actualizando producto"))?
        .ok_or(AppError::not_found("No encontrado"))?;

    Ok(Json(row.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Value>, AppError> {
    let deleted = product_repo::delete(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error eliminando producto"))?;

    tracing::info!(product_id = id, deleted, "delete product");

    Ok(Json(json!({ "ok": true })))
}
