/*
 * Responsibility
 * - /boletas, /detalle 系 handler
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    api::{
        dto::receipts::{CreateReceiptRequest, ReceiptResponse},
        extractors::{IdPath, JsonBody},
    },
    error::AppError,
    repos::receipt_repo::{self, NewReceipt},
    state::AppState,
};

pub async fn create_receipt(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<ReceiptResponse>), AppError> {
    let input = req.validate(Utc::now()).map_err(AppError::bad_request)?;

    let receipt = NewReceipt {
        numero_compra: input.numero_compra,
        fecha: input.fecha,
        comprador: &input.comprador,
        productos: input.productos,
        total: input.total,
        user_id: input.user_id,
    };

    let row = receipt_repo::create(&state.db, &receipt)
        .await
        .map_err(|e| AppError::from_repo(e, "Número de compra ya existente", "Error al crear boleta"))?;

    tracing::info!(numero_compra = ?row.numero_compra, "receipt created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_receipt(
    State(state): State<AppState>,
    IdPath(numero): IdPath,
) -> Result<Json<ReceiptResponse>, AppError> {
    let row = receipt_repo::get_by_number(&state.db, numero)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener boleta"))?
        .ok_or(AppError::not_found("Boleta no encontrada"))?;

    Ok(Json(row.into()))
}

pub async fn list_user_receipts(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> Result<Json<Vec<ReceiptResponse>>, AppError> {
    let rows = receipt_repo::list_by_user(&state.db, user_id)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener boletas"))?;

    Ok(Json(rows.into_iter().map(ReceiptResponse::from).collect()))
}

pub async fn delete_user_receipts(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> Result<Json<Value>, AppError> {
    let deleted = receipt_repo::delete_by_user(&state.db, user_id)
        .await
        .map_err(|e| AppError::internal(e, "Error al eliminar boletas"))?;

    tracing::info!(user_id, deleted, "receipts deleted");

    Ok(Json(json!({ "ok": true })))
}
