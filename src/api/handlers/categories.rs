/*
 * Responsibility
 * - /categorias 系 handler
 * - 削除時は producto.categoria の参照を外す (失敗しても削除は続行)
 */
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    api::{
        dto::categories::{CategoryRequest, CategoryResponse, DEFAULT_CATEGORIES, SeedResponse},
        extractors::{IdPath, JsonBody},
    },
    error::AppError,
    repos::{category_repo, product_repo},
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category_repo::list(&state.db)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener categorías"))?;

    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn list_category_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let names = category_repo::names(&state.db)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener nombres de categorías"))?;

    Ok(Json(names))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let nombre = req.nombre().map_err(AppError::bad_request)?;

    let row = category_repo::create(&state.db, nombre)
        .await
        .map_err(|e| AppError::from_repo(e, "Categoría ya existe", "Error creando categoría"))?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn seed_categories(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    const FAILED: &str = "Error seeding categorías";

    category_repo::insert_missing(&state.db, &DEFAULT_CATEGORIES)
        .await
        .map_err(|e| AppError::internal(e, FAILED))?;

    let categorias = category_repo::names(&state.db)
        .await
        .map_err(|e| AppError::internal(e, FAILED))?;

    Ok(Json(SeedResponse {
        ok: true,
        categorias,
    }))
}

pub async fn update_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let nombre = req.nombre().map_err(AppError::bad_request)?;

    let row = category_repo::rename(&state.db, id, nombre)
        .await
        .map_err(|e| {
            AppError::from_repo(
                e,
                "Ya existe otra categoría con ese nombre",
                "Error actualizando categoría",
            )
        })?
        .ok_or(AppError::not_found("Categoría no encontrada"))?;

    Ok(Json(row.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Value>, AppError> {
    const FAILED: &str = "Error eliminando categoría";

    let nombre = category_repo::get_name(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, FAILED))?
        .ok_or(AppError::not_found("Categoría no encontrada"))?;

    match product_repo::clear_category(&state.db, &nombre).await {
        Ok(detached) => tracing::info!(categoria = %nombre, detached, "products detached"),
        Err(e) => tracing::warn!(error = ?e, categoria = %nombre, "could not detach products"),
    }

    category_repo::delete(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, FAILED))?;

    Ok(Json(json!({ "ok": true })))
}
