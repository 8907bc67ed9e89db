/*
 * Responsibility
 * - /usuarios 系 handler (register / login / CRUD / 購入履歴)
 * - Path/Json を extractor で受け、DTO validation → repo/service 呼び出し
 * - login で session token を発行する (TokenIssuer)
 * - 変更系 (PUT/DELETE/compras) は本人 (claim の subject) か admin のみ
 *   - tipo_usuario の変更は admin のみ
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    api::{
        dto::users::{
            LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionUser,
            UpdateUserRequest, UserResponse,
        },
        extractors::{CurrentUser, IdPath, JsonBody},
    },
    error::AppError,
    repos::user_repo,
    services::{
        auth::{IdentityClaim, RoleGate},
        purchase_history::{self, AppendOutcome},
    },
    state::AppState,
};

/// Caller may act on user `id` when it is that user or an admin.
/// Returns whether the caller is an admin.
fn authorize_self_or_admin(claim: &IdentityClaim, id: i32) -> Result<bool, AppError> {
    let admin = RoleGate::new(["admin"]).check(Some(claim)).is_ok();

    if admin || claim.subject_id() == Some(i64::from(id)) {
        Ok(admin)
    } else {
        tracing::warn!(user_id = id, subject = ?claim.subject(), "user record access denied");
        Err(AppError::Forbidden("Acceso denegado"))
    }
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let new_user = req.to_new_user().map_err(AppError::bad_request)?;

    let row = user_repo::create(&state.db, &new_user)
        .await
        .map_err(|e| AppError::from_repo(e, "Usuario ya existe", "Error en registro"))?;

    tracing::info!(user_id = row.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            ok: true,
            user: row.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    const BAD_CREDENTIALS: &str = "Credenciales inválidas";

    let (Some(correo), Some(password)) = (req.correo.as_deref(), req.password.as_deref()) else {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    };

    let row = user_repo::find_by_credentials(&state.db, correo, password)
        .await
        .map_err(|e| AppError::internal(e, "Error en login"))?
        .ok_or(AppError::Unauthorized(BAD_CREDENTIALS))?;

    let token = state
        .issuer
        .issue(&SessionUser::from(&row))
        .map_err(|e| AppError::internal(e, "Error en login"))?;

    Ok(Json(LoginResponse {
        token,
        user: row.into(),
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener usuarios"))?;

    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::get(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener usuario"))?
        .ok_or(AppError::not_found("Usuario no encontrado"))?;

    Ok(Json(row.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let admin = authorize_self_or_admin(&claim, id)?;
    let changes = req.to_changes().map_err(AppError::bad_request)?;

    if changes.tipo_usuario.is_some() && !admin {
        tracing::warn!(user_id = id, "tipo_usuario change by non-admin");
        return Err(AppError::Forbidden(
            "Sólo un administrador puede cambiar tipo_usuario",
        ));
    }

    let row = user_repo::update(&state.db, id, &changes)
        .await
        .map_err(|e| AppError::from_repo(e, "Correo ya registrado", "Error actualizando usuario"))?
        .ok_or(AppError::not_found("Usuario no encontrado"))?;

    Ok(Json(json!({ "ok": true, "user": UserResponse::from(row) })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    IdPath(id): IdPath,
) -> Result<Json<Value>, AppError> {
    authorize_self_or_admin(&claim, id)?;

    let deleted = user_repo::delete(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error eliminando usuario"))?;

    tracing::info!(user_id = id, deleted, "delete user");

    Ok(Json(json!({ "ok": true })))
}

pub async fn add_purchase(
    State(state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    IdPath(id): IdPath,
    JsonBody(purchase): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const FAILED: &str = "Error agregando compra al historial";

    authorize_self_or_admin(&claim, id)?;

    // row lock held until commit: concurrent appends see each other's result
    let mut tx = state
        .db
        .begin()
        .await
        .map_err(|e| AppError::internal(e, FAILED))?;

    let history = user_repo::lock_history(&mut tx, id)
        .await
        .map_err(|e| AppError::internal(e, FAILED))?
        .ok_or(AppError::not_found("Usuario no encontrado"))?;

    match purchase_history::append(&history, purchase, Utc::now()) {
        AppendOutcome::Duplicate { numero_compra } => {
            tracing::info!(user_id = id, "duplicate purchase ignored");
            Ok((
                StatusCode::OK,
                Json(json!({
                    "ok": true,
                    "message": "Compra duplicada ignorada",
                    "numeroCompra": numero_compra,
                })),
            ))
        }
        AppendOutcome::Added(updated) => {
            user_repo::set_history(&mut tx, id, &updated)
                .await
                .map_err(|e| AppError::internal(e, FAILED))?;
            tx.commit().await.map_err(|e| AppError::internal(e, FAILED))?;

            Ok((
                StatusCode::CREATED,
                Json(json!({ "ok": true, "historialCompras": updated })),
            ))
        }
    }
}

pub async fn get_purchases(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Value>>, AppError> {
    let history = user_repo::get_history(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error obteniendo historial"))?
        .ok_or(AppError::not_found("Usuario no encontrado"))?;

    Ok(Json(history))
}

pub async fn clear_purchases(
    State(state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    IdPath(id): IdPath,
) -> Result<Json<Value>, AppError> {
    authorize_self_or_admin(&claim, id)?;

    user_repo::clear_history(&state.db, id)
        .await
        .map_err(|e| AppError::internal(e, "Error limpiando historial"))?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(v: Value) -> IdentityClaim {
        IdentityClaim::from_payload(v).unwrap()
    }

    #[test]
    fn user_may_act_on_own_record() {
        let c = claim(json!({ "id": 7, "tipo_usuario": "cliente" }));
        assert!(!authorize_self_or_admin(&c, 7).unwrap());
    }

    #[test]
    fn numeric_string_subject_counts_as_own_record() {
        let c = claim(json!({ "sub": "7" }));
        assert!(authorize_self_or_admin(&c, 7).is_ok());
    }

    #[test]
    fn user_may_not_act_on_another_record() {
        let c = claim(json!({ "id": 7, "tipo_usuario": "vendedor" }));
        let err = authorize_self_or_admin(&c, 8).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn admin_may_act_on_any_record() {
        let c = claim(json!({ "id": 1, "rol": "Admin" }));
        assert!(authorize_self_or_admin(&c, 8).unwrap());
    }

    #[test]
    fn claim_without_subject_is_denied() {
        let c = claim(json!({ "correo": "a@tienda.cl" }));
        assert!(authorize_self_or_admin(&c, 1).is_err());
    }
}
