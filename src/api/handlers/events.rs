/*
 * Responsibility
 * - /eventos 系 handler
 * - 作成者 (usuarioId) が body に無ければ IdentityClaim の subject を使う
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::events::{CreateEventRequest, EventResponse},
        extractors::{CurrentUser, JsonBody},
    },
    error::AppError,
    repos::event_repo,
    state::AppState,
};

pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    JsonBody(req): JsonBody<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let owner = claim.subject_id().and_then(|id| i32::try_from(id).ok());
    let event = req.to_new_event(owner).map_err(AppError::bad_request)?;

    let row = event_repo::create(&state.db, &event)
        .await
        .map_err(|e| AppError::internal(e, "Error creando evento"))?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let rows = event_repo::list(&state.db)
        .await
        .map_err(|e| AppError::internal(e, "Error al obtener eventos"))?;

    Ok(Json(rows.into_iter().map(EventResponse::from).collect()))
}
