use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `axum::Json` whose rejection is answered as `{"message": ...}` (400).
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "json body rejected");
                Err(AppError::bad_request(message(&rejection)))
            }
        }
    }
}

fn message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Content-Type debe ser application/json",
        JsonRejection::JsonSyntaxError(_) => "JSON mal formado",
        JsonRejection::JsonDataError(_) => "Campos con tipo inválido",
        _ => "Cuerpo de la petición inválido",
    }
}
