use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// Single numeric id from the route (`/usuarios/{id}`, `/boletas/numero/{numero}`, ...).
/// A non-numeric segment is a 400 with the usual JSON body.
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "path id rejected");
                AppError::bad_request("Id inválido")
            })?;

        Ok(Self(id))
    }
}
