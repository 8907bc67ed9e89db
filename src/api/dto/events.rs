/*
 * Responsibility
 * - eventos の request/response DTO (モバイルクライアントの camelCase)
 */
use serde::{Deserialize, Serialize};

use crate::repos::event_repo::{EventRow, NewEvent};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub usuario_id: Option<i32>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub direccion: Option<String>,
    pub fecha: Option<i64>,
    pub duracion_horas: Option<i32>,
    pub imagen_uri: Option<String>,
    pub creador_nombre: Option<String>,
}

impl CreateEventRequest {
    /// `owner` is used when the body does not name one.
    pub fn to_new_event(&self, owner: Option<i32>) -> Result<NewEvent<'_>, &'static str> {
        let (
            Some(usuario_id),
            Some(nombre),
            Some(descripcion),
            Some(direccion),
            Some(fecha),
            Some(duracion_horas),
            Some(creador_nombre),
        ) = (
            self.usuario_id.or(owner),
            self.nombre.as_deref(),
            self.descripcion.as_deref(),
            self.direccion.as_deref(),
            self.fecha,
            self.duracion_horas,
            self.creador_nombre.as_deref(),
        )
        else {
            return Err("Campos requeridos: nombre, descripcion, direccion, fecha, duracionHoras, creadorNombre");
        };

        Ok(NewEvent {
            usuario_id,
            nombre,
            descripcion,
            direccion,
            fecha,
            duracion_horas,
            imagen_uri: self.imagen_uri.as_deref().filter(|s| !s.is_empty()),
            creador_nombre,
        })
    }
}

/// Keys follow the stored (lowercased) column names.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i32,
    #[serde(rename = "usuarioid")]
    pub usuario_id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub direccion: String,
    pub fecha: i64,
    #[serde(rename = "duracionhoras")]
    pub duracion_horas: i32,
    #[serde(rename = "imagenuri")]
    pub imagen_uri: Option<String>,
    #[serde(rename = "creadornombre")]
    pub creador_nombre: String,
    #[serde(rename = "isguardado")]
    pub is_guardado: Option<bool>,
}

impl From<EventRow> for EventResponse {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            usuario_id: row.usuario_id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            direccion: row.direccion,
            fecha: row.fecha,
            duracion_horas: row.duracion_horas,
            imagen_uri: row.imagen_uri,
            creador_nombre: row.creador_nombre,
            is_guardado: row.is_guardado,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "nombre": "Feria gamer",
            "descripcion": "Torneo y venta",
            "direccion": "Av. Siempre Viva 123",
            "fecha": 1_740_830_400_000_i64,
            "duracionHoras": 4,
            "creadorNombre": "Ana",
        })
    }

    #[test]
    fn owner_falls_back_to_caller() {
        let req: CreateEventRequest = serde_json::from_value(body()).unwrap();
        let event = req.to_new_event(Some(9)).unwrap();
        assert_eq!(event.usuario_id, 9);
        assert_eq!(event.duracion_horas, 4);
        assert_eq!(event.imagen_uri, None);
    }

    #[test]
    fn explicit_owner_wins() {
        let mut v = body();
        v["usuarioId"] = json!(3);
        let req: CreateEventRequest = serde_json::from_value(v).unwrap();
        assert_eq!(req.to_new_event(Some(9)).unwrap().usuario_id, 3);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut v = body();
        v.as_object_mut().unwrap().remove("direccion");
        let req: CreateEventRequest = serde_json::from_value(v).unwrap();
        assert!(req.to_new_event(Some(9)).is_err());

        let req: CreateEventRequest = serde_json::from_value(body()).unwrap();
        assert!(req.to_new_event(None).is_err());
    }
}
