/*
 * Responsibility
 * - boletas の request/response DTO
 * - productos は空でない配列であること
 */
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::repos::receipt_repo::ReceiptRow;

#[derive(Debug, Default, Deserialize)]
pub struct CreateReceiptRequest {
    pub numero_compra: Option<i32>,
    pub fecha: Option<DateTime<Utc>>,
    pub comprador: Option<Value>,
    pub productos: Option<Value>,
    pub total: Option<f64>,
    pub user_id: Option<i32>,
}

/// Checked receipt ready to be stored.
#[derive(Debug)]
pub struct ReceiptInput<'a> {
    pub numero_compra: Option<i32>,
    pub fecha: NaiveDateTime,
    pub comprador: Value,
    pub productos: &'a Value,
    pub total: f64,
    pub user_id: Option<i32>,
}

impl CreateReceiptRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ReceiptInput<'_>, &'static str> {
        let productos = match &self.productos {
            Some(v @ Value::Array(items)) if !items.is_empty() => v,
            _ => return Err("Productos requeridos"),
        };

        Ok(ReceiptInput {
            // 0 means "assign one".
            numero_compra: self.numero_compra.filter(|n| *n != 0),
            fecha: self.fecha.unwrap_or(now).naive_utc(),
            comprador: self
                .comprador
                .clone()
                .filter(|c| !c.is_null())
                .unwrap_or_else(|| Value::Object(Map::new())),
            productos,
            total: self.total.unwrap_or(0.0),
            user_id: self.user_id.filter(|id| *id != 0),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub id: i32,
    pub numero_compra: Option<i32>,
    pub fecha: Option<NaiveDateTime>,
    pub comprador: Option<Value>,
    pub productos: Option<Value>,
    pub total: Option<f64>,
    pub user_id: Option<i32>,
}

impl From<ReceiptRow> for ReceiptResponse {
    fn from(row: ReceiptRow) -> Self {
        Self {
            id: row.id,
            numero_compra: row.numero_compra,
            fecha: row.fecha,
            comprador: row.comprador,
            productos: row.productos,
            total: row.total,
            user_id: row.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn productos_must_be_a_non_empty_array() {
        for productos in [None, Some(json!([])), Some(json!({"id": 1})), Some(json!("x"))] {
            let req = CreateReceiptRequest { productos, ..Default::default() };
            assert_eq!(req.validate(now()).unwrap_err(), "Productos requeridos");
        }
    }

    #[test]
    fn defaults_are_filled_in() {
        let req = CreateReceiptRequest {
            productos: Some(json!([{ "id": 1, "cantidad": 2 }])),
            ..Default::default()
        };
        let input = req.validate(now()).unwrap();
        assert_eq!(input.numero_compra, None);
        assert_eq!(input.fecha, now().naive_utc());
        assert_eq!(input.comprador, json!({}));
        assert_eq!(input.total, 0.0);
        assert_eq!(input.user_id, None);
    }

    #[test]
    fn given_values_are_kept() {
        let req: CreateReceiptRequest = serde_json::from_value(json!({
            "numero_compra": 42,
            "fecha": "2025-02-10T08:30:00Z",
            "comprador": { "nombre": "Ana" },
            "productos": [{ "id": 3 }],
            "total": 15990,
            "user_id": 7,
        }))
        .unwrap();
        let input = req.validate(now()).unwrap();
        assert_eq!(input.numero_compra, Some(42));
        assert_eq!(input.fecha.to_string(), "2025-02-10 08:30:00");
        assert_eq!(input.comprador["nombre"], "Ana");
        assert_eq!(input.total, 15990.0);
        assert_eq!(input.user_id, Some(7));
    }
}
