/*
 * Responsibility
 * - productos の request/response DTO
 * - 数値・フラグは JSON 数値でもフォーム由来の文字列でも受け付ける
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repos::product_repo::{NewProduct, ProductChanges, ProductRow};

/// A number sent either as JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// `None` for blank input, `Err` for text that is not a number.
    fn to_f64(&self, field: &'static str) -> Result<Option<f64>, &'static str> {
        match self {
            Numeric::Number(n) => Ok(Some(*n)),
            Numeric::Text(s) if s.trim().is_empty() => Ok(None),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or(field),
        }
    }

    fn to_i32(&self, field: &'static str) -> Result<Option<i32>, &'static str> {
        match self.to_f64(field)? {
            None => Ok(None),
            Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
                Ok(Some(n as i32))
            }
            Some(_) => Err(field),
        }
    }
}

fn number(v: &Option<Numeric>, field: &'static str) -> Result<Option<f64>, &'static str> {
    v.as_ref().map(|n| n.to_f64(field)).transpose().map(Option::flatten)
}

fn integer(v: &Option<Numeric>, field: &'static str) -> Result<Option<i32>, &'static str> {
    v.as_ref().map(|n| n.to_i32(field)).transpose().map(Option::flatten)
}

/// `true`, `"true"`, `1` and `"1"` switch the offer on; anything else is off.
fn offer_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

fn given(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub precio: Option<Numeric>,
    pub precio_oferta: Option<Numeric>,
    pub en_oferta: Option<Value>,
    pub stock: Option<Numeric>,
    pub stock_critico: Option<Numeric>,
    pub imagen_url: Option<String>,
    /// Image URL under the form field name.
    pub imagen: Option<String>,
}

impl ProductRequest {
    fn image(&self) -> Option<&str> {
        given(&self.imagen).or_else(|| given(&self.imagen_url))
    }

    pub fn to_new_product(&self) -> Result<NewProduct<'_>, &'static str> {
        Ok(NewProduct {
            codigo: given(&self.codigo),
            nombre: given(&self.nombre),
            descripcion: given(&self.descripcion),
            categoria: given(&self.categoria),
            precio: number(&self.precio, "precio inválido")?.unwrap_or(0.0),
            precio_oferta: number(&self.precio_oferta, "precio_oferta inválido")?,
            en_oferta: self.en_oferta.as_ref().is_some_and(offer_flag),
            stock: integer(&self.stock, "stock inválido")?.unwrap_or(0),
            stock_critico: integer(&self.stock_critico, "stock_critico inválido")?.unwrap_or(0),
            imagen_url: self.image(),
        })
    }

    pub fn to_changes(&self) -> Result<ProductChanges<'_>, &'static str> {
        let changes = ProductChanges {
            codigo: given(&self.codigo),
            nombre: given(&self.nombre),
            descripcion: given(&self.descripcion),
            categoria: given(&self.categoria),
            precio: number(&self.precio, "precio inválido")?,
            precio_oferta: number(&self.precio_oferta, "precio_oferta inválido")?,
            en_oferta: self.en_oferta.as_ref().map(offer_flag),
            stock: integer(&self.stock, "stock inválido")?,
            stock_critico: integer(&self.stock_critico, "stock_critico inválido")?,
            imagen_url: self.image(),
        };

        let empty = changes.codigo.is_none()
            && changes.nombre.is_none()
            && changes.descripcion.is_none()
            && changes.categoria.is_none()
            && changes.precio.is_none()
            && changes.precio_oferta.is_none()
            && changes.en_oferta.is_none()
            && changes.stock.is_none()
            && changes.stock_critico.is_none()
            && changes.imagen_url.is_none();
        if empty {
            return Err("No hay campos para actualizar");
        }

        Ok(changes)
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub precio: Option<f64>,
    pub precio_oferta: Option<f64>,
    pub en_oferta: Option<bool>,
    pub stock: Option<i32>,
    pub stock_critico: Option<i32>,
    pub imagen_url: Option<String>,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            codigo: row.codigo,
            nombre: row.nombre,
            descripcion: row.descripcion,
            categoria: row.categoria,
            precio: row.precio,
            precio_oferta: row.precio_oferta,
            en_oferta: row.en_oferta,
            stock: row.stock,
            stock_critico: row.stock_critico,
            imagen_url: row.imagen_url,
        }
    }
}
