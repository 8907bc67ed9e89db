/*
 * Responsibility
 * - categorias の request/response DTO
 */
use serde::{Deserialize, Serialize};

use crate::repos::category_repo::CategoryRow;

pub const DEFAULT_CATEGORIES: [&str; 4] = ["Electrónica", "Ropa", "Hogar", "Gamer"];

#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    pub nombre: Option<String>,
}

impl CategoryRequest {
    /// Trimmed, non-blank name.
    pub fn nombre(&self) -> Result<&str, &'static str> {
        self.nombre
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("Nombre de categoría requerido")
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub nombre: String,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self { id: row.id, nombre: row.nombre }
    }
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub ok: bool,
    pub categorias: Vec<String>,
}
