/*
 * Responsibility
 * - usuarios の request/response DTO
 * - validation (形式チェック) は validate() / to_*() に持たせる
 * - response は password を含まず、historial を historialCompras としても返す
 * - 公開 register では tipo_usuario を受け付けない (常に cliente、昇格は admin の PUT のみ)
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repos::user_repo::{NewUser, UserChanges, UserRow};

const DEFAULT_TIPO_USUARIO: &str = "cliente";

/// Empty strings from form-backed clients mean "not given".
fn given(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn parse_date(v: &Option<String>) -> Result<Option<NaiveDate>, &'static str> {
    given(v)
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| "fechaNacimiento debe tener formato AAAA-MM-DD")
}

/// A `tipoUsuario` in the body is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub run: Option<String>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub correo: Option<String>,
    #[serde(alias = "contrasena")]
    pub password: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub direccion: Option<String>,
    pub region: Option<String>,
    pub comuna: Option<String>,
    pub departamento: Option<String>,
    pub indicacion: Option<String>,
}

impl RegisterRequest {
    pub fn to_new_user(&self) -> Result<NewUser<'_>, &'static str> {
        let (Some(correo), Some(password)) = (given(&self.correo), given(&self.password)) else {
            return Err("Correo y password requeridos");
        };

        Ok(NewUser {
            run: given(&self.run),
            nombre: given(&self.nombre),
            apellidos: given(&self.apellidos),
            correo,
            password,
            fecha_nacimiento: parse_date(&self.fecha_nacimiento)?,
            tipo_usuario: DEFAULT_TIPO_USUARIO,
            direccion: given(&self.direccion),
            region: given(&self.region),
            comuna: given(&self.comuna),
            departamento: given(&self.departamento),
            indicacion: given(&self.indicacion),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub correo: Option<String>,
    #[serde(alias = "contrasena")]
    pub password: Option<String>,
}

/// Column names are accepted as-is, plus the camelCase names the register form uses.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub run: Option<String>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub correo: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "fechaNacimiento")]
    pub fecha_nacimiento: Option<String>,
    #[serde(alias = "tipoUsuario")]
    pub tipo_usuario: Option<String>,
    pub direccion: Option<String>,
    pub region: Option<String>,
    pub comuna: Option<String>,
    pub departamento: Option<String>,
    pub indicacion: Option<String>,
}

impl UpdateUserRequest {
    pub fn to_changes(&self) -> Result<UserChanges<'_>, &'static str> {
        let changes = UserChanges {
            run: given(&self.run),
            nombre: given(&self.nombre),
            apellidos: given(&self.apellidos),
            correo: given(&self.correo),
            password: given(&self.password),
            fecha_nacimiento: parse_date(&self.fecha_nacimiento)?,
            tipo_usuario: given(&self.tipo_usuario),
            direccion: given(&self.direccion),
            region: given(&self.region),
            comuna: given(&self.comuna),
            departamento: given(&self.departamento),
            indicacion: given(&self.indicacion),
        };

        let empty = changes.run.is_none()
            && changes.nombre.is_none()
            && changes.apellidos.is_none()
            && changes.correo.is_none()
            && changes.password.is_none()
            && changes.fecha_nacimiento.is_none()
            && changes.tipo_usuario.is_none()
            && changes.direccion.is_none()
            && changes.region.is_none()
            && changes.comuna.is_none()
            && changes.departamento.is_none()
            && changes.indicacion.is_none();
        if empty {
            return Err("No hay campos para actualizar");
        }

        Ok(changes)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub run: Option<String>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub correo: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub tipo_usuario: Option<String>,
    pub direccion: Option<String>,
    pub region: Option<String>,
    pub comuna: Option<String>,
    pub departamento: Option<String>,
    pub indicacion: Option<String>,
    pub historial: Value,
    #[serde(rename = "historialCompras")]
    pub historial_compras: Value,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        let historial = row.historial.unwrap_or_else(|| Value::Array(Vec::new()));
        Self {
            id: row.id,
            run: row.run,
            nombre: row.nombre,
            apellidos: row.apellidos,
            correo: row.correo,
            fecha_nacimiento: row.fecha_nacimiento,
            tipo_usuario: row.tipo_usuario,
            direccion: row.direccion,
            region: row.region,
            comuna: row.comuna,
            departamento: row.departamento,
            indicacion: row.indicacion,
            historial_compras: historial.clone(),
            historial,
        }
    }
}

/// Claim carried by session tokens (nested under `usuario`).
#[derive(Debug, Serialize)]
pub struct SessionUser<'a> {
    pub id: i32,
    pub correo: &'a str,
    pub nombre: Option<&'a str>,
    pub tipo_usuario: &'a str,
}

impl<'a> From<&'a UserRow> for SessionUser<'a> {
    fn from(row: &'a UserRow) -> Self {
        Self {
            id: row.id,
            correo: &row.correo,
            nombre: row.nombre.as_deref(),
            tipo_usuario: row.tipo_usuario.as_deref().unwrap_or(DEFAULT_TIPO_USUARIO),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
