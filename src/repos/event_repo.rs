/*
 * Responsibility
 * - eventos テーブル向け SQLx 操作
 * - 列名はクォートなしで作成されているため小文字 (usuarioid, duracionhoras ...)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i32,
    #[sqlx(rename = "usuarioid")]
    pub usuario_id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub direccion: String,
    /// Epoch milliseconds, as sent by the mobile client.
    pub fecha: i64,
    #[sqlx(rename = "duracionhoras")]
    pub duracion_horas: i32,
    #[sqlx(rename = "imagenuri")]
    pub imagen_uri: Option<String>,
    #[sqlx(rename = "creadornombre")]
    pub creador_nombre: String,
    #[sqlx(rename = "isguardado")]
    pub is_guardado: Option<bool>,
}

#[derive(Debug)]
pub struct NewEvent<'a> {
    pub usuario_id: i32,
    pub nombre: &'a str,
    pub descripcion: &'a str,
    pub direccion: &'a str,
    pub fecha: i64,
    pub duracion_horas: i32,
    pub imagen_uri: Option<&'a str>,
    pub creador_nombre: &'a str,
}

pub async fn create(db: &PgPool, event: &NewEvent<'_>) -> Result<EventRow, RepoError> {
    let row = sqlx::query_as::<_, EventRow>(
        r#"
        INSERT INTO eventos
            (usuarioid, nombre, descripcion, direccion, fecha,
             duracionhoras, imagenuri, creadornombre)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, usuarioid, nombre, descripcion, direccion, fecha,
                  duracionhoras, imagenuri, creadornombre, isguardado
        "#,
    )
    .bind(event.usuario_id)
    .bind(event.nombre)
    .bind(event.descripcion)
    .bind(event.direccion)
    .bind(event.fecha)
    .bind(event.duracion_horas)
    .bind(event.imagen_uri)
    .bind(event.creador_nombre)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<EventRow>, RepoError> {
    let rows = sqlx::query_as::<_, EventRow>(
        r#"
        SELECT id, usuarioid, nombre, descripcion, direccion, fecha,
               duracionhoras, imagenuri, creadornombre, isguardado
        FROM eventos
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}
