/*
 * Responsibility
 * - boleta テーブル向け SQLx 操作
 * - numero_compra は UNIQUE、省略時は列の DEFAULT (sequence) が採番
 */
use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ReceiptRow {
    pub id: i32,
    pub numero_compra: Option<i32>,
    pub fecha: Option<NaiveDateTime>,
    pub comprador: Option<Value>,
    pub productos: Option<Value>,
    pub total: Option<f64>,
    pub user_id: Option<i32>,
}

#[derive(Debug)]
pub struct NewReceipt<'a> {
    pub numero_compra: Option<i32>,
    pub fecha: NaiveDateTime,
    pub comprador: &'a Value,
    pub productos: &'a Value,
    pub total: f64,
    pub user_id: Option<i32>,
}

pub async fn create(db: &PgPool, receipt: &NewReceipt<'_>) -> Result<ReceiptRow, RepoError> {
    // Without an explicit number the column default (sequence) assigns one.
    let query = match receipt.numero_compra {
        Some(numero) => sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO boleta (numero_compra, fecha, comprador, productos, total, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, numero_compra, fecha, comprador, productos,
                      total::float8 AS total, user_id
            "#,
        )
        .bind(numero),
        None => sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO boleta (fecha, comprador, productos, total, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, numero_compra, fecha, comprador, productos,
                      total::float8 AS total, user_id
            "#,
        ),
    };

    let row = query
        .bind(receipt.fecha)
        .bind(receipt.comprador)
        .bind(receipt.productos)
        .bind(receipt.total)
        .bind(receipt.user_id)
        .fetch_one(db)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get_by_number(db: &PgPool, numero_compra: i32) -> Result<Option<ReceiptRow>, RepoError> {
    let row = sqlx::query_as::<_, ReceiptRow>(
        r#"
        SELECT id, numero_compra, fecha, comprador, productos,
               total::float8 AS total, user_id
        FROM boleta
        WHERE numero_compra = $1
        "#,
    )
    .bind(numero_compra)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: i32) -> Result<Vec<ReceiptRow>, RepoError> {
    let rows = sqlx::query_as::<_, ReceiptRow>(
        r#"
        SELECT id, numero_compra, fecha, comprador, productos,
               total::float8 AS total, user_id
        FROM boleta
        WHERE user_id = $1
        ORDER BY fecha DESC NULLS LAST, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn delete_by_user(db: &PgPool, user_id: i32) -> Result<u64, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM boleta
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
