/*
 * Responsibility
 * - producto テーブル向け SQLx 操作
 * - NUMERIC 列 (precio, precio_oferta) は float8 にキャストして読む
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
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

#[derive(Debug)]
pub struct NewProduct<'a> {
    pub codigo: Option<&'a str>,
    pub nombre: Option<&'a str>,
    pub descripcion: Option<&'a str>,
    pub categoria: Option<&'a str>,
    pub precio: f64,
    pub precio_oferta: Option<f64>,
    pub en_oferta: bool,
    pub stock: i32,
    pub stock_critico: i32,
    pub imagen_url: Option<&'a str>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProductChanges<'a> {
    pub codigo: Option<&'a str>,
    pub nombre: Option<&'a str>,
    pub descripcion: Option<&'a str>,
    pub categoria: Option<&'a str>,
    pub precio: Option<f64>,
    pub precio_oferta: Option<f64>,
    pub en_oferta: Option<bool>,
    pub stock: Option<i32>,
    pub stock_critico: Option<i32>,
    pub imagen_url: Option<&'a str>,
}

pub async fn list(db: &PgPool) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, codigo, nombre, descripcion, categoria,
               precio::float8 AS precio, precio_oferta::float8 AS precio_oferta,
               en_oferta, stock, stock_critico, imagen_url
        FROM producto
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, id: i32) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, codigo, nombre, descripcion, categoria,
               precio::float8 AS precio, precio_oferta::float8 AS precio_oferta,
               en_oferta, stock, stock_critico, imagen_url
        FROM producto
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, product: &NewProduct<'_>) -> Result<ProductRow, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO producto
            (codigo, nombre, descripcion, categoria, precio, precio_oferta,
             en_oferta, stock, stock_critico, imagen_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, codigo, nombre, descripcion, categoria,
                  precio::float8 AS precio, precio_oferta::float8 AS precio_oferta,
                  en_oferta, stock, stock_critico, imagen_url
        "#,
    )
    .bind(product.codigo)
    .bind(product.nombre)
    .bind(product.descripcion)
    .bind(product.categoria)
    .bind(product.precio)
    .bind(product.precio_oferta)
    .bind(product.en_oferta)
    .bind(product.stock)
    .bind(product.stock_critico)
    .bind(product.imagen_url)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: i32,
    changes: &ProductChanges<'_>,
) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE producto
        SET
            codigo = COALESCE($2, codigo),
            nombre = COALESCE($3, nombre),
            descripcion = COALESCE($4, descripcion),
            categoria = COALESCE($5, categoria),
            precio = COALESCE($6::numeric, precio),
            precio_oferta = COALESCE($7::numeric, precio_oferta),
            en_oferta = COALESCE($8, en_oferta),
            stock = COALESCE($9, stock),
            stock_critico = COALESCE($10, stock_critico),
            imagen_url = COALESCE($11, imagen_url)
        WHERE id = $1
        RETURNING id, codigo, nombre, descripcion, categoria,
                  precio::float8 AS precio, precio_oferta::float8 AS precio_oferta,
                  en_oferta, stock, stock_critico, imagen_url
        "#,
    )
    .bind(id)
    .bind(changes.codigo)
    .bind(changes.nombre)
    .bind(changes.descripcion)
    .bind(changes.categoria)
    .bind(changes.precio)
    .bind(changes.precio_oferta)
    .bind(changes.en_oferta)
    .bind(changes.stock)
    .bind(changes.stock_critico)
    .bind(changes.imagen_url)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM producto
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Detach products from a category that is being removed.
pub async fn clear_category(db: &PgPool, categoria: &str) -> Result<u64, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE producto
        SET categoria = NULL
        WHERE categoria = $1
        "#,
    )
    .bind(categoria)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
