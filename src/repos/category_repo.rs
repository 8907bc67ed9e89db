/*
 * Responsibility
 * - categoria テーブル向け SQLx 操作
 * - nombre は UNIQUE (重複は RepoError::Conflict)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i32,
    pub nombre: String,
}

pub async fn list(db: &PgPool) -> Result<Vec<CategoryRow>, RepoError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, nombre
        FROM categoria
        ORDER BY nombre
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn names(db: &PgPool) -> Result<Vec<String>, RepoError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT nombre
        FROM categoria
        ORDER BY nombre
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(names)
}

pub async fn create(db: &PgPool, nombre: &str) -> Result<CategoryRow, RepoError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categoria (nombre)
        VALUES ($1)
        RETURNING id, nombre
        "#,
    )
    .bind(nombre)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Insert each name unless it already exists.
pub async fn insert_missing(db: &PgPool, nombres: &[&str]) -> Result<(), RepoError> {
    let mut tx = db.begin().await?;

    for nombre in nombres {
        sqlx::query(
            r#"
            INSERT INTO categoria (nombre)
            VALUES ($1)
            ON CONFLICT (nombre) DO NOTHING
            "#,
        )
        .bind(*nombre)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn get_name(db: &PgPool, id: i32) -> Result<Option<String>, RepoError> {
    let nombre = sqlx::query_scalar::<_, String>(
        r#"
        SELECT nombre
        FROM categoria
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(nombre)
}

pub async fn rename(db: &PgPool, id: i32, nombre: &str) -> Result<Option<CategoryRow>, RepoError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        UPDATE categoria
        SET nombre = $1
        WHERE id = $2
        RETURNING id, nombre
        "#,
    )
    .bind(nombre)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM categoria
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
