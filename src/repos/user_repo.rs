/*
 * Responsibility
 * - usuario テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD + 購入履歴 (historial JSONB) の読み書きを提供
 * - 購入追加は Transaction 内で行ロック (FOR UPDATE) して読み書きする
 * - password は SELECT / RETURNING に含めない
 */
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
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
    pub historial: Option<Value>,
}

#[derive(Debug)]
pub struct NewUser<'a> {
    pub run: Option<&'a str>,
    pub nombre: Option<&'a str>,
    pub apellidos: Option<&'a str>,
    pub correo: &'a str,
    pub password: &'a str,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub tipo_usuario: &'a str,
    pub direccion: Option<&'a str>,
    pub region: Option<&'a str>,
    pub comuna: Option<&'a str>,
    pub departamento: Option<&'a str>,
    pub indicacion: Option<&'a str>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub run: Option<&'a str>,
    pub nombre: Option<&'a str>,
    pub apellidos: Option<&'a str>,
    pub correo: Option<&'a str>,
    pub password: Option<&'a str>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub tipo_usuario: Option<&'a str>,
    pub direccion: Option<&'a str>,
    pub region: Option<&'a str>,
    pub comuna: Option<&'a str>,
    pub departamento: Option<&'a str>,
    pub indicacion: Option<&'a str>,
}

pub async fn create(db: &PgPool, user: &NewUser<'_>) -> Result<UserRow, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO usuario
            (run, nombre, apellidos, correo, password, fecha_nacimiento, tipo_usuario,
             direccion, region, comuna, departamento, indicacion)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, run, nombre, apellidos, correo, fecha_nacimiento, tipo_usuario,
                  direccion, region, comuna, departamento, indicacion, historial
        "#,
    )
    .bind(user.run)
    .bind(user.nombre)
    .bind(user.apellidos)
    .bind(user.correo)
    .bind(user.password)
    .bind(user.fecha_nacimiento)
    .bind(user.tipo_usuario)
    .bind(user.direccion)
    .bind(user.region)
    .bind(user.comuna)
    .bind(user.departamento)
    .bind(user.indicacion)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn find_by_credentials(
    db: &PgPool,
    correo: &str,
    password: &str,
) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, run, nombre, apellidos, correo, fecha_nacimiento, tipo_usuario,
               direccion, region, comuna, departamento, indicacion, historial
        FROM usuario
        WHERE correo = $1 AND password = $2
        "#,
    )
    .bind(correo)
    .bind(password)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<UserRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, run, nombre, apellidos, correo, fecha_nacimiento, tipo_usuario,
               direccion, region, comuna, departamento, indicacion, historial
        FROM usuario
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, id: i32) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, run, nombre, apellidos, correo, fecha_nacimiento, tipo_usuario,
               direccion, region, comuna, departamento, indicacion, historial
        FROM usuario
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: i32,
    changes: &UserChanges<'_>,
) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE usuario
        SET
            run = COALESCE($2, run),
            nombre = COALESCE($3, nombre),
            apellidos = COALESCE($4, apellidos),
            correo = COALESCE($5, correo),
            password = COALESCE($6, password),
            fecha_nacimiento = COALESCE($7, fecha_nacimiento),
            tipo_usuario = COALESCE($8, tipo_usuario),
            direccion = COALESCE($9, direccion),
            region = COALESCE($10, region),
            comuna = COALESCE($11, comuna),
            departamento = COALESCE($12, departamento),
            indicacion = COALESCE($13, indicacion)
        WHERE id = $1
        RETURNING id, run, nombre, apellidos, correo, fecha_nacimiento, tipo_usuario,
                  direccion, region, comuna, departamento, indicacion, historial
        "#,
    )
    .bind(id)
    .bind(changes.run)
    .bind(changes.nombre)
    .bind(changes.apellidos)
    .bind(changes.correo)
    .bind(changes.password)
    .bind(changes.fecha_nacimiento)
    .bind(changes.tipo_usuario)
    .bind(changes.direccion)
    .bind(changes.region)
    .bind(changes.comuna)
    .bind(changes.departamento)
    .bind(changes.indicacion)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM usuario
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Purchase history of a user. Outer `None`: no such user.
pub async fn get_history(db: &PgPool, id: i32) -> Result<Option<Vec<Value>>, RepoError> {
    let row: Option<(Option<Value>,)> = sqlx::query_as(
        r#"
        SELECT historial
        FROM usuario
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(historial,)| history_items(historial)))
}

/// Same as `get_history`, but locks the row until `tx` ends so that
/// concurrent appends are applied one after the other.
pub async fn lock_history(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> Result<Option<Vec<Value>>, RepoError> {
    let row: Option<(Option<Value>,)> = sqlx::query_as(
        r#"
        SELECT historial
        FROM usuario
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|(historial,)| history_items(historial)))
}

pub async fn set_history(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    history: &[Value],
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE usuario
        SET historial = $1
        WHERE id = $2
        "#,
    )
    .bind(sqlx::types::Json(history))
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn history_items(historial: Option<Value>) -> Vec<Value> {
    match historial {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

pub async fn clear_history(db: &PgPool, id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE usuario
        SET historial = '[]'::jsonb
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::services::purchase_history::{self, AppendOutcome};

    // Needs a database with the usuario table:
    // DATABASE_URL=postgres://... cargo test -- --ignored
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore]
    async fn concurrent_appends_keep_every_purchase() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = PgPoolOptions::new().max_connections(8).connect(&url).await.unwrap();

        let correo = format!("historial-{}@tienda.cl", Utc::now().timestamp_nanos_opt().unwrap());
        let user = create(
            &db,
            &NewUser {
                run: None,
                nombre: None,
                apellidos: None,
                correo: &correo,
                password: "x",
                fecha_nacimiento: None,
                tipo_usuario: "cliente",
                direccion: None,
                region: None,
                comuna: None,
                departamento: None,
                indicacion: None,
            },
        )
        .await
        .unwrap();

        let tasks: Vec<_> = (1..=5)
            .map(|total| {
                let db = db.clone();
                let id = user.id;
                tokio::spawn(async move {
                    let mut tx = db.begin().await.unwrap();
                    let history = lock_history(&mut tx, id).await.unwrap().unwrap();
                    let purchase = json!({ "total": total * 1000 });
                    let AppendOutcome::Added(updated) =
                        purchase_history::append(&history, purchase, Utc::now())
                    else {
                        panic!("distinct totals are never duplicates");
                    };
                    set_history(&mut tx, id, &updated).await.unwrap();
                    tx.commit().await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let history = get_history(&db, user.id).await.unwrap().unwrap();
        delete(&db, user.id).await.unwrap();

        let mut totals: Vec<i64> = history.iter().filter_map(|p| p["total"].as_i64()).collect();
        totals.sort();
        assert_eq!(totals, vec![1000, 2000, 3000, 4000, 5000]);
    }
}
