/*
 * Responsibility
 * - テーブルごとの SQLx 操作 (PgPool を受け取る関数群)
 * - エラーは RepoError に寄せる
 */
pub mod category_repo;
pub mod error;
pub mod event_repo;
pub mod product_repo;
pub mod receipt_repo;
pub mod user_repo;
