/*
 * Responsibility
 * - HTTP 層の入口 (routes() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
