/*
 * Responsibility
 * - URL 構造を定義
 * - 公開 / 認証必須 / admin 限定 の 3 つの Router を作って merge する
 * - 同じ path でも method ごとに別の Router に置ける (GET /productos は公開, POST は admin)
 * - /auth/register, /auth/login はモバイルクライアント向けの別名
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    middleware::auth::{access, role},
    services::auth::RoleGate,
    state::AppState,
};

use crate::api::handlers::{
    categories::{
        create_category, delete_category, list_categories, list_category_names, seed_categories,
        update_category,
    },
    debug::debug_token,
    events::{create_event, list_events},
    health::health,
    products::{create_product, delete_product, get_product, list_products, update_product},
    receipts::{create_receipt, delete_user_receipts, get_receipt, list_user_receipts},
    users::{
        add_purchase, clear_purchases, delete_user, get_purchases, get_user, list_users, login,
        register, update_user,
    },
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(public())
        .merge(authenticated(state))
        .merge(admin(state))
}

fn public() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/usuarios/register", post(register))
        .route("/usuarios/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/productos", get(list_products))
        .route("/productos/{id}", get(get_product))
        .route("/categorias", get(list_categories).post(create_category))
        .route("/categorias/nombres", get(list_category_names))
        .route("/categorias/seed", post(seed_categories))
        .route("/categorias/{id}", put(update_category).delete(delete_category))
        .route("/boletas", post(create_receipt))
        .route("/boletas/numero/{numero}", get(get_receipt))
        .route("/detalle/{numero}", get(get_receipt))
        .route("/boletas/usuario/{user_id}", get(list_user_receipts))
        .route("/boletas/{user_id}", delete(delete_user_receipts))
        .route("/eventos", get(list_events))
}

fn authenticated(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/debug-token", get(debug_token))
        .route("/usuarios", get(list_users))
        .route(
            "/usuarios/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/usuarios/{id}/compras",
            get(get_purchases).post(add_purchase).delete(clear_purchases),
        )
        .route("/eventos", post(create_event));

    access::apply(router, state.verifier.clone())
}

fn admin(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/productos", post(create_product))
        .route("/productos/{id}", put(update_product).delete(delete_product));

    // gate first, verifier last (outermost)
    let router = role::apply(router, RoleGate::new(["admin"]));
    access::apply(router, state.verifier.clone())
}
