/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: TokenVerifier / RoleGate (route 単位)
 * - cors, http: Router 全体に掛けるもの
 */
pub mod auth;
pub mod cors;
pub mod http;
