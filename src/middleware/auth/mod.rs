/*
 * Responsibility
 * - 認証 (access: TokenVerifier) と認可 (role: RoleGate) の axum middleware
 * - 判定ロジック本体は services::auth、ここは Router への配線とログだけ
 */
pub mod access;
pub mod role;

#[cfg(test)]
mod tests;
