//! access token 検証 → IdentityClaim を extensions に入れる
//!
//! - `Authorization: <scheme> <token>` を受け取り、共有シークレットで署名/exp を検証する
//! - payload を IdentityClaim に正規化して request extensions に格納する
//! - 失敗時はここでリクエストを打ち切る (401 / 内部障害は 500)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::{AuthError, TokenVerifier};

/// 認証が必要な route 群に verifier を掛ける。
///
/// `route_layer` なので、一致しなかったパスは 404 のまま (401 にはならない)。
/// RoleGate を併用する場合は、こちらを最後に apply して一番外側に置くこと。
///
/// 例：
/// ```ignore
/// let admin = Router::new().route("/productos", post(create_product));
/// let admin = middleware::auth::role::apply(admin, RoleGate::new(["admin"]));
/// let admin = middleware::auth::access::apply(admin, state.verifier.clone());
/// ```
pub fn apply<S>(router: Router<S>, verifier: Arc<TokenVerifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(verifier, verify_token))
}

async fn verify_token(
    State(verifier): State<Arc<TokenVerifier>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claim = match verifier.verify(req.headers()) {
        Ok(claim) => claim,
        Err(err) if err.is_internal() => {
            tracing::error!(error = %err, "access token verification fault");
            return Err(err);
        }
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(err);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claim);

    Ok(next.run(req).await)
}
