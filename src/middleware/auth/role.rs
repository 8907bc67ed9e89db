//! RoleGate: IdentityClaim の role が許可リストに含まれるかを確認する
//!
//! - access::apply (TokenVerifier) の内側で動く前提
//! - 複数重ねた場合は、後から apply したものが先に評価される

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::{AuthError, IdentityClaim, RoleGate};

pub fn apply<S>(router: Router<S>, gate: RoleGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, authorize))
}

async fn authorize(
    State(gate): State<RoleGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if let Err(err) = gate.check(req.extensions().get::<IdentityClaim>()) {
        if err.is_internal() {
            tracing::error!(error = %err, "role gate fault");
        } else {
            tracing::warn!(error = %err, allowed = ?gate.allowed(), "role gate denied request");
        }
        return Err(err);
    }

    Ok(next.run(req).await)
}
