//! CORS policy for the browser storefront.
//!
//! Policy:
//! - Development: any origin, WITHOUT credentials.
//! - Production: allowlist origins from Config (`CORS_ALLOWED_ORIGINS`), WITHOUT credentials.
//!   An empty allowlist allows no cross-origin callers.
//! - Methods are the ones the services actually route (no PATCH).

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env.is_production(), &config.cors_allowed_origins))
}

fn layer(production: bool, allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if production {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            // `AllowOrigin::list` panics on a wildcard entry
            .filter(|s| s.as_str() != "*")
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        AllowOrigin::list(allowed)
    } else {
        AllowOrigin::from(Any)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn preflight(layer: CorsLayer, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/productos", get(|| async { "ok" }))
            .layer(layer);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/productos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn production_allows_only_listed_origins() {
        let origins = ["*".to_string(), "https://tienda.cl".to_string()];

        let allowed = preflight(layer(true, &origins), "https://tienda.cl").await;
        assert_eq!(allowed.as_deref(), Some("https://tienda.cl"));

        // "*" in the list does not open the policy up
        let other = preflight(layer(true, &origins), "https://otro.cl").await;
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn production_with_empty_list_allows_nobody() {
        assert_eq!(preflight(layer(true, &[]), "https://tienda.cl").await, None);
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let allowed = preflight(layer(false, &[]), "http://localhost:5173").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }
}
