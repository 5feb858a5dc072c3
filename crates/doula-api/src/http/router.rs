//! Axum router configuration with middleware.
//!
//! Middleware: CORS (origins from `[server] cors_origins`) and request tracing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/sessions/{id}/turns",
            get(handlers::session::list_turns).post(handlers::session::append_turn),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/patient/record", post(handlers::record::add_record))
        .route(
            "/doctor/patient/{patient_id}/bp",
            get(handlers::record::blood_pressure),
        )
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `["*"]` (or an empty list) allows any origin; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

/// GET / - Liveness banner.
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "message": "Doula backend is running" }))
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::test_state;

    #[tokio::test]
    async fn root_banner() {
        let axum::Json(body) = root().await;
        assert_eq!(body["message"], "Doula backend is running");
    }

    #[tokio::test]
    async fn health_reports_version() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn router_builds_with_explicit_origins() {
        let mut state = test_state(None).await;
        let mut config = (*state.config).clone();
        config.server.cors_origins = vec![
            "http://localhost:5173".to_string(),
            "not a header\n".to_string(),
        ];
        state.config = std::sync::Arc::new(config);
        let _router = build_router(state);
    }
}
