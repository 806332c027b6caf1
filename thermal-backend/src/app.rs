use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::Extension, Json, Router};
use serde_json::json;
use thermal_config::CorsConfig;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{print, print_jobs, receipts};
use crate::state::AppState;

/// Build the primary axum router with the provided shared application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with_cors(state, None)
}

/// Build the router, optionally wrapped in a CORS layer.
///
/// Layers apply bottom-up: CORS, request tracing, then panic recovery closest
/// to the handlers.
pub fn build_router_with_cors(state: Arc<AppState>, cors: Option<CorsLayer>) -> Router {
    let api = Router::new()
        .route("/receipts", get(receipts::list::list).post(receipts::create::create))
        .route("/receipts/{id}", get(receipts::get::get))
        .route("/print", post(print::print::print))
        .route("/print/test", post(print::test::test_print))
        .route("/print-jobs", get(print_jobs::list::list))
        .route("/print-jobs/pending", get(print_jobs::pending::pending))
        .route("/print-jobs/{id}", get(print_jobs::get::get))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(Extension(state));

    with_service_layers(Router::new().nest("/api", api), cors)
}

/// Wrap `router` in panic recovery, request tracing and, when given, CORS.
///
/// A handler panic becomes a 500 with a generic `{"error": ...}` body; the
/// panic message is only logged.
pub fn with_service_layers(router: Router, cors: Option<CorsLayer>) -> Router {
    let router = router.layer(CatchPanicLayer::custom(handle_panic)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// Build the CORS layer from configuration. Returns `None` when no origin is
/// allowed, in which case no CORS headers are emitted at all.
pub fn build_cors_layer(cfg: &CorsConfig) -> Option<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if cfg.allow_all_origins {
        return Some(layer.allow_origin(AnyOrigin));
    }

    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(layer.allow_origin(origins))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

async fn health_handler() -> impl IntoResponse {
    // Liveness: always return 200 OK when process is alive.
    (StatusCode::OK, "OK")
}

async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    // Readiness: the store answers reads.
    let receipts = state.store.list_receipts().await.len();
    tracing::debug!(receipts, "readiness probe");
    (StatusCode::OK, "OK")
}
