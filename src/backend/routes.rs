//! Backend routes: collection CRUD plus health/version.

use super::handlers::{create, delete as delete_handler, list, read, replace};
use super::MemoryBackend;
use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /version.
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

pub fn entity_routes(backend: MemoryBackend) -> Router {
    Router::new()
        .route("/:collection", get(list).post(create))
        .route(
            "/:collection/:id",
            get(read).put(replace).delete(delete_handler),
        )
        .with_state(backend)
}
