use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::laboratory::{JsonFileLaboratoryRepository, LaboratoryService};

pub mod laboratories;

/// Shared handler state: the lifecycle service over the file-backed store.
#[derive(Clone)]
pub struct AppState {
    pub laboratories: Arc<LaboratoryService<JsonFileLaboratoryRepository>>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/laboratories",
            get(laboratories::list).post(laboratories::create),
        )
        .route("/laboratories/search", get(laboratories::search))
        .route(
            "/laboratories/:id",
            get(laboratories::get_by_id)
                .put(laboratories::update)
                .delete(laboratories::remove),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
