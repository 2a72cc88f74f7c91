use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service info + health
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Analysis
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/business-types", get(handlers::business_types))
        // Static guides
        .route("/api/guides", get(handlers::list_guides))
        .route("/api/guides/{section}", get(handlers::guide_by_section))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
