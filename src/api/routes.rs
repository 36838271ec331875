use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{movies, recommendations, system, watchlist};
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
///
/// `max_upload_bytes` caps request bodies, which bounds the in-memory image
/// upload of a recommendation request.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(
            // Outermost first: the request id must exist before the trace span.
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health_check))
        .route("/classifier/status", get(system::classifier_status))
        // Movies
        .route("/movies/recommend", post(recommendations::recommend))
        .route("/movies/popular", get(movies::popular))
        .route("/movies/genres", get(movies::genres))
        .route("/movies/discover", get(movies::discover))
        .route("/movies/:id", get(movies::details))
        // Watchlist
        .route("/watchlist", get(watchlist::list).post(watchlist::add))
        .route("/watchlist/:movie_id", delete(watchlist::remove))
        .route("/watchlist/check/:movie_id", get(watchlist::check))
}
