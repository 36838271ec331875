use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{CatalogRecord, ExternalId},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    genre: i32,
    page: Option<u32>,
}

fn listing(page: u32, results: Vec<CatalogRecord>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "page": page,
            "results": results,
        }
    }))
}

/// `GET /api/movies/popular`
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Json<Value> {
    let page = params.page.unwrap_or(1).max(1);
    listing(page, state.gateway.get_popular(page).await)
}

/// `GET /api/movies/discover`
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> Json<Value> {
    let page = params.page.unwrap_or(1).max(1);
    listing(page, state.gateway.get_by_genre(params.genre, page).await)
}

/// `GET /api/movies/genres`
pub async fn genres(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": state.gateway.genres().await,
    }))
}

/// `GET /api/movies/:id`
///
/// Serves the stored movie when one exists, otherwise fetches the details from
/// the catalog and stores them first.
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let tmdb_id: ExternalId = id
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {}", id)))?;

    let movie = match state.movies.find_by_external_id(tmdb_id).await? {
        Some(movie) => movie,
        None => {
            let details = state.gateway.details(tmdb_id).await.map_err(|e| {
                tracing::warn!(tmdb_id, error = %e, "Movie details unavailable");
                match e {
                    AppError::NotFound(_) => e,
                    other => AppError::ExternalApi(format!(
                        "Failed to get movie details: {}",
                        other
                    )),
                }
            })?;
            state.movies.upsert(&details).await?
        }
    };

    Ok(Json(json!({
        "success": true,
        "data": movie,
    })))
}
