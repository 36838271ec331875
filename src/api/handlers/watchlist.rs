use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::GUEST_USER_ID,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchlistRequest {
    movie_id: Option<String>,
}

fn parse_movie_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {}", raw)))
}

/// `GET /api/watchlist`
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let entries = state.watchlist.list(GUEST_USER_ID).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "totalCount": entries.len(),
            "movies": entries,
        }
    })))
}

/// `POST /api/watchlist`
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToWatchlistRequest>,
) -> AppResult<Json<Value>> {
    let raw = request
        .movie_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Movie ID is required".to_string()))?;
    let movie_id = parse_movie_id(&raw)?;

    let movie = state
        .movies
        .find_by_id(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let added_at = state.watchlist.add(GUEST_USER_ID, movie_id).await?;
    tracing::info!(movie_id = %movie_id, title = %movie.title, "Added to watchlist");

    Ok(Json(json!({
        "success": true,
        "message": "Movie added to watchlist",
        "data": {
            "movie": movie,
            "addedAt": added_at,
        }
    })))
}

/// `DELETE /api/watchlist/:movie_id`
pub async fn remove(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie_id = parse_movie_id(&movie_id)?;

    if !state.watchlist.remove(GUEST_USER_ID, movie_id).await? {
        return Err(AppError::NotFound("Movie not found in watchlist".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Movie removed from watchlist",
    })))
}

/// `GET /api/watchlist/check/:movie_id`
pub async fn check(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie_id = parse_movie_id(&movie_id)?;
    let in_watchlist = state.watchlist.contains(GUEST_USER_ID, movie_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "inWatchlist": in_watchlist },
    })))
}
