use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::{MovieStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{ExternalId, MovieDetails, StoredMovie, WatchlistEntry},
};

#[derive(Default)]
struct Tables {
    movies: HashMap<Uuid, StoredMovie>,
    by_tmdb_id: HashMap<ExternalId, Uuid>,
    watchlist: HashMap<String, Vec<(Uuid, DateTime<Utc>)>>,
}

/// Process-local storage with the same guarantees as [`super::PgStore`]
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for InMemoryStore {
    async fn find_by_external_id(&self, tmdb_id: ExternalId) -> AppResult<Option<StoredMovie>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_tmdb_id
            .get(&tmdb_id)
            .and_then(|id| tables.movies.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredMovie>> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn upsert(&self, details: &MovieDetails) -> AppResult<StoredMovie> {
        let mut tables = self.tables.write().await;
        let tmdb_id = details.record.external_id;

        if let Some(existing) = tables
            .by_tmdb_id
            .get(&tmdb_id)
            .and_then(|id| tables.movies.get(id))
        {
            return Ok(existing.clone());
        }

        let movie = StoredMovie::from_details(details);
        tables.by_tmdb_id.insert(tmdb_id, movie.id);
        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }
}

#[async_trait::async_trait]
impl WatchlistStore for InMemoryStore {
    async fn list(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let tables = self.tables.read().await;
        let Some(items) = tables.watchlist.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<WatchlistEntry> = items
            .iter()
            .filter_map(|(movie_id, added_at)| {
                tables.movies.get(movie_id).map(|movie| WatchlistEntry {
                    movie: movie.clone(),
                    added_at: *added_at,
                })
            })
            .collect();
        // Insertion order breaks ties between identical timestamps.
        entries.reverse();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(entries)
    }

    async fn add(&self, user_id: &str, movie_id: Uuid) -> AppResult<DateTime<Utc>> {
        let mut tables = self.tables.write().await;
        if !tables.movies.contains_key(&movie_id) {
            return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
        }

        let items = tables.watchlist.entry(user_id.to_string()).or_default();
        if items.iter().any(|(id, _)| *id == movie_id) {
            return Err(AppError::Conflict("Movie already in watchlist".to_string()));
        }

        let added_at = Utc::now();
        items.push((movie_id, added_at));
        Ok(added_at)
    }

    async fn remove(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(items) = tables.watchlist.get_mut(user_id) else {
            return Ok(false);
        };

        let before = items.len();
        items.retain(|(id, _)| *id != movie_id);
        Ok(items.len() < before)
    }

    async fn contains(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .watchlist
            .get(user_id)
            .is_some_and(|items| items.iter().any(|(id, _)| *id == movie_id)))
    }
}
