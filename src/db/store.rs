/// Persistence seams for movies and the guest watchlist
///
/// Postgres backs both in production; the in-memory variants keep the same
/// invariants for tests and local runs without a database.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ExternalId, MovieDetails, StoredMovie, WatchlistEntry},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_by_external_id(&self, tmdb_id: ExternalId) -> AppResult<Option<StoredMovie>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredMovie>>;

    /// Find-or-create keyed on `tmdb_id`
    ///
    /// Returns the existing row untouched when the movie is already stored, so
    /// concurrent calls for the same id yield a single row.
    async fn upsert(&self, details: &MovieDetails) -> AppResult<StoredMovie>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Entries for a user, most recently added first
    async fn list(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>>;

    /// Adds a stored movie; `Conflict` when it is already listed
    async fn add(&self, user_id: &str, movie_id: Uuid) -> AppResult<DateTime<Utc>>;

    /// Returns whether an entry was removed
    async fn remove(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool>;

    async fn contains(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool>;
}
