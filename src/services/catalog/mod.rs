/// Catalog backend abstraction
///
/// The catalog backend (TMDB) is the source of truth for movie metadata. The
/// trait lets the HTTP client, its Redis-cached decorator and test fakes stand
/// in for one another behind [`SearchGateway`].
use crate::{
    error::AppResult,
    models::{CatalogPage, ExternalId, Genre, MovieDetails},
};

pub mod cached;
pub mod gateway;
pub mod offline;
pub mod tmdb;

pub use cached::CachedCatalog;
pub use gateway::SearchGateway;
pub use tmdb::TmdbClient;

/// Raw access to the external movie catalog
///
/// Implementations report every failure; retries and fallbacks are layered on
/// top by [`SearchGateway`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Searches movies by title
    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage>;

    /// Lists currently popular movies
    async fn popular(&self, page: u32) -> AppResult<CatalogPage>;

    /// Lists movies in a genre, most popular first
    async fn discover_by_genre(&self, genre_id: i32, page: u32) -> AppResult<CatalogPage>;

    /// Fetches full details for one movie
    async fn details(&self, id: ExternalId) -> AppResult<MovieDetails>;

    /// Lists the backend's movie genres
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
