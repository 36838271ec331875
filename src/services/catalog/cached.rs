use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{CatalogPage, ExternalId, Genre, MovieDetails},
    services::catalog::CatalogBackend,
};

const LISTING_CACHE_TTL: u64 = 3600; // 1 hour
const METADATA_CACHE_TTL: u64 = 604800; // 1 week

/// Redis read-through cache in front of another catalog backend
///
/// Only successful responses are cached; failures pass straight through so
/// the retry layer above sees them.
pub struct CachedCatalog<B> {
    inner: B,
    cache: Cache,
}

impl<B: CatalogBackend> CachedCatalog<B> {
    pub fn new(inner: B, cache: Cache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait::async_trait]
impl<B: CatalogBackend> CatalogBackend for CachedCatalog<B> {
    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::TitleSearch {
                query: query.to_string(),
                page,
            },
            LISTING_CACHE_TTL,
            self.inner.search(query, page)
        )
    }

    async fn popular(&self, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::Popular(page),
            LISTING_CACHE_TTL,
            self.inner.popular(page)
        )
    }

    async fn discover_by_genre(&self, genre_id: i32, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::Discover { genre_id, page },
            LISTING_CACHE_TTL,
            self.inner.discover_by_genre(genre_id, page)
        )
    }

    async fn details(&self, id: ExternalId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::Details(id),
            METADATA_CACHE_TTL,
            self.inner.details(id)
        )
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        cached!(
            self.cache,
            CacheKey::Genres,
            METADATA_CACHE_TTL,
            self.inner.genres()
        )
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
