use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CatalogRecord, ExternalId, Genre, MovieDetails},
    services::{
        catalog::{offline, CatalogBackend},
        retry::RetryPolicy,
    },
};

/// Resilient access to the catalog backend
///
/// Every backend call runs under the retry policy. Listing calls then degrade
/// instead of failing:
/// - title search → popular page 1 → offline dataset
/// - popular → offline dataset
/// - genre discovery → popular (same page)
/// - genre list → built-in genre list
///
/// Detail lookups are the exception: a movie either exists or the caller is
/// told it could not be fetched.
#[derive(Clone)]
pub struct SearchGateway {
    backend: Arc<dyn CatalogBackend>,
    retry: RetryPolicy,
}

impl SearchGateway {
    pub fn new(backend: Arc<dyn CatalogBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Resolves a title to catalog records, most relevant first; never fails
    pub async fn search_by_title(&self, title: &str) -> Vec<CatalogRecord> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("Skipping search for blank title");
            return Vec::new();
        }

        let backend = &self.backend;
        match self
            .retry
            .run("search", || backend.search(title, 1))
            .await
        {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    error = %e,
                    provider = backend.name(),
                    "Title search failed, falling back to popular movies"
                );
                self.get_popular(1).await
            }
        }
    }

    /// Lists popular movies; never fails
    pub async fn get_popular(&self, page: u32) -> Vec<CatalogRecord> {
        let backend = &self.backend;
        match self.retry.run("popular", || backend.popular(page)).await {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!(
                    page,
                    error = %e,
                    provider = backend.name(),
                    "Popular listing failed, serving offline dataset"
                );
                offline::offline_movies()
            }
        }
    }

    /// Lists movies in a genre; never fails
    pub async fn get_by_genre(&self, genre_id: i32, page: u32) -> Vec<CatalogRecord> {
        let backend = &self.backend;
        match self
            .retry
            .run("discover", || backend.discover_by_genre(genre_id, page))
            .await
        {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!(
                    genre_id,
                    page,
                    error = %e,
                    "Genre listing failed, falling back to popular movies"
                );
                self.get_popular(page).await
            }
        }
    }

    /// Lists movie genres; never fails
    pub async fn genres(&self) -> Vec<Genre> {
        let backend = &self.backend;
        match self.retry.run("genres", || backend.genres()).await {
            Ok(genres) => genres,
            Err(e) => {
                tracing::warn!(error = %e, "Genre list failed, serving built-in genres");
                offline::default_genres()
            }
        }
    }

    /// Fetches one movie's details; failures propagate
    pub async fn details(&self, id: ExternalId) -> AppResult<MovieDetails> {
        let backend = &self.backend;
        self.retry.run("details", || backend.details(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::CatalogPage;
    use crate::services::catalog::MockCatalogBackend;
    use std::time::Duration;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
            attempt_timeout: Duration::from_millis(50),
        }
    }

    fn movie(id: ExternalId, title: &str) -> CatalogRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
    }

    fn page_of(records: Vec<CatalogRecord>) -> CatalogPage {
        CatalogPage {
            page: 1,
            results: records,
            ..Default::default()
        }
    }

    fn down() -> AppError {
        AppError::ExternalApi("backend down".to_string())
    }

    fn gateway(backend: MockCatalogBackend) -> SearchGateway {
        SearchGateway::new(Arc::new(backend), fast_retry())
    }

    fn offline_ids() -> Vec<ExternalId> {
        offline::offline_movies()
            .iter()
            .map(|m| m.external_id)
            .collect()
    }

    #[tokio::test]
    async fn test_search_returns_backend_results() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_search()
            .withf(|query, page| query == "Heat" && *page == 1)
            .times(1)
            .returning(|_, _| Ok(page_of(vec![movie(949, "Heat")])));
        backend.expect_popular().never();

        let results = gateway(backend).search_by_title("  Heat ").await;
        assert_eq!(results, vec![movie(949, "Heat")]);
    }

    #[tokio::test]
    async fn test_search_retries_before_succeeding() {
        let mut backend = MockCatalogBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_search()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(down()));
        backend
            .expect_search()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page_of(vec![movie(1, "Found")])));
        backend.expect_popular().never();

        let results = gateway(backend).search_by_title("Found").await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_popular() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_search()
            .times(3)
            .returning(|_, _| Err(down()));
        backend
            .expect_popular()
            .withf(|page| *page == 1)
            .times(1)
            .returning(|_| Ok(page_of(vec![movie(10, "Popular")])));

        let results = gateway(backend).search_by_title("Anything").await;
        assert_eq!(results, vec![movie(10, "Popular")]);
    }

    #[tokio::test]
    async fn test_search_total_outage_serves_offline_dataset() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_search()
            .times(3)
            .returning(|_, _| Err(down()));
        backend.expect_popular().times(3).returning(|_| Err(down()));

        let results = gateway(backend).search_by_title("Anything").await;
        let ids: Vec<_> = results.iter().map(|m| m.external_id).collect();
        assert_eq!(ids, offline_ids());
    }

    #[tokio::test]
    async fn test_blank_title_is_not_searched() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_search().never();
        assert!(gateway(backend).search_by_title(" ").await.is_empty());
    }

    #[tokio::test]
    async fn test_popular_outage_serves_offline_dataset() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_name().return_const("mock");
        backend.expect_popular().times(3).returning(|_| Err(down()));

        let results = gateway(backend).get_popular(2).await;
        assert_eq!(results.len(), offline_ids().len());
    }

    #[tokio::test]
    async fn test_genre_listing_falls_back_to_popular_same_page() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_discover_by_genre()
            .times(3)
            .returning(|_, _| Err(down()));
        backend
            .expect_popular()
            .withf(|page| *page == 3)
            .times(1)
            .returning(|_| Ok(page_of(vec![movie(5, "Popular p3")])));

        let results = gateway(backend).get_by_genre(28, 3).await;
        assert_eq!(results[0].external_id, 5);
    }

    #[tokio::test]
    async fn test_genres_outage_serves_builtin_list() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_genres().times(3).returning(|| Err(down()));

        let genres = gateway(backend).genres().await;
        assert_eq!(genres, offline::default_genres());
    }

    #[tokio::test]
    async fn test_details_failure_propagates() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_details().times(3).returning(|_| Err(down()));

        let result = gateway(backend).details(603).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_details_success() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_details()
            .withf(|id| *id == 603)
            .returning(|id| Ok(MovieDetails::from(movie(id, "The Matrix"))));

        let details = gateway(backend).details(603).await.unwrap();
        assert_eq!(details.record.title, "The Matrix");
    }

    /// Backend whose every call hangs forever
    struct HangingBackend;

    #[async_trait::async_trait]
    impl CatalogBackend for HangingBackend {
        async fn search(&self, _query: &str, _page: u32) -> AppResult<CatalogPage> {
            std::future::pending().await
        }
        async fn popular(&self, _page: u32) -> AppResult<CatalogPage> {
            std::future::pending().await
        }
        async fn discover_by_genre(&self, _genre_id: i32, _page: u32) -> AppResult<CatalogPage> {
            std::future::pending().await
        }
        async fn details(&self, _id: ExternalId) -> AppResult<MovieDetails> {
            std::future::pending().await
        }
        async fn genres(&self) -> AppResult<Vec<Genre>> {
            std::future::pending().await
        }
        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    #[tokio::test]
    async fn test_search_against_hanging_backend_serves_offline_dataset() {
        let gateway = SearchGateway::new(Arc::new(HangingBackend), fast_retry());
        let results = gateway.search_by_title("Anything").await;
        assert_eq!(results.len(), offline_ids().len());

        let details = gateway.details(1).await;
        assert!(matches!(details, Err(AppError::Timeout(_))));
    }
}
