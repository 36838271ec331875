/// TMDB (The Movie Database) API client
///
/// Endpoints used:
/// 1. `/search/movie` → title search
/// 2. `/movie/popular` → popular listing
/// 3. `/discover/movie` → listing by genre
/// 4. `/movie/{id}` → full details
/// 5. `/genre/movie/list` → genre names
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogPage, ExternalId, Genre, MovieDetails},
    services::catalog::CatalogBackend,
};

/// Ceiling for a single HTTP attempt
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET with the API key attached and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogBackend for TmdbClient {
    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page: CatalogPage = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            query = %query,
            results = page.results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(page)
    }

    async fn popular(&self, page: u32) -> AppResult<CatalogPage> {
        self.get_json("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn discover_by_genre(&self, genre_id: i32, page: u32) -> AppResult<CatalogPage> {
        self.get_json(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    async fn details(&self, id: ExternalId) -> AppResult<MovieDetails> {
        let details: MovieDetails = self.get_json(&format!("/movie/{}", id), &[]).await?;

        tracing::debug!(
            tmdb_id = id,
            title = %details.record.title,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let list: GenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
