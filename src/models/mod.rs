use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate movie title used to query the catalog backend
pub type RecommendationSeed = String;

/// Identifier assigned to a movie by the catalog backend (TMDB id)
pub type ExternalId = i64;

/// Identity of the single watchlist owner; there is no authentication
pub const GUEST_USER_ID: &str = "guest_user";

// ============================================================================
// Classifier Types
// ============================================================================

/// One prediction returned by the image classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLabel {
    pub label: String,
    pub score: f64,
}

impl ClassificationLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

// ============================================================================
// Catalog Backend Types (TMDB)
// ============================================================================

/// A movie as returned by the catalog backend
///
/// Identity is `external_id`: two records with the same id are the same movie
/// regardless of any other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "id")]
    pub external_id: ExternalId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl CatalogRecord {
    /// Release year, when the backend supplied a release date
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paged result list from search, popular and discover endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full movie details from `GET /movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub record: CatalogRecord,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<i32>,
}

impl From<CatalogRecord> for MovieDetails {
    fn from(record: CatalogRecord) -> Self {
        Self {
            record,
            genres: Vec::new(),
            runtime: None,
        }
    }
}

// ============================================================================
// Stored Types
// ============================================================================

/// Persisted form of a catalog record; at most one exists per `tmdb_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMovie {
    pub id: Uuid,
    pub tmdb_id: ExternalId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub genres: Vec<Genre>,
    pub runtime: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredMovie {
    /// Builds a fresh row for a movie that has never been stored
    pub fn from_details(details: &MovieDetails) -> Self {
        let record = &details.record;
        // Search results only carry genre ids; details carry full genres.
        let genres = if details.genres.is_empty() {
            record
                .genre_ids
                .iter()
                .map(|&id| Genre { id, name: None })
                .collect()
        } else {
            details.genres.clone()
        };
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            tmdb_id: record.external_id,
            title: record.title.clone(),
            overview: record.overview.clone(),
            poster_path: record.poster_path.clone(),
            backdrop_path: record.backdrop_path.clone(),
            release_date: record.release_date.clone(),
            vote_average: record.vote_average,
            vote_count: record.vote_count,
            original_language: record.original_language.clone(),
            popularity: record.popularity,
            genres,
            runtime: details.runtime,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored movie as it appears in the guest watchlist
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub movie: StoredMovie,
    pub added_at: DateTime<Utc>,
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// Raw multi-modal input to the recommendation pipeline
#[derive(Debug, Clone, Default)]
pub struct RecommendationInput {
    pub image: Option<Vec<u8>>,
    pub text: Option<String>,
    pub mood: Option<String>,
}

impl RecommendationInput {
    /// Text with surrounding whitespace removed, `None` when blank
    pub fn text_hint(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    pub fn mood_hint(&self) -> Option<&str> {
        non_blank(self.mood.as_deref())
    }

    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|bytes| !bytes.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        !self.has_image() && self.text_hint().is_none() && self.mood_hint().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// How the pipeline arrived at its result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationAnalysis {
    pub image_description: String,
    pub recommended_titles: Vec<RecommendationSeed>,
    pub found_movies: usize,
    pub total_recommended: usize,
    pub query: String,
}

/// Per-request pipeline output; only the movies are persisted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub movies: Vec<StoredMovie>,
    pub analysis: RecommendationAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
