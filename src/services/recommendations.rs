use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{
        CatalogRecord, ClassificationLabel, MovieDetails, RecommendationAnalysis,
        RecommendationInput, RecommendationResult, RecommendationSeed, StoredMovie,
    },
    services::{
        catalog::SearchGateway, classifier::Classifier, concepts::ConceptMapper, seeds,
    },
};

/// Upper bound on movies returned per request
pub const MAX_RESULTS: usize = 10;

/// Below this many search hits the popular listing tops the pool up
pub const MIN_FOUND_BEFORE_BACKFILL: usize = 5;

pub const IMAGE_ANALYSIS_UNAVAILABLE: &str = "Image analysis unavailable";

const EMPTY_RESULT_MESSAGE: &str =
    "No movies found. This might be due to network issues with movie database. Please try again.";

/// Turns an image, free text and a mood into a persisted list of movies
///
/// Pipeline:
/// 1. Classify the image (best effort)
/// 2. Map labels to concept seeds and top them up with fallback seeds
/// 3. Search every seed concurrently, keeping the best hit per seed
/// 4. Backfill from the popular listing when too few seeds resolved
/// 5. Dedup by catalog id, cap, and upsert each movie
///
/// Only an empty input or an unexpected failure surfaces as an error; every
/// dependency failure degrades the result instead.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    classifier: Option<Arc<dyn Classifier>>,
    mapper: Arc<ConceptMapper>,
    gateway: SearchGateway,
    movies: Arc<dyn MovieStore>,
}

impl RecommendationOrchestrator {
    pub fn new(
        classifier: Option<Arc<dyn Classifier>>,
        mapper: Arc<ConceptMapper>,
        gateway: SearchGateway,
        movies: Arc<dyn MovieStore>,
    ) -> Self {
        Self {
            classifier,
            mapper,
            gateway,
            movies,
        }
    }

    pub async fn recommend(&self, input: RecommendationInput) -> AppResult<RecommendationResult> {
        if input.is_empty() {
            return Err(AppError::InvalidInput(
                "Please provide an image, text, or mood".to_string(),
            ));
        }

        let labels = self.classify(&input).await;
        let image_description = match &labels {
            Some(labels) if !labels.is_empty() => labels
                .iter()
                .map(|l| l.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => IMAGE_ANALYSIS_UNAVAILABLE.to_string(),
        };

        let concept_seeds = labels
            .as_deref()
            .map(|labels| self.mapper.map(labels))
            .unwrap_or_default();
        let seeds = seeds::aggregate(&concept_seeds, input.text_hint(), input.mood_hint());

        tracing::info!(
            concept_seeds = concept_seeds.len(),
            seeds = ?seeds,
            "Recommendation seeds built"
        );

        let mut candidates = self.search_seeds(&seeds).await;
        let found = candidates.len();

        if found < MIN_FOUND_BEFORE_BACKFILL {
            let popular = self.gateway.get_popular(1).await;
            tracing::info!(
                found,
                backfill = popular.len().min(MAX_RESULTS - found),
                "Backfilling with popular movies"
            );
            candidates.extend(popular.into_iter().take(MAX_RESULTS - found));
        }

        let candidates = dedup_by_external_id(candidates, MAX_RESULTS);
        let movies = self.persist(candidates).await;

        Ok(build_result(image_description, seeds, movies))
    }

    /// Runs the classifier when an image is present; `None` means unavailable
    async fn classify(&self, input: &RecommendationInput) -> Option<Vec<ClassificationLabel>> {
        let image = input.image.as_deref().filter(|bytes| !bytes.is_empty())?;

        let Some(classifier) = &self.classifier else {
            tracing::warn!("Image supplied but no classifier is configured");
            return None;
        };

        match classifier.classify(image).await {
            Ok(labels) => Some(labels),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    classifier = classifier.name(),
                    "Image classification failed, continuing without it"
                );
                None
            }
        }
    }

    /// Searches every seed in its own task and keeps each seed's top hit,
    /// in seed order
    async fn search_seeds(&self, seeds: &[RecommendationSeed]) -> Vec<CatalogRecord> {
        let handles: Vec<_> = seeds
            .iter()
            .map(|seed| {
                let gateway = self.gateway.clone();
                let seed = seed.clone();
                tokio::spawn(async move { gateway.search_by_title(&seed).await })
            })
            .collect();

        let mut found = Vec::with_capacity(handles.len());
        for (seed, handle) in seeds.iter().zip(handles) {
            match handle.await {
                Ok(results) => match results.into_iter().next() {
                    Some(record) => {
                        tracing::debug!(
                            seed = %seed,
                            title = %record.title,
                            year = record.release_year().unwrap_or("unknown"),
                            "Seed resolved"
                        );
                        found.push(record);
                    }
                    None => tracing::debug!(seed = %seed, "No catalog match for seed"),
                },
                Err(e) => {
                    tracing::warn!(seed = %seed, error = %e, "Seed search task failed");
                }
            }
        }

        found
    }

    /// Upserts every record concurrently; failed records are dropped
    async fn persist(&self, records: Vec<CatalogRecord>) -> Vec<StoredMovie> {
        let handles: Vec<_> = records
            .into_iter()
            .map(|record| {
                let movies = Arc::clone(&self.movies);
                let tmdb_id = record.external_id;
                let handle = tokio::spawn(async move {
                    movies.upsert(&MovieDetails::from(record)).await
                });
                (tmdb_id, handle)
            })
            .collect();

        let mut stored = Vec::with_capacity(handles.len());
        for (tmdb_id, handle) in handles {
            match handle.await {
                Ok(Ok(movie)) => stored.push(movie),
                Ok(Err(e)) => {
                    tracing::warn!(tmdb_id, error = %e, "Failed to persist movie, dropping it");
                }
                Err(e) => {
                    tracing::warn!(tmdb_id, error = %e, "Persist task failed, dropping movie");
                }
            }
        }

        stored
    }
}

/// Keeps the first record per external id, in order, up to `limit`
fn dedup_by_external_id(records: Vec<CatalogRecord>, limit: usize) -> Vec<CatalogRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.external_id))
        .take(limit)
        .collect()
}

fn build_result(
    image_description: String,
    seeds: Vec<RecommendationSeed>,
    movies: Vec<StoredMovie>,
) -> RecommendationResult {
    let total_recommended = seeds.len();
    let found_movies = movies.len();

    let (query, message) = if movies.is_empty() {
        (
            format!(
                "AI recommended {} movies but none were found in database",
                total_recommended
            ),
            Some(EMPTY_RESULT_MESSAGE.to_string()),
        )
    } else {
        (
            format!("AI recommended {} movies based on your inputs", total_recommended),
            None,
        )
    };

    RecommendationResult {
        movies,
        analysis: RecommendationAnalysis {
            image_description,
            recommended_titles: seeds,
            found_movies,
            total_recommended,
            query,
        },
        message,
    }
}
