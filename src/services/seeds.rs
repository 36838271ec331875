use std::collections::HashSet;

use crate::{models::RecommendationSeed, services::fallback};

/// Number of seeds the pipeline searches for
pub const TARGET_SEED_COUNT: usize = 10;

/// Combines concept seeds with fallback seeds into at most
/// [`TARGET_SEED_COUNT`] titles
///
/// Concept seeds keep priority and order. Fallback seeds fill the remaining
/// slots in pool order. Titles are compared case-insensitively, so the result
/// never holds two spellings of the same title. A short result is not an error.
pub fn aggregate(
    concept_seeds: &[RecommendationSeed],
    text_hint: Option<&str>,
    mood: Option<&str>,
) -> Vec<RecommendationSeed> {
    let mut seeds = Vec::with_capacity(TARGET_SEED_COUNT);
    let mut seen = HashSet::new();

    let mut push = |seeds: &mut Vec<RecommendationSeed>, title: &str| {
        if seeds.len() < TARGET_SEED_COUNT && seen.insert(title.to_lowercase()) {
            seeds.push(title.to_string());
        }
    };

    for title in concept_seeds {
        push(&mut seeds, title);
    }

    if seeds.len() < TARGET_SEED_COUNT {
        let from_concepts = seeds.len();
        for title in fallback::generate(text_hint, mood) {
            if seeds.len() >= TARGET_SEED_COUNT {
                break;
            }
            push(&mut seeds, &title);
        }
        tracing::debug!(
            from_concepts,
            from_fallback = seeds.len() - from_concepts,
            "Topped up seeds from fallback pool"
        );
    }

    seeds
}
