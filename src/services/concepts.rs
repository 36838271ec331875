/// Maps image classification labels to movie title seeds
///
/// The mapping table is embedded configuration data (`data/concept_map.json`),
/// an ordered list of `label → titles` entries. Each confident label contributes
/// the titles of its exact key plus those of every key it overlaps with by
/// substring in either direction, so "man" also pulls in "woman".
use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{ClassificationLabel, RecommendationSeed},
};

const EMBEDDED_CONCEPT_MAP: &str = include_str!("../../data/concept_map.json");

/// Labels scoring at or below this are ignored
pub const MIN_LABEL_CONFIDENCE: f64 = 0.1;

/// One row of the mapping table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConceptEntry {
    pub label: String,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConceptMapper {
    entries: Vec<ConceptEntry>,
    by_label: HashMap<String, usize>,
}

impl ConceptMapper {
    /// Builds a mapper over the given table
    ///
    /// Keys are matched lowercase. A repeated key keeps its first position and
    /// takes the titles of its last occurrence.
    pub fn new(entries: Vec<ConceptEntry>) -> Self {
        let mut table: Vec<ConceptEntry> = Vec::with_capacity(entries.len());
        let mut by_label = HashMap::new();

        for entry in entries {
            let label = entry.label.trim().to_lowercase();
            match by_label.get(&label) {
                Some(&index) => table[index] = ConceptEntry { label, titles: entry.titles },
                None => {
                    by_label.insert(label.clone(), table.len());
                    table.push(ConceptEntry { label, titles: entry.titles });
                }
            }
        }

        Self {
            entries: table,
            by_label,
        }
    }

    /// Loads the table compiled into the binary
    pub fn embedded() -> AppResult<Self> {
        Self::from_json(EMBEDDED_CONCEPT_MAP)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let entries: Vec<ConceptEntry> = serde_json::from_str(json)
            .map_err(|e| AppError::Internal(format!("Invalid concept map: {}", e)))?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turns classifier labels into an ordered, duplicate-free seed list
    ///
    /// Output is unbounded; trimming to a fixed count happens in the aggregator.
    pub fn map(&self, labels: &[ClassificationLabel]) -> Vec<RecommendationSeed> {
        let mut seeds = Vec::new();
        let mut seen = HashSet::new();

        for classification in labels {
            // Written negated so NaN scores are dropped too.
            if !(classification.score > MIN_LABEL_CONFIDENCE) {
                continue;
            }

            // An empty label is a substring of every key and pulls in the
            // whole table.
            let label = classification.label.to_lowercase();

            if let Some(&index) = self.by_label.get(&label) {
                tracing::debug!(
                    label = %label,
                    confidence = classification.score,
                    "Exact concept match"
                );
                push_unique(&mut seeds, &mut seen, &self.entries[index].titles);
            }

            for entry in &self.entries {
                if entry.label.contains(&label) || label.contains(&entry.label) {
                    tracing::debug!(
                        label = %label,
                        key = %entry.label,
                        confidence = classification.score,
                        "Partial concept match"
                    );
                    push_unique(&mut seeds, &mut seen, &entry.titles);
                }
            }
        }

        tracing::debug!(
            labels = labels.len(),
            seeds = seeds.len(),
            "Mapped classifier labels to seeds"
        );

        seeds
    }
}

fn push_unique(seeds: &mut Vec<RecommendationSeed>, seen: &mut HashSet<String>, titles: &[String]) {
    for title in titles {
        if seen.insert(title.clone()) {
            seeds.push(title.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, titles: &[&str]) -> ConceptEntry {
        ConceptEntry {
            label: label.to_string(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn small_mapper() -> ConceptMapper {
        ConceptMapper::new(vec![
            entry("man", &["Drive", "Nightcrawler"]),
            entry("woman", &["Black Swan", "Lady Bird"]),
            entry("dog", &["John Wick", "Isle of Dogs"]),
            entry("car", &["Drive", "Rush"]),
        ])
    }

    #[test]
    fn test_embedded_table_loads() {
        let mapper = ConceptMapper::embedded().unwrap();
        assert!(!mapper.is_empty());
    }

    #[test]
    fn test_embedded_duplicate_keys_take_last_titles() {
        let mapper = ConceptMapper::embedded().unwrap();
        let seeds = mapper.map(&[ClassificationLabel::new("computer", 0.9)]);
        assert!(seeds.contains(&"Tron".to_string()));
        assert!(!seeds.contains(&"Hackers".to_string()));
    }

    #[test]
    fn test_low_confidence_labels_are_discarded() {
        let mapper = small_mapper();
        let labels = vec![
            ClassificationLabel::new("dog", 0.1),
            ClassificationLabel::new("man", 0.05),
            ClassificationLabel::new("car", 0.0),
        ];
        assert!(mapper.map(&labels).is_empty());
    }

    #[test]
    fn test_nan_score_is_discarded() {
        let mapper = small_mapper();
        assert!(mapper.map(&[ClassificationLabel::new("dog", f64::NAN)]).is_empty());
    }

    #[test]
    fn test_no_labels_yields_no_seeds() {
        assert!(small_mapper().map(&[]).is_empty());
    }

    #[test]
    fn test_unknown_label_yields_no_seeds() {
        let seeds = small_mapper().map(&[ClassificationLabel::new("xylophone", 0.9)]);
        assert!(seeds.is_empty());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let seeds = small_mapper().map(&[ClassificationLabel::new("DOG", 0.8)]);
        assert_eq!(seeds, vec!["John Wick", "Isle of Dogs"]);
    }

    #[test]
    fn test_short_label_matches_longer_keys() {
        // "man" is a substring of "woman"
        let seeds = small_mapper().map(&[ClassificationLabel::new("man", 0.5)]);
        assert_eq!(seeds, vec!["Drive", "Nightcrawler", "Black Swan", "Lady Bird"]);
    }

    #[test]
    fn test_long_label_matches_contained_keys() {
        let seeds = small_mapper().map(&[ClassificationLabel::new("sports car", 0.7)]);
        assert_eq!(seeds, vec!["Drive", "Rush"]);
    }

    #[test]
    fn test_titles_are_deduplicated_first_seen_wins() {
        let labels = vec![
            ClassificationLabel::new("car", 0.9),
            ClassificationLabel::new("man", 0.9),
        ];
        let seeds = small_mapper().map(&labels);
        assert_eq!(
            seeds,
            vec!["Drive", "Rush", "Nightcrawler", "Black Swan", "Lady Bird"]
        );
    }

    #[test]
    fn test_empty_label_matches_every_key() {
        let seeds = small_mapper().map(&[ClassificationLabel::new("", 0.9)]);
        assert_eq!(
            seeds,
            vec![
                "Drive",
                "Nightcrawler",
                "Black Swan",
                "Lady Bird",
                "John Wick",
                "Isle of Dogs",
                "Rush"
            ]
        );
    }

    #[test]
    fn test_empty_label_below_threshold_is_ignored() {
        let seeds = small_mapper().map(&[ClassificationLabel::new("", 0.05)]);
        assert!(seeds.is_empty());
    }

    #[test]
    fn test_output_titles_come_from_matching_keys() {
        let mapper = ConceptMapper::embedded().unwrap();
        let labels = vec![
            ClassificationLabel::new("golden retriever, dog", 0.6),
            ClassificationLabel::new("sunglasses", 0.3),
            ClassificationLabel::new("Cat", 0.2),
            ClassificationLabel::new("ski", 0.05),
        ];

        let seeds = mapper.map(&labels);
        assert!(!seeds.is_empty());

        for seed in &seeds {
            let grounded = labels
                .iter()
                .filter(|l| l.score > MIN_LABEL_CONFIDENCE)
                .map(|l| l.label.to_lowercase())
                .any(|label| {
                    mapper.entries.iter().any(|e| {
                        (e.label.contains(&label) || label.contains(&e.label))
                            && e.titles.contains(seed)
                    })
                });
            assert!(grounded, "seed {seed:?} has no matching key");
        }
    }

    #[test]
    fn test_from_json_rejects_malformed_table() {
        assert!(ConceptMapper::from_json("{ not json").is_err());
    }
}
