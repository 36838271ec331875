use std::collections::HashSet;

use crate::models::RecommendationSeed;

/// Broadly appealing titles used whenever classifier concepts run short
const BASELINE_TITLES: &[&str] = &[
    "The Shawshank Redemption",
    "The Godfather",
    "The Dark Knight",
    "Pulp Fiction",
    "Forrest Gump",
    "Inception",
    "Fight Club",
    "The Matrix",
    "Goodfellas",
    "Se7en",
    "The Silence of the Lambs",
    "Saving Private Ryan",
    "Schindler's List",
    "One Flew Over the Cuckoo's Nest",
    "Casablanca",
    "Lawrence of Arabia",
    "Psycho",
    "Sunset Boulevard",
    "Vertigo",
    "Citizen Kane",
];

/// Extra titles per normalized mood tag
const MOOD_TITLES: &[(&str, &[&str])] = &[
    ("action", &["Mad Max: Fury Road", "John Wick", "Die Hard", "The Raid"]),
    (
        "comedy",
        &["The Grand Budapest Hotel", "Parasite", "Knives Out", "Jojo Rabbit"],
    ),
    (
        "drama",
        &["Manchester by the Sea", "Moonlight", "Her", "The Social Network"],
    ),
    ("horror", &["The Conjuring", "Hereditary", "Get Out", "A Quiet Place"]),
    ("romance", &["The Notebook", "Titanic", "La La Land", "Her"]),
    ("scifi", &["Blade Runner 2049", "Arrival", "Ex Machina", "Interstellar"]),
    ("thriller", &["Gone Girl", "Zodiac", "Prisoners", "Shutter Island"]),
    (
        "dark",
        &["Joker", "Taxi Driver", "There Will Be Blood", "No Country for Old Men"],
    ),
];

/// Phrases looked for in free text, with the titles each one adds
const TEXT_TRIGGERS: &[(&str, &[&str])] = &[
    (
        "psychological",
        &["Black Swan", "Shutter Island", "Memento", "The Machinist"],
    ),
    ("thriller", &["Gone Girl", "Zodiac", "Prisoners", "Se7en"]),
    (
        "dark",
        &["Joker", "Taxi Driver", "There Will Be Blood", "Nightcrawler"],
    ),
];

/// Lowercases a mood tag and strips everything but ASCII letters ("Sci-Fi" → "scifi")
pub fn normalize_mood(mood: &str) -> String {
    mood.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Builds the fallback seed pool
///
/// Order is baseline, then mood additions, then text-trigger additions, each
/// in table order, with exact duplicates removed (first occurrence wins).
pub fn generate(text_hint: Option<&str>, mood: Option<&str>) -> Vec<RecommendationSeed> {
    let mut pool: Vec<&str> = BASELINE_TITLES.to_vec();

    if let Some(mood) = mood {
        let key = normalize_mood(mood);
        if let Some((_, titles)) = MOOD_TITLES.iter().find(|(name, _)| *name == key) {
            pool.extend_from_slice(titles);
        }
    }

    if let Some(text) = text_hint {
        let text = text.to_lowercase();
        for (phrase, titles) in TEXT_TRIGGERS {
            if text.contains(phrase) {
                pool.extend_from_slice(titles);
            }
        }
    }

    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|title| seen.insert(*title))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mood() {
        assert_eq!(normalize_mood("Sci-Fi"), "scifi");
        assert_eq!(normalize_mood("  ACTION! "), "action");
        assert_eq!(normalize_mood("123"), "");
    }

    #[test]
    fn test_baseline_only() {
        let seeds = generate(None, None);
        assert_eq!(seeds.len(), BASELINE_TITLES.len());
        assert_eq!(seeds[0], "The Shawshank Redemption");
        assert_eq!(seeds.last().unwrap(), "Citizen Kane");
    }

    #[test]
    fn test_mood_titles_follow_baseline() {
        let seeds = generate(None, Some("action"));
        let base = BASELINE_TITLES.len();
        assert_eq!(
            &seeds[base..],
            &["Mad Max: Fury Road", "John Wick", "Die Hard", "The Raid"]
        );
    }

    #[test]
    fn test_mood_is_normalized_before_lookup() {
        let seeds = generate(None, Some("Sci-Fi"));
        assert!(seeds.contains(&"Arrival".to_string()));
    }

    #[test]
    fn test_unknown_mood_adds_nothing() {
        assert_eq!(generate(None, Some("melancholy")), generate(None, None));
    }

    #[test]
    fn test_text_triggers_are_case_insensitive() {
        let seeds = generate(Some("Something PSYCHOLOGICAL please"), None);
        assert!(seeds.contains(&"Memento".to_string()));
    }

    #[test]
    fn test_pool_is_deduplicated() {
        // "thriller" mood and "thriller"/"dark" text overlap on several titles
        let seeds = generate(Some("a dark thriller"), Some("thriller"));
        let unique: HashSet<_> = seeds.iter().collect();
        assert_eq!(unique.len(), seeds.len());

        // Se7en is in the baseline, so the text trigger does not move it
        let se7en = seeds.iter().position(|s| s == "Se7en").unwrap();
        assert!(se7en < BASELINE_TITLES.len());
    }

    #[test]
    fn test_mood_before_text_additions() {
        let seeds = generate(Some("dark"), Some("horror"));
        let conjuring = seeds.iter().position(|s| s == "The Conjuring").unwrap();
        let joker = seeds.iter().position(|s| s == "Joker").unwrap();
        assert!(conjuring < joker);
    }
}
