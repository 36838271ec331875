//! Offline catalog data served when the backend is unreachable.
//!
//! Records carry their real TMDB ids so that persisting them never collides
//! with a different movie once the backend comes back.

use crate::models::{CatalogRecord, Genre};

#[allow(clippy::too_many_arguments)]
fn record(
    external_id: i64,
    title: &str,
    overview: &str,
    poster_path: &str,
    backdrop_path: &str,
    release_date: &str,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    genre_ids: &[i32],
) -> CatalogRecord {
    CatalogRecord {
        external_id,
        title: title.to_string(),
        overview: overview.to_string(),
        poster_path: Some(poster_path.to_string()),
        backdrop_path: Some(backdrop_path.to_string()),
        release_date: Some(release_date.to_string()),
        vote_average: Some(vote_average),
        vote_count: Some(vote_count),
        original_language: Some("en".to_string()),
        popularity: Some(popularity),
        genre_ids: genre_ids.to_vec(),
    }
}

/// A handful of well-known movies
pub fn offline_movies() -> Vec<CatalogRecord> {
    vec![
        record(
            278,
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
            "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
            "/xBKGJQsAIeweesB79KC89FpBrVr.jpg",
            "1994-09-23",
            8.7,
            26000,
            95.0,
            &[18],
        ),
        record(
            238,
            "The Godfather",
            "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
            "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
            "/tmU7GeKVybMWFButWEGl2M4GeiP.jpg",
            "1972-03-14",
            8.7,
            18500,
            90.0,
            &[18, 80],
        ),
        record(
            155,
            "The Dark Knight",
            "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests.",
            "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
            "/dqK9Hag1054tghRQSqLSfrkvQnA.jpg",
            "2008-07-18",
            8.5,
            31000,
            88.0,
            &[28, 80, 18],
        ),
        record(
            680,
            "Pulp Fiction",
            "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in four tales of violence and redemption.",
            "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
            "/suaEOtk1N1sgg2MTM7oZd2cfVp3.jpg",
            "1994-09-10",
            8.5,
            26500,
            85.0,
            &[80, 18],
        ),
        record(
            27205,
            "Inception",
            "A thief who steals corporate secrets through dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
            "/s3TBrRGB1iav7gFOCNx3H31MoES.jpg",
            "2010-07-16",
            8.4,
            33000,
            92.0,
            &[28, 878, 53],
        ),
    ]
}

/// The standard TMDB movie genres
pub fn default_genres() -> Vec<Genre> {
    [
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (99, "Documentary"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
        (10402, "Music"),
        (9648, "Mystery"),
        (10749, "Romance"),
        (878, "Science Fiction"),
        (10770, "TV Movie"),
        (53, "Thriller"),
        (10752, "War"),
        (37, "Western"),
    ]
    .into_iter()
    .map(|(id, name)| Genre {
        id,
        name: Some(name.to_string()),
    })
    .collect()
}
