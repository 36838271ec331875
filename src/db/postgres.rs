use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{MovieStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{ExternalId, Genre, MovieDetails, StoredMovie, WatchlistEntry},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str = "m.id, m.tmdb_id, m.title, m.overview, m.poster_path, m.backdrop_path, \
     m.release_date, m.vote_average, m.vote_count, m.original_language, m.popularity, \
     m.genres, m.runtime, m.created_at, m.updated_at";

#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    tmdb_id: i64,
    title: String,
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    original_language: Option<String>,
    popularity: Option<f64>,
    genres: Json<Vec<Genre>>,
    runtime: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MovieRow> for StoredMovie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            overview: row.overview,
            poster_path: row.poster_path,
            backdrop_path: row.backdrop_path,
            release_date: row.release_date,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            original_language: row.original_language,
            popularity: row.popularity,
            genres: row.genres.0,
            runtime: row.runtime,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct WatchlistRow {
    #[sqlx(flatten)]
    movie: MovieRow,
    added_at: DateTime<Utc>,
}

/// Postgres-backed movie and watchlist storage
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_movie(&self, filter: &str, bind: MovieKey) -> AppResult<Option<StoredMovie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies m WHERE {filter}");
        let query = sqlx::query_as::<_, MovieRow>(&sql);
        let row = match bind {
            MovieKey::Id(id) => query.bind(id).fetch_optional(&self.pool).await?,
            MovieKey::TmdbId(tmdb_id) => query.bind(tmdb_id).fetch_optional(&self.pool).await?,
        };
        Ok(row.map(StoredMovie::from))
    }
}

enum MovieKey {
    Id(Uuid),
    TmdbId(ExternalId),
}

#[async_trait::async_trait]
impl MovieStore for PgStore {
    async fn find_by_external_id(&self, tmdb_id: ExternalId) -> AppResult<Option<StoredMovie>> {
        self.fetch_movie("m.tmdb_id = $1", MovieKey::TmdbId(tmdb_id))
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredMovie>> {
        self.fetch_movie("m.id = $1", MovieKey::Id(id)).await
    }

    async fn upsert(&self, details: &MovieDetails) -> AppResult<StoredMovie> {
        let movie = StoredMovie::from_details(details);

        // The unique index on tmdb_id arbitrates concurrent inserts; the loser
        // reads back the winner's row.
        let inserted = sqlx::query(
            r#"
            INSERT INTO movies (
                id, tmdb_id, title, overview, poster_path, backdrop_path, release_date,
                vote_average, vote_count, original_language, popularity, genres, runtime,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (tmdb_id) DO NOTHING
            "#,
        )
        .bind(movie.id)
        .bind(movie.tmdb_id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(&movie.backdrop_path)
        .bind(&movie.release_date)
        .bind(movie.vote_average)
        .bind(movie.vote_count)
        .bind(&movie.original_language)
        .bind(movie.popularity)
        .bind(Json(&movie.genres))
        .bind(movie.runtime)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            tracing::debug!(tmdb_id = movie.tmdb_id, id = %movie.id, "Movie stored");
            return Ok(movie);
        }

        self.find_by_external_id(movie.tmdb_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Movie {} vanished after conflicting insert",
                    movie.tmdb_id
                ))
            })
    }
}

#[async_trait::async_trait]
impl WatchlistStore for PgStore {
    async fn list(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS}, w.added_at FROM watchlist_items w \
             JOIN movies m ON m.id = w.movie_id \
             WHERE w.user_id = $1 ORDER BY w.added_at DESC"
        );
        let rows = sqlx::query_as::<_, WatchlistRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| WatchlistEntry {
                movie: row.movie.into(),
                added_at: row.added_at,
            })
            .collect())
    }

    async fn add(&self, user_id: &str, movie_id: Uuid) -> AppResult<DateTime<Utc>> {
        let added_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            INSERT INTO watchlist_items (user_id, movie_id, added_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, movie_id) DO NOTHING
            RETURNING added_at
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        added_at.ok_or_else(|| AppError::Conflict("Movie already in watchlist".to_string()))
    }

    async fn remove(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist_items WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn contains(&self, user_id: &str, movie_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM watchlist_items WHERE user_id = $1 AND movie_id = $2)",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
