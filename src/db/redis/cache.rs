use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::ExternalId;

/// Keys for cached catalog backend responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    TitleSearch { query: String, page: u32 },
    Popular(u32),
    Discover { genre_id: i32, page: u32 },
    Details(ExternalId),
    Genres,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::TitleSearch { query, page } => {
                write!(f, "tmdb:search:{}:{}", page, query.trim().to_lowercase())
            }
            CacheKey::Popular(page) => write!(f, "tmdb:popular:{}", page),
            CacheKey::Discover { genre_id, page } => {
                write!(f, "tmdb:discover:{}:{}", genre_id, page)
            }
            CacheKey::Details(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::Genres => write!(f, "tmdb:genres"),
        }
    }
}

/// Creates a Redis client for caching
///
/// The client connects lazily; an unreachable server surfaces on first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Ceiling for one cache read; a slower Redis counts as a miss
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);

const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    read_timeout: Duration,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Writes go through a channel to a spawned task so request handlers never
    /// wait on Redis to store a response.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
            read_timeout: DEFAULT_READ_TIMEOUT,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Background task that drains write messages into Redis
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders live in every Cache clone, so drain what is queued now
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::warn!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let write = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
            Ok::<_, AppError>(())
        };
        timeout(WRITE_TIMEOUT, write)
            .await
            .map_err(|_| AppError::Timeout(WRITE_TIMEOUT))?
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    ///
    /// A read that outlasts the read timeout fails with `AppError::Timeout`.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let read = async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            let cached: Option<String> = conn.get(key.to_string()).await?;
            Ok::<_, AppError>(cached)
        };
        let cached = timeout(self.read_timeout, read)
            .await
            .map_err(|_| AppError::Timeout(self.read_timeout))??;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for storage without waiting for the write
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_title_search() {
        let key = CacheKey::TitleSearch {
            query: "Inception".to_string(),
            page: 1,
        };
        assert_eq!(key.to_string(), "tmdb:search:1:inception");
    }

    #[test]
    fn test_cache_key_display_title_search_normalizes_query() {
        let key = CacheKey::TitleSearch {
            query: "  THE MATRIX ".to_string(),
            page: 2,
        };
        assert_eq!(key.to_string(), "tmdb:search:2:the matrix");
    }

    #[test]
    fn test_cache_key_display_popular() {
        assert_eq!(CacheKey::Popular(3).to_string(), "tmdb:popular:3");
    }

    #[test]
    fn test_cache_key_display_discover() {
        let key = CacheKey::Discover {
            genre_id: 28,
            page: 1,
        };
        assert_eq!(key.to_string(), "tmdb:discover:28:1");
    }

    #[test]
    fn test_cache_key_display_details_and_genres() {
        assert_eq!(CacheKey::Details(27205).to_string(), "tmdb:movie:27205");
        assert_eq!(CacheKey::Genres.to_string(), "tmdb:genres");
    }

    #[tokio::test]
    async fn test_unreachable_redis_read_is_an_error_not_a_panic() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);

        let result: AppResult<Option<Vec<String>>> = cache.get_from_cache(&CacheKey::Genres).await;
        assert!(result.is_err());

        cache.set_in_background(&CacheKey::Genres, &vec!["Action".to_string()], 60);
        handle.shutdown().await;
    }

    /// Accepts connections and never answers them
    async fn silent_redis_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("redis://{}", addr)
    }

    #[tokio::test]
    async fn test_unresponsive_redis_read_times_out() {
        let client = create_redis_client(&silent_redis_url().await).unwrap();
        let (cache, _handle) = Cache::new(client);
        let cache = cache.with_read_timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let result: AppResult<Option<String>> = cache.get_from_cache(&CacheKey::Genres).await;

        assert!(matches!(result, Err(AppError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
