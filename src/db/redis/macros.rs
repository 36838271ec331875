/// Read-through caching against Redis.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues the fresh value for a background write with the given TTL and
/// returns it. A failed or timed-out cache read counts as a miss, so a down or
/// hung Redis only costs the read timeout. Errors from `$block` propagate with `?`.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache)
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write
/// * `$ttl`: time-to-live for a fresh value, in seconds
/// * `$block`: future computing the value on a miss
///
/// # Example
/// ```rust,ignore
/// let page: CatalogPage = cached!(self.cache, CacheKey::Popular(1), POPULAR_TTL, async move {
///     self.inner.popular(1).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
