/// A macro to simplify get-or-compute caching against a [`TtlCache`].
///
/// If the key holds a live value, it is returned without running the block.
/// Otherwise the block's future is awaited; on success the value is stored
/// under the key and returned, on error the error propagates with `?` and the
/// cache is left untouched.
///
/// # Arguments
/// * `$cache`: A `TtlCache` (or anything with `get(&K)` and `set(K, V)`).
/// * `$key`: The key to look up and populate.
/// * `$block`: A future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let vector = cached!(caches.query_vectors(), CacheKey::QueryVector(text.into()), async {
///     embedder.embed(text).await
/// });
/// ```
///
/// [`TtlCache`]: crate::cache::TtlCache
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        match $cache.get(&key) {
            Some(cached) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                let value = $block.await?;
                $cache.set(key, ::std::clone::Clone::clone(&value));
                Ok(value)
            }
        }
    }};
}
