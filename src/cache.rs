use crate::error::CacheError;
use bucket::Bucket;
use entry::Entry;
use hasher::BucketHasher;
use parking_lot::RwLock;
use std::cmp;
use std::hash::BuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use value::Value;

mod bucket;
mod entry;
mod hasher;
pub(crate) mod value;

pub(crate) type RandomState = ahash::RandomState;

/// Passed as `ttl_seconds` to [`Cache::set`] to store an entry that never
/// expires.
pub const NO_EXPIRATION: i64 = -1;

/// Bucket count used by [`Cache::new`], matching the common fixed-table size
/// for small in-process caches.
const DEFAULT_BUCKET_COUNT: usize = 1024;

/// Thread-safe key/value cache with per-entry TTL and numeric counters.
///
/// Storage is a fixed-size array of buckets; keys that hash to the same
/// bucket are kept on a linked collision chain and resolved by linear scan.
/// Expiration is lazy: an expired entry is removed by the [`get`](Cache::get)
/// call that discovers it, never by a background sweep. This crate does not
/// use any unsafe code.
///
/// Locking is two-layered. A per-bucket read/write lock guards chain
/// structure (insertion, removal, traversal), and each entry carries its own
/// read/write lock guarding the stored value and its expiration deadline, so
/// readers of one key do not contend with writers of another key in the same
/// bucket.
///
/// Wrap the cache in a [`std::sync::Arc`] to share it between threads. All
/// operations only require a shared reference to the cache.
///
/// # Limitations
///
/// The bucket count is fixed at construction and never grows, and chains are
/// unbounded, so heavily skewed or adversarial key sets degrade operations to
/// O(n) in the number of colliding keys. [`flush`](Cache::flush) is not
/// atomic with respect to concurrent writers; entries inserted while a flush
/// is sweeping the buckets may survive it.
#[derive(Debug)]
pub struct Cache<S = RandomState> {
    hasher: BucketHasher<S>,
    buckets: Vec<RwLock<Bucket>>,
    count: AtomicUsize,
}

impl Cache<RandomState> {
    /// Creates a cache with the default bucket count of 1024.
    pub fn new() -> Cache<RandomState> {
        Cache::with_bucket_count(DEFAULT_BUCKET_COUNT)
    }

    /// Creates a cache with the specified number of buckets.
    ///
    /// The bucket count is fixed for the lifetime of the cache; a count of
    /// zero is bumped to one. Fewer buckets mean longer collision chains, not
    /// rejected inserts.
    pub fn with_bucket_count(bucket_count: usize) -> Cache<RandomState> {
        Cache::with_bucket_count_and_hasher(bucket_count, RandomState::default())
    }
}

impl Default for Cache<RandomState> {
    fn default() -> Self {
        Cache::new()
    }
}

impl<S> Cache<S>
where
    S: BuildHasher,
{
    /// Creates a cache with the specified number of buckets, using
    /// `hash_builder` to route keys to buckets.
    pub fn with_bucket_count_and_hasher(bucket_count: usize, hash_builder: S) -> Cache<S> {
        let bucket_count = cmp::max(bucket_count, 1);

        let mut buckets = Vec::with_capacity(bucket_count);
        for _ in 0..bucket_count {
            buckets.push(RwLock::new(Bucket::new()));
        }

        Self {
            hasher: BucketHasher::new(bucket_count, hash_builder),
            buckets,
            count: AtomicUsize::new(0),
        }
    }

    /// Stores `value` under `key` with a time-to-live of `ttl_seconds`.
    ///
    /// Passing [`NO_EXPIRATION`] stores an entry that never expires. If the
    /// key is already present in its chain, the value and the expiration
    /// deadline are overwritten in place and the element count is unchanged;
    /// otherwise a new entry is appended at the tail of the chain.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>, ttl_seconds: i64) {
        let key = key.into();
        let expires_at = if ttl_seconds == NO_EXPIRATION {
            NO_EXPIRATION
        } else {
            unix_now() + ttl_seconds
        };

        let bucket = self.bucket_for(&key);
        let mut chain = bucket.write();
        match chain.find(&key) {
            Some(entry) => entry.store(value.into(), expires_at),
            None => {
                chain.push_back(Arc::new(Entry::new(key, value.into(), expires_at)));
                self.count.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    /// Returns the value stored under `key`, or [`None`] if the key is absent
    /// or its TTL has elapsed.
    ///
    /// An expired entry is removed by the `get` call that discovers it, and
    /// the element count drops accordingly.
    ///
    /// This method clones the value when returning it. Keep large
    /// [`Value::Str`] and [`Value::Bytes`] payloads small if cloning is too
    /// expensive for your use-case.
    pub fn get(&self, key: &str) -> Option<Value> {
        let bucket = self.bucket_for(key);
        let entry = bucket.read().find(key)?;

        let (value, expires_at) = entry.load();
        if expires_at < 0 {
            return Some(value);
        }
        if unix_now() > expires_at {
            self.reap(bucket, key);
            return None;
        }
        Some(value)
    }

    /// Removes the entry stored under `key`.
    ///
    /// Removing an absent key is a no-op, not an error; the element count
    /// only drops when an entry was actually unlinked.
    pub fn delete(&self, key: &str) {
        let bucket = self.bucket_for(key);
        if bucket.write().remove(key).is_some() {
            self.count.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Adds `delta` to the numeric value stored under `key`.
    ///
    /// The result keeps the stored numeric width, wrapping at that width's
    /// boundary. A missing key is a silent no-op; a non-numeric stored value
    /// fails with [`CacheError::TypeMismatch`] and leaves the value
    /// unchanged.
    ///
    /// The TTL is deliberately not consulted: an expired entry that no `get`
    /// has reaped yet is still incremented, and remains invisible to `get`.
    pub fn increment(&self, key: &str, delta: i64) -> Result<(), CacheError> {
        let Some(entry) = self.bucket_for(key).read().find(key) else {
            return Ok(());
        };
        if entry.add(delta) {
            Ok(())
        } else {
            Err(CacheError::TypeMismatch {
                key: key.to_owned(),
            })
        }
    }

    /// Subtracts `delta` from the numeric value stored under `key`.
    ///
    /// Same contract as [`increment`](Cache::increment).
    pub fn decrement(&self, key: &str, delta: i64) -> Result<(), CacheError> {
        let Some(entry) = self.bucket_for(key).read().find(key) else {
            return Ok(());
        };
        if entry.sub(delta) {
            Ok(())
        } else {
            Err(CacheError::TypeMismatch {
                key: key.to_owned(),
            })
        }
    }

    /// Returns the number of stored entries in O(1).
    ///
    /// Because expiration is lazy, the count may transiently include entries
    /// whose TTL has elapsed but which no `get` has reaped yet.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Removes every entry from the cache.
    ///
    /// Buckets are swept one at a time, so writers running concurrently with
    /// a flush may insert entries that survive it.
    pub fn flush(&self) {
        for bucket in &self.buckets {
            let dropped = bucket.write().clear();
            if dropped > 0 {
                self.count.fetch_sub(dropped, Ordering::AcqRel);
            }
        }
    }

    fn bucket_for(&self, key: &str) -> &RwLock<Bucket> {
        &self.buckets[self.hasher.bucket_index(key)]
    }

    /// Removes `key` if it is still expired under the bucket write lock. The
    /// re-check matters: a concurrent `set` may have refreshed the entry
    /// between the caller's read lock and this write lock.
    fn reap(&self, bucket: &RwLock<Bucket>, key: &str) {
        let mut chain = bucket.write();
        let still_expired = chain
            .find(key)
            .is_some_and(|entry| entry.is_expired(unix_now()));
        if still_expired && chain.remove(key).is_some() {
            self.count.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn it_sets_and_gets_basic_values() {
        // given
        let cache = Cache::new();

        // when
        cache.set("key1", "value1", NO_EXPIRATION);

        // then
        assert_eq!(cache.get("key1"), Some(Value::from("value1")));
        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn it_overwrites_in_place_without_growing_the_count() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", 60);

        // when
        cache.set("key1", "value2", NO_EXPIRATION);

        // then
        assert_eq!(cache.get("key1"), Some(Value::from("value2")));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn it_resets_the_expiration_on_overwrite() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", NO_EXPIRATION);

        // when: overwrite with an already-elapsed deadline
        cache.set("key1", "value2", -10);

        // then
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn it_reaps_expired_entries_from_get() {
        // given: a deadline already in the past
        let cache = Cache::new();
        cache.set("key1", "value1", -10);
        assert_eq!(cache.count(), 1);

        // when
        let value = cache.get("key1");

        // then: the get call itself removed the entry
        assert_eq!(value, None);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn it_expires_entries_after_their_ttl_elapses() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", 0);

        // when
        thread::sleep(Duration::from_millis(1100));

        // then
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn it_keeps_entries_with_the_no_expiration_sentinel() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", NO_EXPIRATION);

        // then
        assert_eq!(cache.get("key1"), Some(Value::from("value1")));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn it_deletes_entries_and_restores_the_count() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", NO_EXPIRATION);

        // when
        cache.delete("key1");

        // then
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn it_ignores_deletes_of_absent_keys() {
        // given
        let cache = Cache::new();
        cache.set("key1", "value1", NO_EXPIRATION);

        // when
        cache.delete("missing");

        // then
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn it_increments_integer_values() {
        // given
        let cache = Cache::new();
        cache.set("counter", 10_i64, NO_EXPIRATION);

        // when
        cache.increment("counter", 5).unwrap();

        // then
        assert_eq!(cache.get("counter"), Some(Value::I64(15)));
    }

    #[test]
    fn it_decrements_integer_values() {
        // given
        let cache = Cache::new();
        cache.set("counter", 10_u32, NO_EXPIRATION);

        // when
        cache.decrement("counter", 3).unwrap();

        // then
        assert_eq!(cache.get("counter"), Some(Value::U32(7)));
    }

    #[test]
    fn it_preserves_the_stored_width_when_incrementing() {
        // given
        let cache = Cache::new();
        cache.set("counter", 250_u8, NO_EXPIRATION);

        // when
        cache.increment("counter", 10).unwrap();

        // then: wrapped at the u8 boundary
        assert_eq!(cache.get("counter"), Some(Value::U8(4)));
    }

    #[test]
    fn it_reports_a_type_mismatch_and_leaves_the_value_unchanged() {
        // given
        let cache = Cache::new();
        cache.set("key1", "not a number", NO_EXPIRATION);

        // when
        let result = cache.increment("key1", 1);

        // then
        assert_eq!(
            result,
            Err(CacheError::TypeMismatch {
                key: String::from("key1")
            })
        );
        assert_eq!(cache.get("key1"), Some(Value::from("not a number")));
    }

    #[test]
    fn it_silently_ignores_increments_of_missing_keys() {
        // given
        let cache = Cache::new();

        // when
        let result = cache.increment("missing", 5);

        // then
        assert_eq!(result, Ok(()));
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn it_increments_expired_entries_that_no_get_has_reaped() {
        // given: expired but still present in its chain
        let cache = Cache::new();
        cache.set("counter", 1_i64, -10);

        // when
        let result = cache.increment("counter", 1);

        // then: the increment applied, but the entry stays invisible to get
        assert_eq!(result, Ok(()));
        assert_eq!(cache.get("counter"), None);
    }

    #[test]
    fn it_flushes_every_bucket() {
        // given
        let cache = Cache::new();
        for i in 0..50 {
            cache.set(format!("key{i}"), i as i64, NO_EXPIRATION);
        }

        // when
        cache.flush();

        // then
        assert_eq!(cache.count(), 0);
        assert_eq!(cache.get("key0"), None);
        assert_eq!(cache.get("key49"), None);
    }

    #[test]
    fn it_round_trips_set_delete_get() {
        // given
        let cache = Cache::new();
        cache.set("other", "value", NO_EXPIRATION);
        let count_before = cache.count();

        // when
        cache.set("key1", "value1", 60);
        cache.delete("key1");

        // then
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.count(), count_before);
    }

    #[test]
    fn it_chains_colliding_keys_in_a_single_bucket() {
        // given: one bucket, so every key collides
        let cache = Cache::with_bucket_count(1);

        // when
        for i in 0..20 {
            cache.set(format!("key{i}"), i as i64, NO_EXPIRATION);
        }

        // then
        assert_eq!(cache.count(), 20);
        for i in 0..20 {
            assert_eq!(cache.get(&format!("key{i}")), Some(Value::I64(i as i64)));
        }
    }

    #[test]
    fn it_handles_zero_bucket_count() {
        // given
        let cache = Cache::with_bucket_count(0);

        // when
        cache.set("key1", "value1", NO_EXPIRATION);

        // then
        assert_eq!(cache.get("key1"), Some(Value::from("value1")));
    }

    #[test]
    fn it_works_with_a_custom_hasher() {
        // given
        use std::collections::hash_map::RandomState;
        let cache = Cache::with_bucket_count_and_hasher(64, RandomState::new());

        // when
        cache.set("key1", "value1", NO_EXPIRATION);

        // then
        assert_eq!(cache.get("key1"), Some(Value::from("value1")));
    }

    #[test]
    fn it_keeps_concurrent_inserts_into_one_bucket() {
        // given: one bucket forces every insert onto the same chain
        let cache = std::sync::Arc::new(Cache::with_bucket_count(1));
        let mut handles = vec![];

        // when
        for i in 0..8 {
            let cache_clone = std::sync::Arc::clone(&cache);
            let key = format!("key{i}");
            let value = format!("value{i}");
            let handle = thread::spawn(move || {
                cache_clone.set(key.clone(), value.clone(), NO_EXPIRATION);
                assert_eq!(cache_clone.get(&key), Some(Value::Str(value)));
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // then
        assert_eq!(cache.count(), 8);
        for i in 0..8 {
            let key = format!("key{i}");
            let value = format!("value{i}");
            assert_eq!(cache.get(&key), Some(Value::Str(value)));
        }
    }

    #[test]
    fn it_applies_concurrent_increments_atomically() {
        // given
        let cache = std::sync::Arc::new(Cache::new());
        cache.set("counter", 0_i64, NO_EXPIRATION);
        let mut handles = vec![];

        // when
        for _ in 0..8 {
            let cache_clone = std::sync::Arc::clone(&cache);
            let handle = thread::spawn(move || {
                for _ in 0..100 {
                    cache_clone.increment("counter", 1).unwrap();
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // then
        assert_eq!(cache.get("counter"), Some(Value::I64(800)));
    }
}
