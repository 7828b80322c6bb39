use std::hash::{BuildHasher, Hash};

/// Maps keys to bucket indices in `[0, bucket_count)`.
///
/// Deterministic for the lifetime of one cache instance; distinct keys may
/// collide, which the chains resolve. The hash quality is whatever the
/// supplied [`BuildHasher`] provides — the default is [`ahash`], which avoids
/// the heavy clustering a naive character-sum hash produces for short keys.
#[derive(Debug)]
pub(crate) struct BucketHasher<S> {
    hash_builder: S,
    bucket_count: usize,
}

impl<S> BucketHasher<S>
where
    S: BuildHasher,
{
    pub(crate) fn new(bucket_count: usize, hash_builder: S) -> Self {
        debug_assert!(bucket_count > 0);
        Self {
            hash_builder,
            bucket_count,
        }
    }

    pub(crate) fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.hash_builder.hash_one(key) as usize % self.bucket_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RandomState;

    #[test]
    fn it_is_deterministic_for_one_instance() {
        // given
        let hasher = BucketHasher::new(1024, RandomState::default());

        // then
        assert_eq!(hasher.bucket_index("key1"), hasher.bucket_index("key1"));
    }

    #[test]
    fn it_stays_within_the_bucket_range() {
        // given
        let hasher = BucketHasher::new(7, RandomState::default());

        // then
        for i in 0..1_000 {
            assert!(hasher.bucket_index(&format!("key{i}")) < 7);
        }
    }
}
