use crate::cache::value::Value;
use parking_lot::RwLock;

/// Value and expiration live under one lock so that an overwrite replaces
/// both atomically and a reader never sees a fresh value paired with a stale
/// deadline.
#[derive(Debug)]
struct State {
    value: Value,
    expires_at: i64,
}

/// One stored key/value pair. The key is immutable for the lifetime of the
/// entry; the state is guarded by the entry's own read/write lock,
/// independent of the bucket lock that guards chain structure.
#[derive(Debug)]
pub(crate) struct Entry {
    key: String,
    state: RwLock<State>,
}

impl Entry {
    pub(crate) fn new(key: String, value: Value, expires_at: i64) -> Self {
        Self {
            key,
            state: RwLock::new(State { value, expires_at }),
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Returns the current value together with its expiration deadline.
    pub(crate) fn load(&self) -> (Value, i64) {
        let state = self.state.read();
        (state.value.clone(), state.expires_at)
    }

    /// Overwrites value and expiration in place.
    pub(crate) fn store(&self, value: Value, expires_at: i64) {
        let mut state = self.state.write();
        state.value = value;
        state.expires_at = expires_at;
    }

    pub(crate) fn is_expired(&self, now: i64) -> bool {
        let expires_at = self.state.read().expires_at;
        expires_at >= 0 && now > expires_at
    }

    /// Applies `delta` to the value under the write lock. Returns `false`
    /// when the stored value is not numeric.
    pub(crate) fn add(&self, delta: i64) -> bool {
        self.state.write().value.add(delta)
    }

    /// Subtracts `delta` from the value under the write lock. Returns `false`
    /// when the stored value is not numeric.
    pub(crate) fn sub(&self, delta: i64) -> bool {
        self.state.write().value.sub(delta)
    }
}
