//! A thread-safe, in-process key/value cache with per-entry TTL expiration
//! and atomic numeric increment/decrement.
//!
//! Storage is a fixed-size hash table with chaining: keys hash to one of a
//! fixed number of buckets, and colliding keys share a linked chain that is
//! scanned linearly. Expired entries are reaped lazily by the `get` call that
//! discovers them; there is no background sweep.
//!
//! # Features
//!
//! - Thread-safe by default - no need for explicit synchronization
//! - Per-entry TTL with lazy expiration and a never-expires sentinel
//! - Atomic increment/decrement preserving the stored numeric width
//! - Two-layer locking: per-bucket locks for chain structure, per-entry locks
//!   for values
//! - No unsafe code
//!
//! # Limitations
//!
//! The bucket count is fixed at construction and chains are unbounded, so
//! skewed key sets degrade lookups to a linear scan of the colliding keys.
//! The cache is purely transient: nothing is persisted, and all contents are
//! lost on process exit.
//!
//! # Examples
//!
//! Basic usage with string keys and values:
//!
//! ```rust
//! use chain_cache::{Cache, NO_EXPIRATION, Value};
//!
//! let cache = Cache::new();
//!
//! cache.set("key1", "value1", NO_EXPIRATION);
//! assert_eq!(cache.get("key1"), Some(Value::from("value1")));
//! assert_eq!(cache.count(), 1);
//! ```
//!
//! Numeric counters:
//!
//! ```rust
//! use chain_cache::{Cache, NO_EXPIRATION, Value};
//!
//! let cache = Cache::new();
//!
//! cache.set("hits", 10_i64, NO_EXPIRATION);
//! cache.increment("hits", 5).unwrap();
//! assert_eq!(cache.get("hits"), Some(Value::I64(15)));
//!
//! // Incrementing a non-numeric value fails; a missing key is a no-op.
//! cache.set("name", "cache", NO_EXPIRATION);
//! assert!(cache.increment("name", 1).is_err());
//! assert!(cache.increment("missing", 1).is_ok());
//! ```
//!
//! Thread-safe usage across multiple threads:
//!
//! ```rust
//! use chain_cache::{Cache, NO_EXPIRATION, Value};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(Cache::new());
//! cache.set("key1", "value1", NO_EXPIRATION);
//!
//! let cache_in_arc = Arc::clone(&cache);
//! let handle = thread::spawn(move || {
//!     cache_in_arc.set("key2", "value2", NO_EXPIRATION);
//! });
//!
//! handle.join().unwrap();
//!
//! assert_eq!(cache.get("key1"), Some(Value::from("value1")));
//! assert_eq!(cache.get("key2"), Some(Value::from("value2")));
//! ```

#![forbid(unsafe_code)]
pub mod cache;
pub mod error;

pub use cache::Cache;
pub use cache::NO_EXPIRATION;
pub use cache::value::Value;
pub use error::CacheError;
