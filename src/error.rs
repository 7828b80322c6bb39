use thiserror::Error;

/// Errors returned by cache operations.
///
/// The taxonomy is deliberately minimal: the only fallible operations are
/// [`increment`](crate::Cache::increment) and [`decrement`](crate::Cache::decrement),
/// and they only fail when the stored value is not numeric. Operations on
/// missing keys are silent no-ops, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The value stored under the key is not a numeric type.
    #[error("the value for key `{key}` is not numeric")]
    TypeMismatch { key: String },
}
