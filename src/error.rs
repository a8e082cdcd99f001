//! Error types for the boundcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. zero capacity).
//! - [`CacheError`]: Returned by lookups and removals. `KeyNotFound` is an
//!   expected outcome on the miss path; `OnMiss` carries the failure of a
//!   miss loader unchanged.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` diagnostics).
//!
//! ## Example Usage
//!
//! ```
//! use boundcache::error::{CacheError, ConfigError};
//! use boundcache::policy::lru::LruCore;
//!
//! let bad: Result<LruCore<u32, u32>, ConfigError> = LruCore::try_new(0);
//! assert!(bad.is_err());
//!
//! let err = CacheError::KeyNotFound;
//! assert!(err.is_key_not_found());
//! ```

use std::error::Error;
use std::fmt;

/// Boxed error produced by a miss loader.
pub type MissError = Box<dyn Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on
/// [`RecencyList`](crate::ds::RecencyList) and
/// [`RecencyCore`](crate::policy::engine::RecencyCore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`RecencyCore::try_new`](crate::policy::engine::RecencyCore::try_new) and
/// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use boundcache::policy::lri::LriCore;
///
/// let err = LriCore::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::new("expected capacity > 0, got 0")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ConfigError {}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache lookups and removals.
#[derive(Debug)]
pub enum CacheError {
    /// The key is absent and no fallback applied.
    KeyNotFound,
    /// The miss loader failed; nothing was inserted.
    OnMiss(MissError),
}

impl CacheError {
    /// Returns `true` for [`CacheError::KeyNotFound`].
    #[inline]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, CacheError::KeyNotFound)
    }

    /// Returns the loader error, if this is [`CacheError::OnMiss`].
    pub fn into_miss_error(self) -> Option<MissError> {
        match self {
            CacheError::OnMiss(err) => Some(err),
            CacheError::KeyNotFound => None,
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::KeyNotFound => f.write_str("key not found"),
            CacheError::OnMiss(err) => write!(f, "miss loader failed: {}", err),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CacheError::KeyNotFound => None,
            CacheError::OnMiss(err) => Some(err.as_ref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("anchor carries an entry");
        assert_eq!(err.to_string(), "anchor carries an entry");
        assert_eq!(err.message(), "anchor carries an entry");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_zero_capacity_message() {
        let err = ConfigError::zero_capacity();
        assert!(err.message().contains("capacity"));
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: Error + Send + Sync + 'static>() {}
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
        assert_error::<CacheError>();
    }

    // -- CacheError -------------------------------------------------------

    #[test]
    fn key_not_found_has_no_source() {
        let err = CacheError::KeyNotFound;
        assert!(err.is_key_not_found());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "key not found");
        assert!(err.into_miss_error().is_none());
    }

    #[test]
    fn on_miss_exposes_loader_error() {
        let loader: MissError = "engine unavailable".into();
        let err = CacheError::OnMiss(loader);
        assert!(!err.is_key_not_found());
        assert_eq!(
            err.source().map(|e| e.to_string()),
            Some("engine unavailable".to_string())
        );
        assert!(err.to_string().contains("engine unavailable"));
        let inner = err.into_miss_error().expect("loader error");
        assert_eq!(inner.to_string(), "engine unavailable");
    }
}
