//! Error types for lrumemo

use std::fmt;

/// Result type alias for lrumemo construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a cache
///
/// Failures of the memoized function are never wrapped in this type;
/// `try_get` hands them back to the caller as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Capacity of zero requested
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Capacity must be greater than 0"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ZeroCapacity.to_string(),
            "Capacity must be greater than 0"
        );
    }
}
