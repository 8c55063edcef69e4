//! Error types for color space construction and conversion.

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that occurred while constructing a color space, building a color
/// or converting to RGB.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The object could not be classified as any known color space construct.
    #[error("unrecognized color space construct: {0}")]
    Classification(String),
    /// An object had a different kind than the one required in its position.
    #[error("{context}: expected {expected}")]
    Type {
        /// Where the mismatch occurred.
        context: String,
        /// The kind of object that was required.
        expected: &'static str,
    },
    /// A component or array length did not match its fixed cardinality.
    #[error("{context}: expected {expected} entries, found {found}")]
    Arity {
        /// Where the mismatch occurred.
        context: &'static str,
        /// The required number of entries.
        expected: usize,
        /// The number of entries that was found.
        found: usize,
    },
    /// A numeric value was outside its declared domain.
    #[error("{context}: value {value} outside of [{min}, {max}]")]
    Range {
        /// Where the violation occurred.
        context: &'static str,
        /// The offending value.
        value: f32,
        /// Lower bound of the declared domain.
        min: f32,
        /// Upper bound of the declared domain.
        max: f32,
    },
    /// A tint transform failed or produced output of the wrong arity.
    #[error("tint transform evaluation failed: {0}")]
    Eval(String),
    /// A required dictionary key was absent.
    #[error("missing required key {0}")]
    MissingKey(String),
}

impl Error {
    /// Create a [`Error::MissingKey`] from a raw key.
    pub(crate) fn missing_key(key: &[u8]) -> Self {
        Self::MissingKey(String::from_utf8_lossy(key).into_owned())
    }

    /// Create a [`Error::Type`] for the given dictionary key.
    pub(crate) fn key_type(key: &[u8], expected: &'static str) -> Self {
        Self::Type {
            context: String::from_utf8_lossy(key).into_owned(),
            expected,
        }
    }
}
