//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A fractional setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// An integral setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Embedding dimension must be nonzero.
    #[error("embedding dimension must be nonzero")]
    ZeroEmbeddingDim,

    /// A weight or floor setting sits outside `[0, 1]`.
    #[error("{name} = {value} is outside [0, 1]")]
    OutOfUnitRange { name: &'static str, value: f32 },

    /// A threshold pair is not ordered `medium <= high`.
    #[error("{name} thresholds are not ordered: medium {medium} > high {high}")]
    UnorderedThresholds {
        name: &'static str,
        medium: f32,
        high: f32,
    },
}
