//! Error types for part-discovery.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while scoring catalog words.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A counted word has no entry in the supplied IDF scores.
    #[error("no IDF score for word: {word:?}")]
    MissingIdfScore {
        /// The word that could not be looked up.
        word: String,
    },
}

/// Result type alias using [`DiscoveryError`].
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
