//! Errors raised while resolving a scene descriptor.
//!
//! Every variant is fatal to scene construction: a scene is never built from
//! a partially resolved descriptor.

use thiserror::Error;

/// Failure to produce a [`SceneDescriptor`](crate::descriptor::SceneDescriptor).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The content pack could not be reached.
    #[error("fetching descriptor from '{url}' failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The content pack endpoint answered with a non-success status.
    #[error("fetching descriptor from '{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The descriptor document is not a JSON object of the expected shape.
    #[error("descriptor is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// A required actor identifier resolved to an empty string.
    #[error("descriptor field '{0}' resolved to an empty identifier")]
    MissingIdentifier(&'static str),

    /// The fetch worker exited without delivering a result.
    #[error("descriptor fetch for '{url}' ended without a result")]
    FetchAbandoned { url: String },
}

/// Result alias for descriptor resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;
