//! Discmeta: a pluggable metadata crawler core
//!
//! This crate fetches structured metadata records for items identified by a
//! catalog code, by querying one of several independent source websites. Each
//! source gets its own crawler implementation behind one shared interface, so
//! an orchestrator can drive heterogeneous sources identically: resolve a
//! working endpoint (sources mirror themselves across domains/regions),
//! bootstrap an authenticated session where a source requires it, classify
//! failures into a taxonomy the orchestrator can act on, and map each page
//! structure into one canonical record shape.

pub mod config;
pub mod crawler;
pub mod cropper;
pub mod net;
pub mod record;

use crawler::SourceId;
use thiserror::Error;

/// Main error type for crawl operations
///
/// The orchestrator branches on the variant to decide retry/skip/abort:
/// `SourceUnavailable`, `ItemNotFound` and `SourceBlocked` are terminal for
/// the source or item; the transport-level variants are retry-eligible (see
/// [`CrawlError::is_retryable`]).
#[derive(Debug, Error)]
pub enum CrawlError {
    // The source identity field is deliberately not named `source`: that
    // name is reserved by thiserror for an underlying std::error::Error
    #[error("No reachable endpoint for source '{source_id}'")]
    SourceUnavailable { source_id: SourceId },

    #[error("Source '{source_id}' has no data for '{identifier}'")]
    ItemNotFound {
        source_id: SourceId,
        identifier: String,
    },

    #[error("Source '{source_id}' blocked the request: {message}")]
    SourceBlocked { source_id: SourceId, message: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CrawlError {
    /// Returns true if the failure is transient and the same call may
    /// succeed on a later attempt
    ///
    /// `ItemNotFound` is a confirmed semantic absence and `SourceBlocked`
    /// will reproduce from the same network, so neither is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlError::Http { .. } | CrawlError::Transport { .. } | CrawlError::Reqwest(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{build_crawler, Crawler};
pub use net::EndpointResolver;
pub use record::MetadataRecord;
