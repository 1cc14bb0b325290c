//! LyricMiner: a resumable lyrics scraper
//!
//! This crate resolves an artist on a single lyrics site, enumerates the
//! artist's song pages, fetches them one at a time with randomized pacing,
//! and persists the extracted lyrics together with a resumable checkpoint.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

pub use output::OutputError;

/// Main error type for LyricMiner operations
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Artist '{artist}' not found")]
    ArtistNotFound { artist: String },

    #[error("No songs found for {artist}")]
    NoItems { artist: String },

    #[error("Block detected while accessing {url}: {reason}")]
    Blocked { url: String, reason: BlockReason },

    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Could not extract lyrics from {url}")]
    ExtractionMiss { url: String },

    #[error("Checkpoint at {path} is unreadable: {source}")]
    CorruptCheckpoint {
        path: String,
        source: serde_json::Error,
    },

    #[error("No lyrics were extracted from {attempted} attempted songs")]
    NothingExtracted { attempted: usize },

    #[error("Artist name is required when not resuming")]
    MissingArtist,

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MinerError {
    /// Returns true if this error only affects a single item
    pub fn is_item_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ExtractionMiss { .. })
    }
}

/// Why a response was classified as an anti-scraping block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// A redirect pointed at a different host
    CrossDomainRedirect { location: String },

    /// The body carried a known challenge marker
    ChallengeMarker { marker: &'static str },
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CrossDomainRedirect { location } => {
                write!(f, "redirected off-site to {}", location)
            }
            Self::ChallengeMarker { marker } => write!(f, "challenge marker '{}' in page", marker),
        }
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

/// Result type alias for LyricMiner operations
pub type Result<T> = std::result::Result<T, MinerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunOptions};
pub use state::{CrawlState, RunPhase};
