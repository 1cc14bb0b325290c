use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for LyricMiner
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
}

/// Lyrics site location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL every index, artist and song path is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.azlyrics.com/".to_string(),
        }
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Timeout for each song page request (seconds)
    #[serde(rename = "item-timeout-secs")]
    pub item_timeout_secs: u64,

    /// Timeout for the artist index and listing requests (seconds)
    #[serde(rename = "listing-timeout-secs")]
    pub listing_timeout_secs: u64,

    /// Forwarding proxy for every request, direct when absent
    pub proxy: Option<String>,
}

impl FetcherConfig {
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            item_timeout_secs: 10,
            listing_timeout_secs: 30,
            proxy: None,
        }
    }
}

/// Delay window drawn from before every song request
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Lower bound of the delay (seconds, inclusive)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the delay (seconds, inclusive)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay: 3.0,
            max_delay: 10.0,
        }
    }
}

/// Where and how results are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding per-song files, aggregates and the checkpoint
    pub directory: String,

    /// File format for per-song and combined output
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "lyrics_output".to_string(),
            format: OutputFormat::Txt,
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, lyrics only
    #[default]
    Txt,

    /// Structured JSON record
    Json,
}
