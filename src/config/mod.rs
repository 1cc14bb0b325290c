//! Configuration module for LyricMiner
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has defaults, so a run without a file
//! behaves like a run with an empty one.
//!
//! # Example
//!
//! ```no_run
//! use lyric_miner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("miner.toml")).unwrap();
//! println!("Items time out after {}s", config.fetcher.item_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, OutputConfig, OutputFormat, PacingConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
