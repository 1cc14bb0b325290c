//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! records they write.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Lyrics extracted from one song page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsRecord {
    pub artist: String,

    /// Song identifier derived from the page URL
    pub item: String,

    /// Source page URL
    pub url: String,

    /// Extracted lyrics
    pub text: String,
}

/// Reference to a written per-song file, as listed in the metadata record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub artist: String,
    pub item: String,
    pub url: String,

    /// File name relative to the output directory
    pub file: String,
}

/// Trait for output handlers
///
/// One handler exists per output format. Handlers only ever create or
/// replace files inside their output directory.
pub trait OutputHandler {
    /// File extension of everything this handler writes
    fn extension(&self) -> &'static str;

    /// Writes the per-song file for one record
    ///
    /// # Returns
    ///
    /// The metadata entry pointing at the written file
    fn write_item(&self, record: &LyricsRecord) -> OutputResult<ItemEntry>;

    /// Writes the combined file for all records of a run
    ///
    /// # Arguments
    ///
    /// * `artist` - The artist of the run
    /// * `records` - Extracted records, in processing order
    /// * `entries` - Metadata entries of the per-song files
    fn write_combined(
        &self,
        artist: &str,
        records: &[LyricsRecord],
        entries: &[ItemEntry],
    ) -> OutputResult<PathBuf>;
}

/// Writes `content` to `path`, tagging failures with the path
pub(crate) fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    std::fs::write(path, content).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Joins extracted texts with a blank line between songs
pub fn join_texts(records: &[LyricsRecord]) -> String {
    records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
