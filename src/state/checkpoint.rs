//! Resumable crawl checkpoint
//!
//! The checkpoint is a single JSON record at a fixed name inside the output
//! directory. It is rewritten after every attempted song and removed once
//! the selected songs have all been processed.

use crate::MinerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the checkpoint inside the output directory
pub const CHECKPOINT_FILE: &str = "state.json";

/// Persisted crawl progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlState {
    /// Artist the song list belongs to
    pub artist: String,

    /// Selected song URLs in site listing order
    pub item_urls: Vec<String>,

    /// Index of the last attempted song, `-1` before the first attempt
    pub processed_index: i64,

    /// Output directory the run writes into
    pub output_dir: String,
}

impl CrawlState {
    /// Index of the first song a resumed run must attempt
    pub fn resume_index(&self) -> usize {
        let next = self.processed_index.saturating_add(1).max(0);
        usize::try_from(next).unwrap_or(usize::MAX)
    }

    /// Returns true if every song has been attempted
    pub fn is_exhausted(&self) -> bool {
        self.resume_index() >= self.item_urls.len()
    }
}

/// Returns the checkpoint path for an output directory
pub fn checkpoint_path(dir: &Path) -> PathBuf {
    dir.join(CHECKPOINT_FILE)
}

/// Writes the checkpoint, replacing any previous one
///
/// # Arguments
///
/// * `artist` - Artist being scraped
/// * `items` - Full selected song list
/// * `last_index` - Index of the song just attempted (`-1` for none)
/// * `dir` - Output directory holding the checkpoint
pub fn save_checkpoint(
    artist: &str,
    items: &[String],
    last_index: i64,
    dir: &Path,
) -> Result<CrawlState, MinerError> {
    let state = CrawlState {
        artist: artist.to_string(),
        item_urls: items.to_vec(),
        processed_index: last_index,
        output_dir: dir.to_string_lossy().into_owned(),
    };

    let json = serde_json::to_string(&state).map_err(crate::OutputError::from)?;
    fs::write(checkpoint_path(dir), json)?;

    tracing::trace!("Checkpoint saved at index {}", last_index);
    Ok(state)
}

/// Loads the checkpoint from an output directory
///
/// # Returns
///
/// * `Ok(Some(CrawlState))` - A checkpoint exists and parsed cleanly
/// * `Ok(None)` - No checkpoint file exists
/// * `Err(MinerError::CorruptCheckpoint)` - The file exists but is malformed
pub fn load_checkpoint(dir: &Path) -> Result<Option<CrawlState>, MinerError> {
    let path = checkpoint_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| MinerError::CorruptCheckpoint {
            path: path.display().to_string(),
            source,
        })
}

/// Removes the checkpoint, ignoring a missing file
pub fn clear_checkpoint(dir: &Path) -> Result<(), MinerError> {
    match fs::remove_file(checkpoint_path(dir)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
