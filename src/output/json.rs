//! JSON output and the run metadata record

use crate::output::traits::{
    join_texts, write_file, ItemEntry, LyricsRecord, OutputHandler, OutputResult,
};
use crate::output::{item_file_name, COMBINED_STEM, METADATA_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Combined JSON file written at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub artist: String,
    pub total_items: usize,
    pub items: Vec<ItemEntry>,
    pub all_text: String,
}

/// Metadata record describing a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub artist: String,
    pub total_items: usize,
    pub items: Vec<ItemEntry>,

    /// Local completion time, `%Y-%m-%d %H:%M:%S`
    pub created: String,
}

impl RunMetadata {
    /// Builds the metadata record stamped with the current local time
    pub fn new(artist: &str, items: Vec<ItemEntry>) -> Self {
        Self {
            artist: artist.to_string(),
            total_items: items.len(),
            items,
            created: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Writes the metadata record into `dir`
pub fn write_metadata(dir: &Path, metadata: &RunMetadata) -> OutputResult<PathBuf> {
    let path = dir.join(METADATA_FILE);
    write_file(&path, &serde_json::to_string_pretty(metadata)?)?;
    Ok(path)
}

/// Writes `.json` files
#[derive(Debug, Clone)]
pub struct JsonOutput {
    dir: PathBuf,
}

impl JsonOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputHandler for JsonOutput {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write_item(&self, record: &LyricsRecord) -> OutputResult<ItemEntry> {
        let file = item_file_name(&record.item, self.extension());
        write_file(&self.dir.join(&file), &serde_json::to_string_pretty(record)?)?;

        Ok(ItemEntry {
            artist: record.artist.clone(),
            item: record.item.clone(),
            url: record.url.clone(),
            file,
        })
    }

    fn write_combined(
        &self,
        artist: &str,
        records: &[LyricsRecord],
        entries: &[ItemEntry],
    ) -> OutputResult<PathBuf> {
        let combined = CombinedRecord {
            artist: artist.to_string(),
            total_items: records.len(),
            items: entries.to_vec(),
            all_text: join_texts(records),
        };

        let path = self
            .dir
            .join(format!("{}.{}", COMBINED_STEM, self.extension()));
        write_file(&path, &serde_json::to_string_pretty(&combined)?)?;
        Ok(path)
    }
}
