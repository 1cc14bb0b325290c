//! Plain text output
//!
//! Per-song files hold the lyrics only; the combined file holds every
//! song's lyrics separated by a blank line.

use crate::output::traits::{
    join_texts, write_file, ItemEntry, LyricsRecord, OutputHandler, OutputResult,
};
use crate::output::{item_file_name, COMBINED_STEM};
use std::path::PathBuf;

/// Writes `.txt` files
#[derive(Debug, Clone)]
pub struct TextOutput {
    dir: PathBuf,
}

impl TextOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputHandler for TextOutput {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write_item(&self, record: &LyricsRecord) -> OutputResult<ItemEntry> {
        let file = item_file_name(&record.item, self.extension());
        write_file(&self.dir.join(&file), &record.text)?;

        Ok(ItemEntry {
            artist: record.artist.clone(),
            item: record.item.clone(),
            url: record.url.clone(),
            file,
        })
    }

    fn write_combined(
        &self,
        _artist: &str,
        records: &[LyricsRecord],
        _entries: &[ItemEntry],
    ) -> OutputResult<PathBuf> {
        let path = self
            .dir
            .join(format!("{}.{}", COMBINED_STEM, self.extension()));
        write_file(&path, &join_texts(records))?;
        Ok(path)
    }
}
