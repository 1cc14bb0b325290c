//! Output module for persisting extracted lyrics
//!
//! This module handles:
//! - Writing one file per extracted song, as plain text or JSON
//! - Writing the combined lyrics file and the run metadata record
//! - Summarizing a run for the console

mod json;
pub mod stats;
mod text;
mod traits;

pub use json::{write_metadata, CombinedRecord, JsonOutput, RunMetadata};
pub use stats::{print_report, ItemFailure, RunReport};
pub use text::TextOutput;
pub use traits::{join_texts, ItemEntry, LyricsRecord, OutputError, OutputHandler, OutputResult};

use crate::config::OutputFormat;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// File stem of the combined lyrics file
pub const COMBINED_STEM: &str = "combined_lyrics";

/// File name of the run metadata record
pub const METADATA_FILE: &str = "metadata.json";

/// Creates the output handler for a format
pub fn handler_for(format: OutputFormat, dir: impl Into<PathBuf>) -> Box<dyn OutputHandler> {
    match format {
        OutputFormat::Txt => Box::new(TextOutput::new(dir)),
        OutputFormat::Json => Box::new(JsonOutput::new(dir)),
    }
}

/// Replaces every character that is not a word character, hyphen,
/// underscore, period or space with `_`
///
/// # Examples
///
/// ```
/// use lyric_miner::output::sanitize_file_stem;
///
/// assert_eq!(sanitize_file_stem("don't stop/me now"), "don_t stop_me now");
/// ```
pub fn sanitize_file_stem(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^\w\-_. ]").expect("valid regex"));
    unsafe_chars.replace_all(name, "_").into_owned()
}

/// Builds the per-song file name for an item identifier
pub fn item_file_name(item: &str, extension: &str) -> String {
    format!("{}.{}", sanitize_file_stem(item), extension)
}
