//! Crawler module for song page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with block detection
//! - Markup extraction of artist, song and lyrics data
//! - Request pacing (identity and delay strategies)
//! - Song selection
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod pacing;
mod parser;
mod selection;

pub use coordinator::{run_scrape, Coordinator, RunOptions};
pub use fetcher::{build_http_client, detect_block, fetch_url, FetchResult, FetchedPage, BLOCK_MARKERS};
pub use pacing::{FixedPacing, Pacing, RandomPacing, USER_AGENTS};
pub use parser::{
    extract_artist_entries, extract_item_links, extract_text, find_artist_path, ArtistEntry,
    LYRICS_DELIMITER,
};
pub use selection::{FixedSelection, Selection, SelectionPart, SelectionPrompt};
