//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: The phase a scraping run is in (resolving, listing, iterating, ...)
//! - `CrawlState`: The persisted checkpoint a later run resumes from

mod checkpoint;
mod run_phase;

// Re-export main types
pub use checkpoint::{
    checkpoint_path, clear_checkpoint, load_checkpoint, save_checkpoint, CrawlState,
    CHECKPOINT_FILE,
};
pub use run_phase::RunPhase;
