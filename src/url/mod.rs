//! URL handling module for LyricMiner
//!
//! This module builds the site URLs the crawler visits (artist index
//! buckets, absolute song URLs), derives item names from song URLs, and
//! compares URL authorities for redirect block detection.

mod domain;
mod site;

// Re-export main functions
pub use domain::{authority, is_cross_domain};
pub use site::{index_bucket, item_name, SiteUrls};
