//! Run report
//!
//! Tallies what a run attempted and produced, and renders it for the
//! console.

use crate::output::traits::ItemEntry;
use crate::state::RunPhase;
use std::path::PathBuf;

/// A song that was attempted but produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Zero-based position in the selected song list
    pub index: usize,
    pub url: String,
    pub reason: String,
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub artist: String,
    pub output_dir: PathBuf,

    /// Phase the run ended in
    pub phase: RunPhase,

    /// Number of songs in the selected list
    pub selected: usize,

    /// Index the iteration started from
    pub start_index: usize,

    /// Songs fetched during this run
    pub attempted: usize,

    /// Files written for successfully extracted songs
    pub extracted: Vec<ItemEntry>,

    /// Songs that failed, with the reason
    pub failures: Vec<ItemFailure>,

    /// Combined output file, when one was written
    pub combined_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new(artist: &str, output_dir: PathBuf) -> Self {
        Self {
            artist: artist.to_string(),
            output_dir,
            phase: RunPhase::Resolving,
            selected: 0,
            start_index: 0,
            attempted: 0,
            extracted: Vec::new(),
            failures: Vec::new(),
            combined_path: None,
        }
    }

    /// Returns the success rate of attempted songs as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        (self.extracted.len() as f64 / self.attempted as f64) * 100.0
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("\n=== Run Summary ===\n");
    println!("  Artist: {}", report.artist);
    println!("  Final phase: {}", report.phase);
    println!("  Songs selected: {}", report.selected);
    if report.start_index > 0 {
        println!("  Resumed at song: {}", report.start_index + 1);
    }
    println!("  Songs attempted: {}", report.attempted);
    println!(
        "  Songs extracted: {} ({:.1}%)",
        report.extracted.len(),
        report.success_rate()
    );

    if !report.failures.is_empty() {
        println!("\nFailed songs ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {}. {} - {}", failure.index + 1, failure.url, failure.reason);
        }
    }

    if !report.extracted.is_empty() {
        println!("\nSuccess! Extracted {} songs.", report.extracted.len());
        println!("Output directory: {}", report.output_dir.display());
    }
}
