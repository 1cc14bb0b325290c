//! LyricMiner main entry point
//!
//! This is the command-line interface for the LyricMiner lyrics scraper.

use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use lyric_miner::config::{load_config_or_default, validate, Config, OutputFormat};
use lyric_miner::crawler::{Coordinator, RunOptions, SelectionPrompt};
use lyric_miner::output::print_report;
use lyric_miner::url::item_name;
use lyric_miner::MinerError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// LyricMiner: a resumable lyrics scraper
///
/// LyricMiner finds an artist on the lyrics site, lets you pick songs,
/// and extracts their lyrics one request at a time with randomized
/// delays. Interrupted or blocked runs can be resumed.
#[derive(Parser, Debug)]
#[command(name = "lyric-miner")]
#[command(version)]
#[command(about = "Resumable lyrics extractor", long_about = None)]
struct Cli {
    /// Artist name (required unless resuming)
    #[arg(short, long)]
    artist: Option<String>,

    /// Proxy address (e.g., http://127.0.0.1:8080)
    #[arg(long)]
    proxy: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<String>,

    /// Minimum delay between requests in seconds
    #[arg(long)]
    min_delay: Option<f64>,

    /// Maximum delay between requests in seconds
    #[arg(long)]
    max_delay: Option<f64>,

    /// Timeout for each song request in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Song selection ("all", "none", or e.g. "1-5,8"); prompts when omitted
    #[arg(long)]
    select: Option<String>,

    /// Test mode: extract only the first song
    #[arg(long)]
    test: bool,

    /// Resume from the saved state in the output directory
    #[arg(long)]
    resume: bool,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Failures are reported on the console; the exit status stays 0
    if let Err(e) = run(&cli).await {
        println!("✗ {:#}", e);
    }

    Ok(())
}

/// Builds the configuration and drives one scraping run
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = build_config(cli)?;

    let options = RunOptions {
        artist: cli.artist.clone(),
        resume: cli.resume,
        test_mode: cli.test,
        selection: cli.select.clone(),
    };

    let mut coordinator = Coordinator::new(config.clone())
        .context("Failed to set up the scraper")?
        .with_prompt(TerminalPrompt);

    match coordinator.run(&options).await {
        Ok(report) => print_report(&report),
        Err(e) => {
            report_error(&e, &config, coordinator.output_dir().display().to_string());
            if let Some(report) = coordinator.last_report() {
                if report.attempted > 0 {
                    print_report(report);
                }
            }
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lyric_miner=info,warn"),
            1 => EnvFilter::new("lyric_miner=debug,info"),
            2 => EnvFilter::new("lyric_miner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(proxy) = &cli.proxy {
        config.fetcher.proxy = Some(proxy.clone());
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(min_delay) = cli.min_delay {
        config.pacing.min_delay = min_delay;
    }
    if let Some(max_delay) = cli.max_delay {
        config.pacing.max_delay = max_delay;
    }
    if let Some(timeout) = cli.timeout {
        config.fetcher.item_timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Prints a fatal run error with the operator action it calls for
fn report_error(error: &MinerError, config: &Config, output_dir: String) {
    match error {
        MinerError::Blocked { url, reason } => {
            println!("✗ BLOCK DETECTED while accessing {} ({})", url, reason);
            println!("Please visit {} in your browser,", config.site.base_url);
            println!("complete the CAPTCHA, then try again later with --resume.");
        }
        MinerError::CorruptCheckpoint { path, source } => {
            println!("✗ Saved state at {} could not be read: {}", path, source);
            println!("Inspect or remove it before running again.");
        }
        MinerError::NothingExtracted { .. } => {
            println!("\nNo lyrics were extracted. Please check the error messages.");
            println!("Progress is kept in {}; rerun with --resume to continue.", output_dir);
        }
        MinerError::NoItems { artist } => {
            println!("No songs found for {}", artist);
        }
        other => {
            println!("✗ {}", other);
        }
    }
}

/// Numbered song list shown before asking for a selection
fn selection_listing(items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. {}", i + 1, item_name(url)))
        .collect()
}

/// Interactive selection on the terminal
struct TerminalPrompt;

impl SelectionPrompt for TerminalPrompt {
    fn ask(&mut self, items: &[String]) -> String {
        println!("\n=== SONG SELECTION ===");
        println!("Found {} songs. Select which ones to process:", items.len());
        for line in selection_listing(items) {
            println!("{}", line);
        }

        println!("\nEnter song numbers (comma separated) or ranges (e.g., 1-5)");
        println!("Type 'all' for all songs or 'none' to skip");

        match Input::<String>::new()
            .with_prompt("Your selection")
            .allow_empty(true)
            .interact_text()
        {
            Ok(expr) => expr,
            Err(e) => {
                tracing::warn!("Could not read selection ({}). Processing all songs.", e);
                "all".to_string()
            }
        }
    }
}
