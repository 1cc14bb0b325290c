//! Run coordinator - main scraping orchestration logic
//!
//! This module drives one run through its phases:
//! - Resolving the artist page from the first-letter index
//! - Listing and selecting songs
//! - Fetching songs one at a time with paced delays
//! - Checkpointing after every attempted song
//! - Writing aggregate output and clearing the checkpoint

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::crawler::pacing::{Pacing, RandomPacing};
use crate::crawler::parser::{extract_item_links, extract_text, find_artist_path};
use crate::crawler::selection::{Selection, SelectionPrompt};
use crate::output::{
    handler_for, write_metadata, ItemFailure, LyricsRecord, OutputHandler, RunMetadata, RunReport,
};
use crate::state::{clear_checkpoint, load_checkpoint, save_checkpoint, RunPhase};
use crate::url::{item_name, SiteUrls};
use crate::MinerError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Per-invocation options
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Artist to scrape; required unless a checkpoint is resumed
    pub artist: Option<String>,

    /// Continue from the checkpoint in the output directory if one exists
    pub resume: bool,

    /// Only process the first song; the checkpoint is left untouched
    pub test_mode: bool,

    /// Selection expression; when absent the prompt is asked
    pub selection: Option<String>,
}

/// Main scraping coordinator
pub struct Coordinator {
    config: Config,
    site: SiteUrls,
    client: Client,
    pacing: Box<dyn Pacing>,
    prompt: Option<Box<dyn SelectionPrompt>>,
    output: Box<dyn OutputHandler>,
    output_dir: PathBuf,
    phase: RunPhase,
    last_report: Option<RunReport>,
}

impl Coordinator {
    /// Creates a new coordinator with random pacing and no prompt
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MinerError)` - Invalid base URL or HTTP client failure
    pub fn new(config: Config) -> Result<Self, MinerError> {
        let site = SiteUrls::new(&config.site.base_url)?;
        let client = build_http_client(&config.fetcher)?;
        let output_dir = PathBuf::from(&config.output.directory);
        let output = handler_for(config.output.format, output_dir.clone());

        Ok(Self {
            config,
            site,
            client,
            pacing: Box::new(RandomPacing),
            prompt: None,
            output,
            output_dir,
            phase: RunPhase::Resolving,
            last_report: None,
        })
    }

    /// Replaces the pacing strategy
    pub fn with_pacing(mut self, pacing: impl Pacing + 'static) -> Self {
        self.pacing = Box::new(pacing);
        self
    }

    /// Sets the prompt asked when no selection expression is given
    pub fn with_prompt(mut self, prompt: impl SelectionPrompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    /// Phase the current or most recent run is in
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Report of the most recent run, including runs that ended in an error
    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Directory results and the checkpoint are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Runs one scrape from resolution (or resume) to completion
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run reached `Done`
    /// * `Err(MinerError)` - The run stopped in `Blocked` or `Failed`
    pub async fn run(&mut self, options: &RunOptions) -> Result<RunReport, MinerError> {
        self.phase = RunPhase::Resolving;
        let mut report = RunReport::new(
            options.artist.as_deref().unwrap_or_default(),
            self.output_dir.clone(),
        );

        let result = self.run_phases(options, &mut report).await;

        if let Err(e) = &result {
            let exit = match e {
                MinerError::Blocked { .. } => RunPhase::Blocked,
                _ => RunPhase::Failed,
            };
            self.transition(exit);
        }

        report.phase = self.phase;
        self.last_report = Some(report.clone());
        result.map(|()| report)
    }

    async fn run_phases(
        &mut self,
        options: &RunOptions,
        report: &mut RunReport,
    ) -> Result<(), MinerError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let resumed = if options.resume {
            match load_checkpoint(&self.output_dir)? {
                Some(state) => {
                    tracing::info!("Resuming previous session for {}", state.artist);
                    if state.is_exhausted() {
                        tracing::warn!(
                            "Saved state for {} has no songs left to process",
                            state.artist
                        );
                    }
                    Some(state)
                }
                None => {
                    tracing::info!(
                        "No saved state in {}, starting a new session",
                        self.output_dir.display()
                    );
                    None
                }
            }
        } else {
            None
        };

        let (artist, items, start_index) = match resumed {
            Some(state) => {
                let start = state.resume_index();
                (state.artist, state.item_urls, start)
            }
            None => {
                let artist = options
                    .artist
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .ok_or(MinerError::MissingArtist)?
                    .to_string();
                report.artist = artist.clone();

                let artist_url = self.resolve_artist(&artist).await?;

                self.transition(RunPhase::Listing);
                let listed = self.list_items(&artist, &artist_url).await?;

                self.transition(RunPhase::Selecting);
                let selected = self.select_items(&listed, options);
                if selected.is_empty() {
                    tracing::info!("No songs selected. Exiting.");
                    self.transition(RunPhase::Done);
                    return Ok(());
                }

                if !options.test_mode {
                    save_checkpoint(&artist, &selected, -1, &self.output_dir)?;
                }
                (artist, selected, 0)
            }
        };
        report.artist = artist.clone();

        let (items, start_index) = if options.test_mode {
            tracing::info!("Test mode: extracting first song only");
            (items.into_iter().take(1).collect(), 0)
        } else {
            (items, start_index)
        };

        self.transition(RunPhase::Iterating);
        let records = self
            .iterate(&artist, &items, start_index, !options.test_mode, report)
            .await?;

        self.transition(RunPhase::Finalizing);
        if records.is_empty() {
            tracing::warn!("No lyrics were extracted. Please check the error messages.");
            return Err(MinerError::NothingExtracted {
                attempted: report.attempted,
            });
        }

        let combined = self
            .output
            .write_combined(&artist, &records, &report.extracted)?;
        write_metadata(
            &self.output_dir,
            &RunMetadata::new(&artist, report.extracted.clone()),
        )?;
        report.combined_path = Some(combined);

        if !options.test_mode {
            clear_checkpoint(&self.output_dir)?;
        }

        self.transition(RunPhase::Done);
        Ok(())
    }

    /// Looks up the artist page on its first-letter index page
    async fn resolve_artist(&self, artist: &str) -> Result<Url, MinerError> {
        tracing::info!("Searching for artist: {}", artist);
        let index_url = self.site.artist_index_url(artist)?;
        let body = self.fetch_listing_page(&index_url).await?;

        let path = find_artist_path(&body, artist).ok_or_else(|| MinerError::ArtistNotFound {
            artist: artist.to_string(),
        })?;
        let artist_url = self.site.resolve(&path)?;

        tracing::info!("Found artist page: {}", artist_url);
        Ok(artist_url)
    }

    /// Fetches the artist page and returns absolute song URLs
    async fn list_items(&self, artist: &str, artist_url: &Url) -> Result<Vec<String>, MinerError> {
        tracing::info!("Fetching artist song list...");
        let body = self.fetch_listing_page(artist_url).await?;

        let items: Vec<String> = extract_item_links(&body)
            .iter()
            .filter_map(|path| match self.site.resolve(path) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    tracing::debug!("Skipping unresolvable song link {}: {}", path, e);
                    None
                }
            })
            .collect();

        if items.is_empty() {
            return Err(MinerError::NoItems {
                artist: artist.to_string(),
            });
        }

        tracing::info!("Found {} songs for {}", items.len(), artist);
        Ok(items)
    }

    fn select_items(&mut self, items: &[String], options: &RunOptions) -> Vec<String> {
        let expr = match (&options.selection, self.prompt.as_mut()) {
            (Some(expr), _) => expr.clone(),
            (None, Some(prompt)) => prompt.ask(items),
            (None, None) => "all".to_string(),
        };

        let selected = Selection::parse(&expr).apply(items);
        tracing::debug!("Selected {} of {} songs", selected.len(), items.len());
        selected
    }

    /// Processes songs from `start_index` to the end of `items`
    ///
    /// The checkpoint is rewritten after every attempted song when
    /// `persist` is set. A block ends the loop immediately and leaves the
    /// checkpoint at the previous song.
    async fn iterate(
        &mut self,
        artist: &str,
        items: &[String],
        start_index: usize,
        persist: bool,
        report: &mut RunReport,
    ) -> Result<Vec<LyricsRecord>, MinerError> {
        report.selected = items.len();
        report.start_index = start_index;

        tracing::info!(
            "Starting lyrics extraction with random delay between {}-{} seconds...",
            self.config.pacing.min_delay,
            self.config.pacing.max_delay
        );

        let mut records = Vec::new();

        for (index, url) in items.iter().enumerate().skip(start_index) {
            let name = item_name(url);
            tracing::info!("Processing song {}/{}: {}", index + 1, items.len(), name);

            let delay = self.pacing.delay(&self.config.pacing);
            tokio::time::sleep(delay).await;
            report.attempted += 1;

            match self.fetch_item(url).await {
                Ok(text) => {
                    let record = LyricsRecord {
                        artist: artist.to_string(),
                        item: name.clone(),
                        url: url.clone(),
                        text,
                    };
                    let entry = self.output.write_item(&record)?;
                    tracing::info!(
                        "✓ Extracted lyrics from {} (Delay: {:.1}s)",
                        name,
                        delay.as_secs_f64()
                    );
                    records.push(record);
                    report.extracted.push(entry);
                }
                Err(e @ MinerError::Blocked { .. }) => {
                    tracing::error!("✗ BLOCK DETECTED while accessing {}", url);
                    return Err(e);
                }
                Err(e) if e.is_item_failure() => {
                    tracing::warn!("× {}", e);
                    report.failures.push(ItemFailure {
                        index,
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }

            if persist {
                save_checkpoint(artist, items, index as i64, &self.output_dir)?;
            }
        }

        Ok(records)
    }

    /// Fetches one song page and extracts its lyrics
    async fn fetch_item(&self, url: &str) -> Result<String, MinerError> {
        let parsed = Url::parse(url).map_err(|e| MinerError::Transport {
            url: url.to_string(),
            status: None,
            message: format!("invalid URL: {}", e),
        })?;

        let page = fetch_url(
            &self.client,
            &parsed,
            self.pacing.user_agent(),
            self.config.fetcher.item_timeout(),
        )
        .await
        .into_page(url)?;

        match extract_text(&page.body) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(MinerError::ExtractionMiss {
                url: url.to_string(),
            }),
        }
    }

    async fn fetch_listing_page(&self, url: &Url) -> Result<String, MinerError> {
        let timeout: Duration = self.config.fetcher.listing_timeout();
        let page = fetch_url(&self.client, url, self.pacing.user_agent(), timeout)
            .await
            .into_page(url.as_str())?;
        Ok(page.body)
    }

    fn transition(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!("Phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Runs a scrape with a fresh coordinator
///
/// # Example
///
/// ```no_run
/// use lyric_miner::config::Config;
/// use lyric_miner::crawler::{run_scrape, RunOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = RunOptions {
///     artist: Some("Adele".to_string()),
///     selection: Some("1-3".to_string()),
///     ..RunOptions::default()
/// };
/// let report = run_scrape(Config::default(), &options).await?;
/// println!("{} songs extracted", report.extracted.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, options: &RunOptions) -> Result<RunReport, MinerError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(options).await
}
