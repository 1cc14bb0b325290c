//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the lyrics site and drive the
//! coordinator through full runs end-to-end.

use lyric_miner::config::{Config, OutputFormat};
use lyric_miner::crawler::{Coordinator, FixedPacing, RunOptions, LYRICS_DELIMITER};
use lyric_miner::output::{LyricsRecord, RunMetadata};
use lyric_miner::state::{checkpoint_path, load_checkpoint, save_checkpoint, RunPhase};
use lyric_miner::MinerError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "TestAgent/1.0";

/// Creates a test configuration pointing at the mock site
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.output.directory = output_dir.to_string_lossy().into_owned();
    config.pacing.min_delay = 0.0;
    config.pacing.max_delay = 0.0;
    config.fetcher.item_timeout_secs = 5;
    config.fetcher.listing_timeout_secs = 5;
    config
}

fn coordinator(config: Config) -> Coordinator {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(FixedPacing::new(TEST_AGENT, Duration::ZERO))
}

fn fresh_run(selection: &str) -> RunOptions {
    RunOptions {
        artist: Some("The Band".to_string()),
        selection: Some(selection.to_string()),
        ..RunOptions::default()
    }
}

fn resume_run() -> RunOptions {
    RunOptions {
        resume: true,
        ..RunOptions::default()
    }
}

fn index_page() -> String {
    r#"<html><body><div class="container">
        <a href="t/tbone.html">T-Bone</a><br>
        <a href="t/theband.html">The Band</a><br>
        <a href="t/thebandits.html">The Bandits</a><br>
    </div></body></html>"#
        .to_string()
}

fn listing_page(songs: usize) -> String {
    let mut html = String::from(r#"<html><body><div id="listAlbum">"#);
    for i in 1..=songs {
        html.push_str(&format!(
            r#"<div class="listalbum-item"><a href="/lyrics/theband/song{}.html" target="_blank">Song {}</a></div>"#,
            i, i
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn song_page(n: usize) -> String {
    format!(
        r#"<html><body><b>"Song {n}"</b><br><br>
<div>
{delimiter}
Verse of song {n}<br>
Chorus of song {n}<br>
</div>
</body></html>"#,
        n = n,
        delimiter = LYRICS_DELIMITER
    )
}

fn song_text(n: usize) -> String {
    format!("Verse of song {n}\n\nChorus of song {n}", n = n)
}

fn song_path(n: usize) -> String {
    format!("/lyrics/theband/song{}.html", n)
}

async fn mount_index_and_listing(server: &MockServer, songs: usize) {
    Mock::given(method("GET"))
        .and(path("/t.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/t/theband.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(songs)))
        .mount(server)
        .await;
}

async fn mount_song(server: &MockServer, n: usize, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(song_path(n)))
        .respond_with(ResponseTemplate::new(200).set_body_string(song_page(n)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn song_files(dir: &Path, extension: &str) -> Vec<String> {
    let mut files: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("song") && name.ends_with(extension))
        .collect();
    files.sort();
    files
}

fn read_metadata(dir: &Path) -> RunMetadata {
    let raw = std::fs::read_to_string(dir.join("metadata.json")).expect("metadata missing");
    serde_json::from_str(&raw).expect("metadata malformed")
}

#[tokio::test]
async fn test_full_run_writes_all_outputs() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 3).await;
    for n in 1..=3 {
        mount_song(&mock_server, n, 1).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let report = coordinator.run(&fresh_run("all")).await.expect("Run failed");

    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(report.artist, "The Band");
    assert_eq!(report.selected, 3);
    assert_eq!(report.attempted, 3);
    assert_eq!(report.extracted.len(), 3);
    assert!(report.failures.is_empty());

    // Per-song files
    assert_eq!(
        song_files(output.path(), ".txt"),
        vec!["song1.txt", "song2.txt", "song3.txt"]
    );
    let first = std::fs::read_to_string(output.path().join("song1.txt")).unwrap();
    assert_eq!(first, song_text(1));

    // Aggregate outputs
    let combined = std::fs::read_to_string(output.path().join("combined_lyrics.txt")).unwrap();
    assert_eq!(
        combined,
        format!("{}\n\n{}\n\n{}", song_text(1), song_text(2), song_text(3))
    );

    let metadata = read_metadata(output.path());
    assert_eq!(metadata.artist, "The Band");
    assert_eq!(metadata.total_items, 3);
    assert_eq!(metadata.items[1].item, "song2");
    assert_eq!(metadata.items[1].file, "song2.txt");
    assert_eq!(
        metadata.items[1].url,
        format!("{}{}", mock_server.uri(), song_path(2))
    );

    // Checkpoint removed on completion
    assert!(!checkpoint_path(output.path()).exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_requests_carry_pacing_identity() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 1).await;
    Mock::given(method("GET"))
        .and(path(song_path(1)))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(song_page(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let report = coordinator(config)
        .run(&fresh_run("all"))
        .await
        .expect("Run failed");

    assert_eq!(report.extracted.len(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_artist_not_found() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/t.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="t/theband2.html">The Band 2</a><a href="t/theb.html">The B</a>"#,
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let result = coordinator.run(&fresh_run("all")).await;

    assert!(matches!(result, Err(MinerError::ArtistNotFound { .. })));
    assert_eq!(coordinator.phase(), RunPhase::Failed);
    assert!(!checkpoint_path(output.path()).exists());
}

#[tokio::test]
async fn test_non_alphabetic_artist_uses_numeric_index() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/19.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="1/10cc.html">10cc</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/10cc.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1)))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_song(&mock_server, 1, 1).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let options = RunOptions {
        artist: Some("10CC".to_string()),
        selection: Some("all".to_string()),
        ..RunOptions::default()
    };
    let report = coordinator(config).run(&options).await.expect("Run failed");

    assert_eq!(report.extracted.len(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_no_songs_found() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 0).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let result = coordinator.run(&fresh_run("all")).await;

    match result {
        Err(MinerError::NoItems { artist }) => assert_eq!(artist, "The Band"),
        other => panic!("Expected NoItems, got {:?}", other.map(|r| r.phase)),
    }
    assert_eq!(coordinator.phase(), RunPhase::Failed);
    assert!(song_files(output.path(), ".txt").is_empty());
    assert!(!checkpoint_path(output.path()).exists());
}

#[tokio::test]
async fn test_none_selection_completes_without_fetching() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 4).await;
    for n in 1..=4 {
        mount_song(&mock_server, n, 0).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let report = coordinator.run(&fresh_run("none")).await.expect("Run failed");

    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(report.attempted, 0);
    assert!(!checkpoint_path(output.path()).exists());
    assert!(!output.path().join("metadata.json").exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_selection_expression_limits_songs() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 6).await;
    for n in [1, 2, 3, 5] {
        mount_song(&mock_server, n, 1).await;
    }
    for n in [4, 6] {
        mount_song(&mock_server, n, 0).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let report = coordinator(config)
        .run(&fresh_run("1-3,5"))
        .await
        .expect("Run failed");

    assert_eq!(report.selected, 4);
    assert_eq!(
        song_files(output.path(), ".txt"),
        vec!["song1.txt", "song2.txt", "song3.txt", "song5.txt"]
    );

    mock_server.verify().await;
}

#[tokio::test]
async fn test_malformed_selection_processes_everything() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 2).await;
    for n in 1..=2 {
        mount_song(&mock_server, n, 1).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let report = coordinator(config)
        .run(&fresh_run("first two please"))
        .await
        .expect("Run failed");

    assert_eq!(report.selected, 2);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_block_mid_run_then_resume() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // First run: song 4 of 10 serves a challenge page
    mount_index_and_listing(&mock_server, 10).await;
    for n in 1..=3 {
        mount_song(&mock_server, n, 1).await;
    }
    Mock::given(method("GET"))
        .and(path(song_path(4)))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><div class=\"g-recaptcha\">Please complete the CAPTCHA</div></body></html>",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    for n in 5..=10 {
        mount_song(&mock_server, n, 0).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut first = coordinator(config.clone());
    let result = first.run(&fresh_run("all")).await;

    assert!(matches!(result, Err(MinerError::Blocked { .. })));
    assert_eq!(first.phase(), RunPhase::Blocked);
    let partial = first.last_report().expect("report missing");
    assert_eq!(partial.attempted, 4);
    assert_eq!(partial.extracted.len(), 3);

    // Three songs are done; the checkpoint points at the third
    let state = load_checkpoint(output.path())
        .expect("checkpoint unreadable")
        .expect("checkpoint missing");
    assert_eq!(state.artist, "The Band");
    assert_eq!(state.item_urls.len(), 10);
    assert_eq!(state.processed_index, 2);
    assert_eq!(
        song_files(output.path(), ".txt"),
        vec!["song1.txt", "song2.txt", "song3.txt"]
    );
    assert!(!output.path().join("metadata.json").exists());

    mock_server.verify().await;
    mock_server.reset().await;

    // Second run: resumes at song 4 without resolving again
    Mock::given(method("GET"))
        .and(path("/t.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page()))
        .expect(0)
        .mount(&mock_server)
        .await;
    for n in 1..=3 {
        mount_song(&mock_server, n, 0).await;
    }
    for n in 4..=10 {
        mount_song(&mock_server, n, 1).await;
    }

    let mut second = coordinator(config);
    let report = second.run(&resume_run()).await.expect("Resume failed");

    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(report.start_index, 3);
    assert_eq!(report.attempted, 7);
    assert_eq!(report.extracted[0].item, "song4");
    assert_eq!(song_files(output.path(), ".txt").len(), 10);
    assert_eq!(read_metadata(output.path()).total_items, 7);
    assert!(!checkpoint_path(output.path()).exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_off_site_redirect_is_block() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/t.html"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "https://challenge.example.net/verify"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let result = coordinator.run(&fresh_run("all")).await;

    assert!(matches!(result, Err(MinerError::Blocked { .. })));
    assert_eq!(coordinator.phase(), RunPhase::Blocked);
}

#[tokio::test]
async fn test_same_site_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 2).await;
    Mock::given(method("GET"))
        .and(path(song_path(1)))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", song_path(2).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_song(&mock_server, 2, 1).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let report = coordinator(config)
        .run(&fresh_run("all"))
        .await
        .expect("Run failed");

    // Song 1 is a redirect page without lyrics; song 2 is fetched once, as itself
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 0);
    assert_eq!(report.extracted.len(), 1);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_transport_and_extraction_failures_are_skipped() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 4).await;
    mount_song(&mock_server, 1, 1).await;
    Mock::given(method("GET"))
        .and(path(song_path(2)))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(song_path(3)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Layout changed</body></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_song(&mock_server, 4, 1).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let report = coordinator.run(&fresh_run("all")).await.expect("Run failed");

    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(report.attempted, 4);
    assert_eq!(report.extracted.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].index, 1);
    assert!(report.failures[0].reason.contains("HTTP 500"));
    assert_eq!(report.failures[1].index, 2);
    assert!(report.failures[1].reason.contains("Could not extract"));

    assert_eq!(
        song_files(output.path(), ".txt"),
        vec!["song1.txt", "song4.txt"]
    );
    assert_eq!(read_metadata(output.path()).total_items, 2);
    assert!(!checkpoint_path(output.path()).exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_nothing_extracted_keeps_checkpoint() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 3).await;
    Mock::given(method("GET"))
        .and(path("/lyrics/theband/song1.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let result = coordinator.run(&fresh_run("all")).await;

    assert!(matches!(
        result,
        Err(MinerError::NothingExtracted { attempted: 3 })
    ));
    assert_eq!(coordinator.phase(), RunPhase::Failed);

    let state = load_checkpoint(output.path()).unwrap().unwrap();
    assert_eq!(state.processed_index, 2);
    assert!(!output.path().join("metadata.json").exists());
    assert!(!output.path().join("combined_lyrics.txt").exists());
}

#[tokio::test]
async fn test_json_format_outputs() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 2).await;
    for n in 1..=2 {
        mount_song(&mock_server, n, 1).await;
    }

    let mut config = create_test_config(&mock_server.uri(), output.path());
    config.output.format = OutputFormat::Json;
    let report = coordinator(config)
        .run(&fresh_run("all"))
        .await
        .expect("Run failed");

    assert_eq!(report.extracted[0].file, "song1.json");

    let raw = std::fs::read_to_string(output.path().join("song2.json")).unwrap();
    let record: LyricsRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(record.artist, "The Band");
    assert_eq!(record.item, "song2");
    assert_eq!(record.text, song_text(2));

    let combined: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output.path().join("combined_lyrics.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(combined["total_items"], 2);
    assert_eq!(
        combined["all_text"],
        format!("{}\n\n{}", song_text(1), song_text(2))
    );
    assert!(output.path().join("metadata.json").exists());
}

#[tokio::test]
async fn test_test_mode_fetches_first_song_only() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 3).await;
    mount_song(&mock_server, 1, 1).await;
    mount_song(&mock_server, 2, 0).await;
    mount_song(&mock_server, 3, 0).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let options = RunOptions {
        test_mode: true,
        ..fresh_run("all")
    };
    let report = coordinator(config).run(&options).await.expect("Run failed");

    assert_eq!(report.attempted, 1);
    assert_eq!(report.extracted.len(), 1);
    assert!(output.path().join("song1.txt").exists());
    assert!(!checkpoint_path(output.path()).exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_test_mode_keeps_existing_checkpoint() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let earlier: Vec<String> = (1..=5)
        .map(|n| format!("{}/lyrics/other/track{}.html", mock_server.uri(), n))
        .collect();
    let saved = save_checkpoint("Other Band", &earlier, 1, output.path()).unwrap();

    mount_index_and_listing(&mock_server, 2).await;
    mount_song(&mock_server, 1, 1).await;
    mount_song(&mock_server, 2, 0).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let options = RunOptions {
        test_mode: true,
        ..fresh_run("all")
    };
    coordinator(config).run(&options).await.expect("Run failed");

    let state = load_checkpoint(output.path()).unwrap().unwrap();
    assert_eq!(state, saved);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_resume_of_finished_checkpoint_extracts_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let songs: Vec<String> = (1..=2)
        .map(|n| format!("{}{}", mock_server.uri(), song_path(n)))
        .collect();
    save_checkpoint("The Band", &songs, 1, output.path()).unwrap();
    for n in 1..=2 {
        mount_song(&mock_server, n, 0).await;
    }

    let config = create_test_config(&mock_server.uri(), output.path());
    let mut coordinator = coordinator(config);
    let result = coordinator.run(&resume_run()).await;

    assert!(matches!(
        result,
        Err(MinerError::NothingExtracted { attempted: 0 })
    ));
    assert!(checkpoint_path(output.path()).exists());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_selection_keeps_listing_order() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 6).await;
    mount_song(&mock_server, 1, 1).await;
    mount_song(&mock_server, 5, 1).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let report = coordinator(config)
        .run(&fresh_run("5,1,5"))
        .await
        .expect("Run failed");

    let order: Vec<&str> = report.extracted.iter().map(|e| e.item.as_str()).collect();
    assert_eq!(order, vec!["song1", "song5"]);
    assert_eq!(report.attempted, 2);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_requests_go_through_configured_proxy() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 1).await;
    mount_song(&mock_server, 1, 1).await;

    // The site host does not resolve; only the proxy can answer
    let mut config = create_test_config("http://lyrics.invalid/", output.path());
    config.fetcher.proxy = Some(mock_server.uri());
    let report = coordinator(config)
        .run(&fresh_run("all"))
        .await
        .expect("Run failed");

    assert_eq!(report.extracted.len(), 1);
    assert_eq!(
        report.extracted[0].url,
        "http://lyrics.invalid/lyrics/theband/song1.html"
    );

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec!["/t.html", "/t/theband.html", "/lyrics/theband/song1.html"]
    );
    assert!(requests
        .iter()
        .all(|r| r.url.host_str() == Some("lyrics.invalid")));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_resume_without_checkpoint_starts_fresh() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_index_and_listing(&mock_server, 1).await;
    mount_song(&mock_server, 1, 1).await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let options = RunOptions {
        resume: true,
        ..fresh_run("all")
    };
    let report = coordinator(config).run(&options).await.expect("Run failed");

    assert_eq!(report.start_index, 0);
    assert_eq!(report.extracted.len(), 1);
    mock_server.verify().await;
}
