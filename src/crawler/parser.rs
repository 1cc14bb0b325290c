//! Markup extraction for the lyrics site
//!
//! All extraction is plain pattern matching against the site's exact
//! markup. Any change to that markup makes these functions come back
//! empty; callers treat an empty result as "page shape unexpected".

use regex::Regex;
use std::sync::OnceLock;

/// Comment the site places directly in front of the lyrics block
pub const LYRICS_DELIMITER: &str = "<!-- Usage of azlyrics.com content by any third-party lyrics provider is prohibited by our licensing agreement. Sorry about that. -->";

/// Schemes that never lead to a song page
const NON_NAVIGATIONAL: [&str; 2] = ["javascript:", "mailto:"];

fn artist_entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<a href="([^"]+)"[^>]*>([^<]+)</a>"#).expect("valid artist pattern")
    })
}

fn item_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<div class="listalbum-item"><a href="([^"]+)""#).expect("valid item pattern")
    })
}

fn lyrics_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(r"(?s){}\s*(.*?)\s*</div>", regex::escape(LYRICS_DELIMITER));
        Regex::new(&pattern).expect("valid lyrics pattern")
    })
}

fn line_break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<br\s*/?>").expect("valid break pattern"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"))
}

/// An artist link found on a first-letter index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistEntry {
    /// Link target as written in the page
    pub path: String,

    /// Link text, trimmed
    pub name: String,
}

/// Extracts every link with a plain text label from an index page
pub fn extract_artist_entries(markup: &str) -> Vec<ArtistEntry> {
    artist_entry_pattern()
        .captures_iter(markup)
        .map(|caps| ArtistEntry {
            path: caps[1].to_string(),
            name: caps[2].trim().to_string(),
        })
        .collect()
}

/// Finds the page path of `artist` on an index page
///
/// Names are compared case-insensitively and must otherwise match
/// exactly. The first match in document order wins.
///
/// # Examples
///
/// ```
/// use lyric_miner::crawler::find_artist_path;
///
/// let html = r#"<a href="q/queen.html">Queen</a><a href="q/qotsa.html">Queens of the Stone Age</a>"#;
/// assert_eq!(find_artist_path(html, "queen"), Some("q/queen.html".to_string()));
/// assert_eq!(find_artist_path(html, "quee"), None);
/// ```
pub fn find_artist_path(markup: &str, artist: &str) -> Option<String> {
    let wanted = artist.trim().to_lowercase();
    extract_artist_entries(markup)
        .into_iter()
        .find(|entry| entry.name.to_lowercase() == wanted)
        .map(|entry| entry.path)
}

/// Extracts song links from an artist page, in document order
///
/// Links using a non-navigational scheme are dropped. The returned paths
/// are exactly as written in the page, usually relative.
pub fn extract_item_links(markup: &str) -> Vec<String> {
    item_link_pattern()
        .captures_iter(markup)
        .map(|caps| caps[1].to_string())
        .filter(|path| {
            let lower = path.to_lowercase();
            !NON_NAVIGATIONAL.iter().any(|scheme| lower.contains(scheme))
        })
        .collect()
}

/// Extracts the lyrics text from a song page
///
/// Captures everything between the licensing delimiter and the next
/// closing `</div>`, turns `<br>` variants into newlines, strips the
/// remaining tags and trims the result.
///
/// # Returns
///
/// * `Some(String)` - The lyrics (possibly empty)
/// * `None` - The delimiter is not on the page
pub fn extract_text(markup: &str) -> Option<String> {
    let caps = lyrics_pattern().captures(markup)?;
    let raw = caps.get(1).map_or("", |m| m.as_str());

    let with_breaks = line_break_pattern().replace_all(raw, "\n");
    let stripped = tag_pattern().replace_all(&with_breaks, "");

    Some(stripped.trim().to_string())
}
