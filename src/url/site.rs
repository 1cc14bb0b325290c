use url::Url;

/// Bucket used for artist names that do not start with a letter
const NUMERIC_BUCKET: &str = "19";

/// URL builder for one lyrics site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    /// Creates a builder rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    /// Returns the first-letter index page listing `artist`
    ///
    /// # Examples
    ///
    /// ```
    /// use lyric_miner::url::SiteUrls;
    ///
    /// let site = SiteUrls::new("https://www.azlyrics.com/").unwrap();
    /// assert_eq!(
    ///     site.artist_index_url("Queen").unwrap().as_str(),
    ///     "https://www.azlyrics.com/q.html"
    /// );
    /// assert_eq!(
    ///     site.artist_index_url("50 Cent").unwrap().as_str(),
    ///     "https://www.azlyrics.com/19.html"
    /// );
    /// ```
    pub fn artist_index_url(&self, artist: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("{}.html", index_bucket(artist)))
    }

    /// Resolves a path scraped from a page into an absolute URL
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }
}

/// Returns the index bucket an artist is listed under
///
/// Alphabetic first characters map to their lowercase form, everything
/// else (digits, punctuation, empty names) to the numeric bucket.
pub fn index_bucket(artist: &str) -> String {
    match artist.trim_start().chars().next() {
        Some(c) if c.is_alphabetic() => c.to_lowercase().collect(),
        _ => NUMERIC_BUCKET.to_string(),
    }
}

/// Derives the display name of a song from its page URL
///
/// This is the last path segment with any `.html` suffix removed.
///
/// # Examples
///
/// ```
/// use lyric_miner::url::item_name;
///
/// assert_eq!(
///     item_name("https://www.azlyrics.com/lyrics/queen/bohemianrhapsody.html"),
///     "bohemianrhapsody"
/// );
/// ```
pub fn item_name(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    segment.replace(".html", "")
}
