//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client (proxy, relaxed certificate checks, no redirects)
//! - Single GET requests with a per-request identity and timeout
//! - Block detection (off-site redirects and challenge pages)
//! - Error classification

use crate::config::FetcherConfig;
use crate::url::is_cross_domain;
use crate::{BlockReason, MinerError};
use reqwest::header::{LOCATION, USER_AGENT};
use reqwest::{redirect::Policy, Client, Proxy, StatusCode};
use std::time::Duration;
use url::Url;

/// Body substrings that identify a challenge page, matched case-insensitively
pub const BLOCK_MARKERS: [&str; 2] = ["cf-chl-bypass", "captcha"];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The site answered with a page that is not a block
    Success {
        /// URL that was requested (redirects are never followed)
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The response was an off-site redirect or a challenge page
    Blocked {
        /// Why the response counts as a block
        reason: BlockReason,
    },

    /// Non-block HTTP error status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status_code: u16,
    pub body: String,
}

impl FetchResult {
    /// Converts the outcome into a page or the matching crate error
    ///
    /// # Arguments
    ///
    /// * `url` - The requested URL, used in error values
    pub fn into_page(self, url: &str) -> Result<FetchedPage, MinerError> {
        match self {
            Self::Success {
                final_url,
                status_code,
                body,
            } => Ok(FetchedPage {
                final_url,
                status_code,
                body,
            }),
            Self::Blocked { reason } => Err(MinerError::Blocked {
                url: url.to_string(),
                reason,
            }),
            Self::HttpError { status_code } => Err(MinerError::Transport {
                url: url.to_string(),
                status: Some(status_code),
                message: format!("HTTP {}", status_code),
            }),
            Self::NetworkError { error } => Err(MinerError::Transport {
                url: url.to_string(),
                status: None,
                message: error,
            }),
        }
    }
}

/// Builds the HTTP client shared by every request of a run
///
/// Certificate validation is disabled on purpose: the scraper must keep
/// working through intercepting proxies. Redirects are never followed so
/// that each one can be inspected for a block. The user agent is set per
/// request, not on the client.
///
/// # Arguments
///
/// * `config` - Fetcher configuration (proxy address)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy or TLS backend failure
///
/// # Example
///
/// ```no_run
/// use lyric_miner::config::FetcherConfig;
/// use lyric_miner::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none()) // Inspect redirects manually
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true);

    match &config.proxy {
        Some(proxy) => {
            tracing::info!("Routing requests through proxy {}", proxy);
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }
        None => {
            builder = builder.no_proxy();
        }
    }

    tracing::debug!("Certificate validation disabled for scraping client");
    builder.build()
}

/// Classifies a response as a block
///
/// A redirect status with a `Location` on another host is a block, as is
/// any body containing one of [`BLOCK_MARKERS`].
pub fn detect_block(
    requested: &Url,
    status: StatusCode,
    location: Option<&str>,
    body: &str,
) -> Option<BlockReason> {
    if status.is_redirection() {
        if let Some(location) = location {
            if is_cross_domain(requested, location) {
                return Some(BlockReason::CrossDomainRedirect {
                    location: location.to_string(),
                });
            }
        }
    }

    let lower = body.to_lowercase();
    BLOCK_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
        .map(|marker| BlockReason::ChallengeMarker { marker })
}

/// Fetches a URL with a single GET request
///
/// # Request Flow
///
/// 1. Send GET with the given identity and timeout
/// 2. Off-site redirect → Blocked
/// 3. Challenge marker in the body → Blocked
/// 4. 4xx/5xx → HttpError
/// 5. Anything else (2xx, same-site 3xx) → Success
///
/// There are no retries.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `user_agent` - Client identity for this request
/// * `timeout` - Total request timeout
pub async fn fetch_url(
    client: &Client,
    url: &Url,
    user_agent: &str,
    timeout: Duration,
) -> FetchResult {
    let response = match client
        .get(url.clone())
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return classify_error(&e),
    };

    if let Some(reason) = detect_block(url, status, location.as_deref(), &body) {
        tracing::debug!("Block detected for {}: {}", url, reason);
        return FetchResult::Blocked { reason };
    }

    if status.is_client_error() || status.is_server_error() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    FetchResult::Success {
        final_url: url.to_string(),
        status_code: status.as_u16(),
        body,
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
