use url::Url;

/// Returns the `host[:port]` authority of a URL
///
/// The host is lowercase (the `url` crate normalizes it) and the port is
/// only present when it differs from the scheme default.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lyric_miner::url::authority;
///
/// let url = Url::parse("https://WWW.Example.com/a.html").unwrap();
/// assert_eq!(authority(&url), "www.example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/a.html").unwrap();
/// assert_eq!(authority(&url), "127.0.0.1:8080");
/// ```
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Checks whether a redirect `Location` leaves the requested site
///
/// Relative locations cannot change the authority and are never
/// cross-domain. Absolute locations are compared by authority.
///
/// # Arguments
///
/// * `requested` - The URL that produced the redirect
/// * `location` - Raw value of the `Location` header
///
/// # Returns
///
/// * `true` - The redirect targets a different host or port
/// * `false` - The redirect stays on the requested site
pub fn is_cross_domain(requested: &Url, location: &str) -> bool {
    match Url::parse(location.trim()) {
        Ok(target) => match target.host_str() {
            Some(_) => authority(&target) != authority(requested),
            None => false,
        },
        Err(_) => false,
    }
}
