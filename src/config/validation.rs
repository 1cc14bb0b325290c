use crate::config::types::{Config, FetcherConfig, OutputConfig, PacingConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_pacing_config(&config.pacing)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site base URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates timeouts and proxy address
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.item_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "item-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.listing_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "listing-timeout-secs must be >= 1".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy {
        let url = Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

        if !matches!(url.scheme(), "http" | "https" | "socks5" | "socks5h") {
            return Err(ConfigError::Validation(format!(
                "proxy '{}' must use http, https, socks5 or socks5h",
                proxy
            )));
        }
    }

    Ok(())
}

/// Validates the delay window
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if !config.min_delay.is_finite() || !config.max_delay.is_finite() {
        return Err(ConfigError::Validation(
            "min-delay and max-delay must be finite".to_string(),
        ));
    }

    if config.min_delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min-delay must be >= 0, got {}",
            config.min_delay
        )));
    }

    if config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "min-delay ({}) must not exceed max-delay ({})",
            config.min_delay, config.max_delay
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
