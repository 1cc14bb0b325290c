//! Request pacing strategies
//!
//! Before every song request the coordinator asks its pacing strategy for
//! a client identity and a delay. The default strategy draws both at
//! random; tests substitute fixed values.

use crate::config::PacingConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Client identities presented to the site
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// Chooses the identity and delay for each request
pub trait Pacing {
    /// User agent for the next request
    fn user_agent(&self) -> &str;

    /// Delay to wait before the next song request
    fn delay(&self, window: &PacingConfig) -> Duration;
}

/// Uniformly random identity and delay
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPacing;

impl Pacing for RandomPacing {
    fn user_agent(&self) -> &str {
        USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    fn delay(&self, window: &PacingConfig) -> Duration {
        let secs = if window.max_delay > window.min_delay {
            rand::thread_rng().gen_range(window.min_delay..=window.max_delay)
        } else {
            window.min_delay
        };
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Same identity and delay every time
#[derive(Debug, Clone)]
pub struct FixedPacing {
    user_agent: String,
    delay: Duration,
}

impl FixedPacing {
    pub fn new(user_agent: impl Into<String>, delay: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            delay,
        }
    }

    /// First pool identity and no delay
    pub fn immediate() -> Self {
        Self::new(USER_AGENTS[0], Duration::ZERO)
    }
}

impl Pacing for FixedPacing {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn delay(&self, _window: &PacingConfig) -> Duration {
        self.delay
    }
}
