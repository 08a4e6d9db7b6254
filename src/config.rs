//! Settings for a season fetch.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// Everything the collector needs to know about one league fetch.
///
/// Built from CLI flags and the environment in `main`; nothing in the
/// library reads the environment itself.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub league_id: u64,
    /// Gameweeks 1..=`num_gameweeks` are fetched.
    pub num_gameweeks: u32,
    /// Pause after every request.
    pub request_delay: Duration,
    pub max_retries: u32,
    /// Wait before retry `n` is `retry_backoff * n`.
    pub retry_backoff: Duration,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new(league_id: u64, num_gameweeks: u32) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            league_id,
            num_gameweeks,
            request_delay: Duration::from_millis(300),
            max_retries: 3,
            retry_backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn standings_url(&self, page: u32) -> String {
        format!(
            "{}/leagues-classic/{}/standings/?page_standings={}",
            self.base(),
            self.league_id,
            page
        )
    }

    pub fn picks_url(&self, entry: u64, gw: u32) -> String {
        format!("{}/entry/{}/event/{}/picks/", self.base(), entry, gw)
    }

    pub fn live_url(&self, gw: u32) -> String {
        format!("{}/event/{}/live/", self.base(), gw)
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
