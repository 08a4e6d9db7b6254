use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::parser::{LeagueEntry, LiveResponse, PicksResponse, parse_live, parse_picks, parse_standings};
use crate::services::league_api::LeagueApi;

/// [`LeagueApi`] over the public FPL REST API.
///
/// Requests go out one at a time, each followed by the configured delay.
/// Rate limiting, server errors and dropped connections are retried.
pub struct FplClient<C> {
    http: C,
    config: FetchConfig,
}

impl<C: HttpClient> FplClient<C> {
    pub fn new(http: C, config: FetchConfig) -> Self {
        Self { http, config }
    }

    /// Fetches `url` and decodes the body with `parse`. A body that does not
    /// decode is not retried.
    async fn get<T>(&self, url: &str, parse: fn(&[u8]) -> serde_json::Result<T>) -> Result<T, FetchError> {
        let result = with_retries(self.config.max_retries, self.config.retry_backoff, url, || {
            fetch_bytes(&self.http, url)
        })
        .await;
        tokio::time::sleep(self.config.request_delay).await;
        parse(&result?).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error or has been
/// retried `max_retries` times. Retry `n` waits `backoff * n` first.
pub async fn with_retries<T, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    url: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                let wait = backoff * attempt;
                warn!(url, attempt, wait_ms = wait.as_millis() as u64, error = %e, "Retrying request");
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[async_trait]
impl<C: HttpClient> LeagueApi for FplClient<C> {
    #[tracing::instrument(skip(self))]
    async fn league_entries(&self, league_id: u64) -> Result<Vec<LeagueEntry>, FetchError> {
        let mut config = self.config.clone();
        config.league_id = league_id;

        let mut entries = Vec::new();
        let mut page = 1;
        loop {
            let body = self.get(&config.standings_url(page), parse_standings).await?;
            debug!(page, results = body.standings.results.len(), "Standings page");
            entries.extend(body.standings.results);
            if !body.standings.has_next {
                break;
            }
            page += 1;
        }
        Ok(entries)
    }

    async fn picks(&self, entry: u64, gw: u32) -> Result<PicksResponse, FetchError> {
        self.get(&self.config.picks_url(entry, gw), parse_picks).await
    }

    async fn live(&self, gw: u32) -> Result<LiveResponse, FetchError> {
        self.get(&self.config.live_url(gw), parse_live).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Instant;

    use reqwest::header::COOKIE;

    use crate::fetch::auth::HeaderAuth;
    use crate::fetch::testing::Recorder;

    const EMPTY_LIVE: &str = r#"{"elements": []}"#;

    fn config() -> FetchConfig {
        let mut config = FetchConfig::new(314, 2);
        config.base_url = "http://fpl.test/api".to_string();
        config.request_delay = Duration::ZERO;
        config.retry_backoff = Duration::ZERO;
        config
    }

    fn standings(has_next: bool, entry: u64) -> String {
        format!(
            r#"{{"standings": {{"has_next": {has_next}, "page": 1,
                "results": [{{"entry": {entry}, "entry_name": "T{entry}", "player_name": "P{entry}"}}]}}}}"#
        )
    }

    fn status(code: u16) -> FetchError {
        FetchError::Status {
            url: "u".to_string(),
            status: code,
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Cell::new(0);
        let result = with_retries(3, Duration::ZERO, "u", || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 3 { Err(status(503)) } else { Ok(n) } }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(2, Duration::ZERO, "u", || {
            calls.set(calls.get() + 1);
            async { Err(status(429)) }
        })
        .await;
        assert!(matches!(result, Err(FetchError::Status { status: 429, .. })));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(5, Duration::ZERO, "u", || {
            calls.set(calls.get() + 1);
            async { Err(status(404)) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_standings_follow_pages_until_last() {
        let config = config();
        let http = Recorder::new([
            (config.standings_url(1), standings(true, 1)),
            (config.standings_url(2), standings(true, 2)),
            (config.standings_url(3), standings(false, 3)),
        ]);
        let api = FplClient::new(http.clone(), config.clone());

        let entries = api.league_entries(314).await.unwrap();
        assert_eq!(entries.iter().map(|e| e.entry).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            http.urls(),
            vec![config.standings_url(1), config.standings_url(2), config.standings_url(3)]
        );
    }

    #[tokio::test]
    async fn test_pauses_after_every_request() {
        let mut config = config();
        config.request_delay = Duration::from_millis(30);
        let http = Recorder::new([(config.live_url(1), EMPTY_LIVE.to_string())]);
        let api = FplClient::new(http.clone(), config);

        let start = Instant::now();
        api.live(1).await.unwrap();
        api.live(1).await.unwrap();
        // failed requests are paced too
        assert!(api.live(2).await.is_err());
        assert!(start.elapsed() >= Duration::from_millis(90));
        assert_eq!(http.urls().len(), 3);
    }

    #[tokio::test]
    async fn test_cookie_sent_with_every_request() {
        let config = config();
        let http = Recorder::new([
            (config.live_url(1), EMPTY_LIVE.to_string()),
            (config.standings_url(1), standings(false, 9)),
        ]);
        let auth = HeaderAuth::cookie(http.clone(), "pl_profile=abc; sessionid=xyz").unwrap();
        let api = FplClient::new(auth, config);

        api.live(1).await.unwrap();
        api.league_entries(314).await.unwrap();

        let seen = http.seen();
        assert_eq!(seen.len(), 2);
        for req in seen {
            assert_eq!(req.headers.get(COOKIE).unwrap().to_str().unwrap(), "pl_profile=abc; sessionid=xyz");
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_not_retried() {
        let config = config();
        let http = Recorder::new([(config.live_url(1), "<html>maintenance</html>".to_string())]);
        let api = FplClient::new(http.clone(), config);

        let result = api.live(1).await;
        assert!(matches!(result, Err(FetchError::Decode { .. })));
        assert_eq!(http.urls().len(), 1);
    }
}
