//! Collects a league's full season from a [`LeagueApi`].

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::parser::build_record;
use crate::record::GameweekRecord;
use crate::services::league_api::LeagueApi;

/// A team-gameweek that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGameweek {
    pub entry_name: String,
    pub gw: u32,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SeasonFetch {
    pub records: Vec<GameweekRecord>,
    pub skipped: Vec<SkippedGameweek>,
}

/// Fetches gameweeks 1..=`num_gameweeks` for every team in the league.
///
/// Live scores are fetched once per gameweek and shared by all teams. A
/// failed standings request, or any request rejected for bad credentials,
/// ends the fetch with an error. Other failures skip the affected
/// team-gameweeks and are reported in [`SeasonFetch::skipped`].
#[instrument(skip(api, config), fields(league_id = config.league_id))]
pub async fn collect_season<A: LeagueApi + ?Sized>(
    api: &A,
    config: &FetchConfig,
) -> Result<SeasonFetch, FetchError> {
    let entries = api.league_entries(config.league_id).await.inspect_err(|e| {
        error!(error = %e, "Failed to fetch league standings");
    })?;
    info!(teams = entries.len(), gameweeks = config.num_gameweeks, "Fetching season");

    let mut season = SeasonFetch::default();

    for gw in 1..=config.num_gameweeks {
        let live = match api.live(gw).await {
            Ok(live) => live.points_by_id(),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(gw, error = %e, "Skipping gameweek without live scores");
                season.skipped.extend(entries.iter().map(|entry| SkippedGameweek {
                    entry_name: entry.entry_name.clone(),
                    gw,
                    reason: e.to_string(),
                }));
                continue;
            }
        };

        for entry in &entries {
            match api.picks(entry.entry, gw).await {
                Ok(picks) => season.records.push(build_record(entry, gw, &picks, &live)),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(entry = %entry.entry_name, gw, error = %e, "Skipping gameweek");
                    season.skipped.push(SkippedGameweek {
                        entry_name: entry.entry_name.clone(),
                        gw,
                        reason: e.to_string(),
                    });
                }
            }
        }
        info!(gw, rows = season.records.len(), "Gameweek fetched");
    }

    if !season.skipped.is_empty() {
        warn!(skipped = season.skipped.len(), "Some gameweeks could not be fetched");
    }
    Ok(season)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{EntryHistory, LeagueEntry, LiveResponse, PicksResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves canned responses; `failures` lists (entry, gw, status) triples.
    struct FakeLeague {
        entries: Vec<LeagueEntry>,
        failures: Vec<(u64, u32, u16)>,
        live_failures: Vec<u32>,
        standings_status: Option<u16>,
        live_calls: Mutex<Vec<u32>>,
    }

    impl FakeLeague {
        fn new(names: &[&str]) -> Self {
            Self {
                entries: names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| LeagueEntry {
                        entry: i as u64 + 1,
                        entry_name: n.to_string(),
                        player_name: format!("Manager {n}"),
                    })
                    .collect(),
                failures: Vec::new(),
                live_failures: Vec::new(),
                standings_status: None,
                live_calls: Mutex::new(Vec::new()),
            }
        }
    }

    fn status(status: u16) -> FetchError {
        FetchError::Status {
            url: "fake".to_string(),
            status,
        }
    }

    #[async_trait]
    impl LeagueApi for FakeLeague {
        async fn league_entries(&self, _league_id: u64) -> Result<Vec<LeagueEntry>, FetchError> {
            match self.standings_status {
                Some(code) => Err(status(code)),
                None => Ok(self.entries.clone()),
            }
        }

        async fn picks(&self, entry: u64, gw: u32) -> Result<PicksResponse, FetchError> {
            if let Some((_, _, code)) = self.failures.iter().find(|f| f.0 == entry && f.1 == gw) {
                return Err(status(*code));
            }
            Ok(PicksResponse {
                entry_history: EntryHistory {
                    points: (entry as i32) * 10 + gw as i32,
                    ..EntryHistory::default()
                },
                ..PicksResponse::default()
            })
        }

        async fn live(&self, gw: u32) -> Result<LiveResponse, FetchError> {
            self.live_calls.lock().unwrap().push(gw);
            if self.live_failures.contains(&gw) {
                return Err(status(502));
            }
            Ok(LiveResponse::default())
        }
    }

    #[tokio::test]
    async fn test_collects_every_team_and_gameweek() {
        let api = FakeLeague::new(&["A", "B"]);
        let season = collect_season(&api, &FetchConfig::new(1, 3)).await.unwrap();

        assert_eq!(season.records.len(), 6);
        assert!(season.skipped.is_empty());
        let b3 = season.records.iter().find(|r| r.entry_name == "B" && r.gw == 3).unwrap();
        assert_eq!(b3.points, 23);
        assert_eq!(b3.player_name, "Manager B");
        assert_eq!(*api.live_calls.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_transient_failure_skips_one_gameweek() {
        let mut api = FakeLeague::new(&["A", "B"]);
        api.failures.push((2, 2, 500));
        let season = collect_season(&api, &FetchConfig::new(1, 3)).await.unwrap();

        assert_eq!(season.records.len(), 5);
        assert_eq!(
            season.skipped,
            vec![SkippedGameweek {
                entry_name: "B".to_string(),
                gw: 2,
                reason: "fake returned HTTP 500".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_live_scores_skip_the_week_for_all_teams() {
        let mut api = FakeLeague::new(&["A", "B"]);
        api.live_failures.push(1);
        let season = collect_season(&api, &FetchConfig::new(1, 2)).await.unwrap();
        assert_eq!(season.records.len(), 2);
        assert_eq!(season.skipped.len(), 2);
        assert!(season.skipped.iter().all(|s| s.gw == 1));
    }

    #[tokio::test]
    async fn test_rejected_credentials_abort() {
        let mut api = FakeLeague::new(&["A"]);
        api.failures.push((1, 2, 403));
        let err = collect_season(&api, &FetchConfig::new(1, 3)).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_standings_failure_is_fatal() {
        let mut api = FakeLeague::new(&["A"]);
        api.standings_status = Some(503);
        assert!(collect_season(&api, &FetchConfig::new(1, 3)).await.is_err());
    }
}
