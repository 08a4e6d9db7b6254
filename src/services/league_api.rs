//! Trait for reading a league's season from a fantasy football provider.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::parser::{LeagueEntry, LiveResponse, PicksResponse};

/// Abstraction over the FPL API (see [`crate::infra::fpl::client::FplClient`]).
#[async_trait]
pub trait LeagueApi: Send + Sync {
    /// Every team in the league, across all standings pages.
    async fn league_entries(&self, league_id: u64) -> Result<Vec<LeagueEntry>, FetchError>;

    /// A team's picks, chip and score for one gameweek.
    async fn picks(&self, entry: u64, gw: u32) -> Result<PicksResponse, FetchError>;

    /// Live points of every player in one gameweek.
    async fn live(&self, gw: u32) -> Result<LiveResponse, FetchError>;
}
