//! JSON payloads of the FPL API and their conversion into season records.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::record::{Chip, GameweekRecord, Pick};

/// Squad positions above this are on the bench.
const STARTING_SLOTS: u8 = 11;

/// One page of `leagues-classic/{id}/standings/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsPage {
    pub standings: Standings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Standings {
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub results: Vec<LeagueEntry>,
}

/// A team in the league.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeagueEntry {
    pub entry: u64,
    pub entry_name: String,
    pub player_name: String,
}

/// `entry/{id}/event/{gw}/picks/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PicksResponse {
    #[serde(default)]
    pub active_chip: Option<String>,
    #[serde(default)]
    pub automatic_subs: Vec<AutomaticSub>,
    #[serde(default)]
    pub entry_history: EntryHistory,
    #[serde(default)]
    pub picks: Vec<RawPick>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryHistory {
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub points_on_bench: i32,
    #[serde(default)]
    pub event_transfers: i32,
    #[serde(default)]
    pub event_transfers_cost: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AutomaticSub {
    pub element_in: u32,
    pub element_out: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPick {
    pub element: u32,
    pub position: u8,
    #[serde(default)]
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

/// `event/{gw}/live/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveResponse {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LiveElement {
    pub id: u32,
    pub stats: LiveStats,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub total_points: i32,
}

impl LiveResponse {
    /// Gameweek points by player id.
    pub fn points_by_id(&self) -> HashMap<u32, i32> {
        self.elements.iter().map(|e| (e.id, e.stats.total_points)).collect()
    }
}

pub fn parse_standings(bytes: &[u8]) -> serde_json::Result<StandingsPage> {
    serde_json::from_slice(bytes)
}

pub fn parse_picks(bytes: &[u8]) -> serde_json::Result<PicksResponse> {
    serde_json::from_slice(bytes)
}

pub fn parse_live(bytes: &[u8]) -> serde_json::Result<LiveResponse> {
    serde_json::from_slice(bytes)
}

/// Derives one season row from a team's picks and the gameweek's live scores.
///
/// The effective captain is the nominal captain unless that player did not play
/// (multiplier 0), in which case the vice-captain's points count. On bench
/// boost weeks the bench scored for real, so `bench` is the live total of
/// the bench slots instead of `points_on_bench`. An unrecognised chip is
/// logged and dropped.
pub fn build_record(entry: &LeagueEntry, gw: u32, picks: &PicksResponse, live: &HashMap<u32, i32>) -> GameweekRecord {
    let points_of = |id: u32| live.get(&id).copied().unwrap_or(0);

    let chip = match Chip::from_raw(picks.active_chip.as_deref().unwrap_or(""), gw) {
        Ok(chip) => chip,
        Err(e) => {
            warn!(entry = %entry.entry_name, gw, error = %e, "Ignoring chip");
            None
        }
    };

    let bench = if chip == Some(Chip::BenchBoost) {
        picks
            .picks
            .iter()
            .filter(|p| p.position > STARTING_SLOTS)
            .map(|p| points_of(p.element))
            .sum()
    } else {
        picks.entry_history.points_on_bench
    };

    let captain = picks.picks.iter().find(|p| p.is_captain);
    let vice = picks.picks.iter().find(|p| p.is_vice_captain);
    let effective = match captain {
        Some(c) if c.multiplier == 0 => vice.or(Some(c)),
        Some(c) => Some(c),
        None => vice,
    };
    let captain_id = effective.map(|p| p.element);

    let transfer_in_ids: Vec<u32> = picks.automatic_subs.iter().map(|s| s.element_in).collect();
    let transfer_out_ids: Vec<u32> = picks.automatic_subs.iter().map(|s| s.element_out).collect();
    let transfer_gain = picks
        .automatic_subs
        .iter()
        .map(|s| points_of(s.element_in) - points_of(s.element_out))
        .sum();

    GameweekRecord {
        gw,
        entry_name: entry.entry_name.clone(),
        player_name: entry.player_name.clone(),
        points: picks.entry_history.points,
        bench,
        hits: picks.entry_history.event_transfers_cost,
        event_transfers: picks.entry_history.event_transfers,
        chip,
        autosub_count: picks.automatic_subs.len() as u32,
        captain_id,
        captain_points: captain_id.map(points_of).unwrap_or(0),
        team: picks
            .picks
            .iter()
            .map(|p| Pick {
                player_id: p.element,
                multiplier: p.multiplier,
                points: points_of(p.element),
            })
            .collect(),
        transfer_in_ids,
        transfer_out_ids,
        transfer_gain,
    }
}
