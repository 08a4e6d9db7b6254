//! Derived tables produced by the analytics pipeline.

use serde::Serialize;

use crate::record::Chip;

/// Season totals for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAggregate {
    pub entry_name: String,
    pub points: i32,
    pub bench: i32,
    pub hits: i32,
    pub captain_points: i32,
    pub transfer_gain: i32,
    pub event_transfers: i32,
    pub autosub_count: u32,
    pub avg_gw_points: f64,
    pub avg_bench_points: f64,
    /// Points net of hits per gameweek of the whole season.
    pub efficiency: f64,
    /// Sum of the negative autosub gains; never positive.
    pub transfer_loss: i32,
    /// Number of 4-point hits taken.
    pub total_hits: i32,
    /// Bench points outside bench-boost weeks.
    pub max_bench_points: i32,
    pub best_gw_count: u32,
    pub worst_gw_count: u32,
    #[serde(rename = "runda_1")]
    pub first_half: i32,
    #[serde(rename = "runda_2")]
    pub second_half: i32,
    #[serde(rename = "roznica_rund")]
    pub half_difference: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakRow {
    pub entry_name: String,
    pub longest_good_streak: u32,
    pub longest_bad_streak: u32,
    /// Positive while above the weekly mean, negative while at or below it.
    pub current_streak: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H2hRow {
    pub team_1: String,
    pub team_2: String,
    pub wins_1: u32,
    pub wins_2: u32,
    pub avg_margin: f64,
    pub shared_gameweeks: u32,
}

/// Pairwise share of won gameweeks; `ratios[i][j]` is team `i` against team `j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRatioMatrix {
    pub teams: Vec<String>,
    pub ratios: Vec<Vec<f64>>,
}

impl WinRatioMatrix {
    pub fn ratio(&self, team: &str, opponent: &str) -> Option<f64> {
        let i = self.teams.iter().position(|t| t == team)?;
        let j = self.teams.iter().position(|t| t == opponent)?;
        Some(self.ratios[i][j])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipTiming {
    pub chip: Chip,
    pub uses: u32,
    pub avg_points_early: Option<f64>,
    pub avg_points_late: Option<f64>,
    pub best_gw: u32,
    pub best_entry: String,
    pub best_points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerChipPoints {
    pub entry_name: String,
    pub weeks: u32,
    pub manager_points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoyalPlayer {
    pub player_id: u32,
    pub player_name: String,
    pub weeks_owned: u32,
    pub avg_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferTiming {
    pub entry_name: String,
    pub total_transfers: i32,
    pub avg_points_per_transfer: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionPoint {
    pub entry_name: String,
    pub gw: u32,
    pub cumulative_points: i32,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub entry_name: String,
    pub highest_position: u32,
    pub lowest_position: u32,
    pub weeks_at_top: u32,
    pub avg_position: f64,
    pub position_changes: u32,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaguePositions {
    pub history: Vec<PositionPoint>,
    pub summary: Vec<PositionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhatIf {
    pub entry_name: String,
    pub actual_points: i32,
    pub points_with_best_captains: i32,
    pub points_without_hits: i32,
    pub points_with_best_bench: i32,
    pub optimal_chip_gains: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCorrelation {
    pub team_1: String,
    pub team_2: String,
    pub shared_gameweeks: u32,
    pub squad_similarity: f64,
    pub captain_similarity: f64,
    pub chip_similarity: f64,
    pub transfer_correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptainPick {
    pub entry_name: String,
    pub captain_id: u32,
    pub captain_name: String,
    pub captain_points: i32,
    pub gw: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormTrend {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub entry_name: String,
    /// Expected points per gameweek.
    pub predicted_points: f64,
    /// Expected points over the whole forecast window.
    pub predicted_total: f64,
    pub form_trend: FormTrend,
    pub confidence: f64,
}

/// One superlative, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub title: String,
    pub team: String,
    pub justification: String,
    pub value: String,
}
