use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::analyzers::aggregate::calculate_aggregates;
use crate::analyzers::awards::select_awards;
use crate::analyzers::captains::{DEFAULT_CAPTAIN_LIMIT, top_captain_picks};
use crate::analyzers::chips::{analyze_chip_timing, manager_chip_points};
use crate::analyzers::correlation::analyze_team_correlation;
use crate::analyzers::forecast::predict_performance;
use crate::analyzers::h2h::{analyze_h2h, win_ratio_matrix};
use crate::analyzers::loyalty::analyze_player_loyalty;
use crate::analyzers::positions::track_league_positions;
use crate::analyzers::streaks::analyze_streaks;
use crate::analyzers::transfers::analyze_transfer_timing;
use crate::analyzers::what_if::analyze_what_if;
use crate::loader::load_data;
use crate::output::write_json;
use crate::report::write_awards_document;

/// Options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub weeks_ahead: u32,
    /// Season label shown in the awards document, e.g. `2025/2026`.
    pub season: String,
}

/// Loads the season table, computes every derived table and writes them as
/// JSON into `out_dir`, followed by the awards document.
#[instrument(skip(options), fields(season = %options.season))]
pub fn analyze(
    season_path: &Path,
    players_path: &Path,
    out_dir: &Path,
    options: &AnalyzeOptions,
) -> Result<()> {
    let (records, identity) = load_data(season_path, players_path)?;
    let teams = records
        .iter()
        .map(|r| r.entry_name.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    info!(rows = records.len(), teams, "Starting analysis");

    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let aggregates = calculate_aggregates(&records)?;
    write_json(out_dir, "aggregates.json", &aggregates)?;

    write_json(out_dir, "streaks.json", &analyze_streaks(&records))?;

    let h2h = analyze_h2h(&records);
    write_json(out_dir, "win_ratios.json", &win_ratio_matrix(&h2h))?;
    write_json(out_dir, "h2h.json", &h2h)?;

    write_json(out_dir, "chip_timing.json", &analyze_chip_timing(&records))?;
    write_json(out_dir, "manager_points.json", &manager_chip_points(&records))?;
    write_json(out_dir, "loyalty.json", &analyze_player_loyalty(&records, &identity))?;
    write_json(out_dir, "transfer_timing.json", &analyze_transfer_timing(&records))?;
    write_json(out_dir, "positions.json", &track_league_positions(&records))?;
    write_json(out_dir, "what_if.json", &analyze_what_if(&records))?;
    write_json(out_dir, "correlation.json", &analyze_team_correlation(&records))?;
    write_json(
        out_dir,
        "top_captains.json",
        &top_captain_picks(&records, &identity, DEFAULT_CAPTAIN_LIMIT),
    )?;
    write_json(
        out_dir,
        "forecast.json",
        &predict_performance(&records, options.weeks_ahead),
    )?;

    let awards = select_awards(&aggregates, &records, &identity);
    write_json(out_dir, "awards.json", &awards)?;
    write_awards_document(&out_dir.join("awards.html"), &awards, &options.season)?;

    info!(out_dir = %out_dir.display(), awards = awards.len(), "Analysis complete");
    Ok(())
}
