use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::{debug, error};

use crate::analyzers::types::SeasonAggregate;
use crate::analyzers::utility::{by_gameweek, by_team, mean, season_gameweeks};
use crate::record::{Chip, GameweekRecord, HALFWAY_GAMEWEEK};

/// Points deducted for one extra transfer.
const HIT_COST: i32 = 4;

/// Folds every team's gameweek rows into one [`SeasonAggregate`], ordered by
/// team name.
///
/// Efficiency divides by the number of gameweeks in the whole season, so a
/// team with missing weeks is not flattered. Everything else uses the rows the
/// team actually has.
pub fn calculate_aggregates(records: &[GameweekRecord]) -> Result<Vec<SeasonAggregate>> {
    if records.is_empty() {
        error!("Cannot aggregate an empty season");
        bail!("cannot aggregate an empty season");
    }

    let num_gw = season_gameweeks(records).len();
    let (best, worst) = gameweek_extremes(records);
    debug!(num_gw, teams = best.len(), "Aggregating season");

    let aggregates = by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let sum = |f: fn(&GameweekRecord) -> i32| rows.iter().map(|r| f(r)).sum::<i32>();

            let points = sum(|r| r.points);
            let bench = sum(|r| r.bench);
            let hits = sum(|r| r.hits);

            let weekly_points: Vec<f64> = rows.iter().map(|r| r.points as f64).collect();
            let weekly_bench: Vec<f64> = rows.iter().map(|r| r.bench as f64).collect();

            let first_half = rows
                .iter()
                .filter(|r| r.gw <= HALFWAY_GAMEWEEK)
                .map(|r| r.points)
                .sum::<i32>();
            let second_half = points - first_half;

            SeasonAggregate {
                entry_name: name.to_string(),
                points,
                bench,
                hits,
                captain_points: sum(|r| r.captain_points),
                transfer_gain: sum(|r| r.transfer_gain),
                event_transfers: sum(|r| r.event_transfers),
                autosub_count: rows.iter().map(|r| r.autosub_count).sum(),
                avg_gw_points: mean(&weekly_points),
                avg_bench_points: mean(&weekly_bench),
                efficiency: (points - hits) as f64 / num_gw as f64,
                transfer_loss: rows
                    .iter()
                    .map(|r| r.transfer_gain)
                    .filter(|g| *g < 0)
                    .sum(),
                total_hits: hits.div_euclid(HIT_COST),
                max_bench_points: rows
                    .iter()
                    .filter(|r| !r.used(Chip::BenchBoost))
                    .map(|r| r.bench)
                    .sum(),
                best_gw_count: best.get(name).copied().unwrap_or(0),
                worst_gw_count: worst.get(name).copied().unwrap_or(0),
                first_half,
                second_half,
                half_difference: second_half - first_half,
            }
        })
        .collect();

    Ok(aggregates)
}

/// Counts, per team, the gameweeks it topped and the ones it finished last.
///
/// Exactly one team is credited per gameweek; on a tie the alphabetically
/// first team wins.
fn gameweek_extremes(records: &[GameweekRecord]) -> (HashMap<&str, u32>, HashMap<&str, u32>) {
    let mut best: HashMap<&str, u32> = HashMap::new();
    let mut worst: HashMap<&str, u32> = HashMap::new();

    for rows in by_gameweek(records).values() {
        let Some(first) = rows.first() else { continue };
        let mut top = *first;
        let mut bottom = *first;
        for r in rows.iter().skip(1) {
            if r.points > top.points {
                top = *r;
            }
            if r.points < bottom.points {
                bottom = *r;
            }
        }
        *best.entry(top.entry_name.as_str()).or_default() += 1;
        *worst.entry(bottom.entry_name.as_str()).or_default() += 1;
    }

    (best, worst)
}
