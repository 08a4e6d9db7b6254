use std::collections::BTreeMap;

use crate::analyzers::types::WhatIf;
use crate::analyzers::utility::{by_gameweek, by_team};
use crate::record::{Chip, GameweekRecord};

/// Number of bench weeks compared in the best-bench scenario.
const BENCH_WEEKS: usize = 11;

const TIMED_CHIPS: [Chip; 3] = [Chip::TripleCaptain, Chip::BenchBoost, Chip::FreeHit];

/// Counterfactual season totals for every team.
///
/// Captain and chip scenarios compare against the best the whole league
/// managed, so a team that already made the best call gains nothing. Bench
/// boost weeks are left out of the bench scenario.
pub fn analyze_what_if(records: &[GameweekRecord]) -> Vec<WhatIf> {
    let best_captain: BTreeMap<u32, i32> = by_gameweek(records)
        .into_iter()
        .map(|(gw, rows)| {
            let top = rows.iter().map(|r| r.captain_points).max().unwrap_or(0);
            (gw, top)
        })
        .collect();

    let mut league_bench: Vec<i32> = records
        .iter()
        .filter(|r| !r.used(Chip::BenchBoost))
        .map(|r| r.bench)
        .collect();
    league_bench.sort_unstable_by(|a, b| b.cmp(a));
    let best_bench: i32 = league_bench.iter().take(BENCH_WEEKS).sum();

    let best_chip_week: BTreeMap<Chip, i32> = TIMED_CHIPS
        .iter()
        .filter_map(|&chip| {
            records
                .iter()
                .filter(|r| r.used(chip))
                .map(|r| r.points)
                .max()
                .map(|top| (chip, top))
        })
        .collect();

    by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let actual: i32 = rows.iter().map(|r| r.points).sum();
            let own_captains: i32 = rows.iter().map(|r| r.captain_points).sum();
            let league_captains: i32 = rows
                .iter()
                .map(|r| best_captain.get(&r.gw).copied().unwrap_or(r.captain_points))
                .sum();
            let hits: i32 = rows.iter().map(|r| r.hits).sum();
            let own_bench: i32 = rows
                .iter()
                .filter(|r| !r.used(Chip::BenchBoost))
                .map(|r| r.bench)
                .sum();

            let chip_gains: i32 = TIMED_CHIPS
                .iter()
                .filter_map(|chip| {
                    let played = rows.iter().find(|r| r.used(*chip))?;
                    let best = best_chip_week.get(chip)?;
                    Some(best - played.points)
                })
                .sum();

            WhatIf {
                entry_name: name.to_string(),
                actual_points: actual,
                points_with_best_captains: actual - own_captains + league_captains,
                points_without_hits: actual + hits,
                points_with_best_bench: actual + (best_bench - own_bench),
                optimal_chip_gains: chip_gains,
            }
        })
        .collect()
}
