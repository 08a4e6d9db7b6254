use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::{LeaguePositions, PositionPoint, PositionSummary};
use crate::analyzers::utility::by_gameweek;
use crate::record::GameweekRecord;

/// League table after every gameweek, and each team's history in it.
///
/// Teams are ranked by cumulative points, highest first; equal totals rank
/// alphabetically. A team with no row in a gameweek is left out of that
/// week's table but keeps its running total.
pub fn track_league_positions(records: &[GameweekRecord]) -> LeaguePositions {
    let mut totals: HashMap<&str, i32> = HashMap::new();
    let mut history = Vec::new();
    let mut per_team: BTreeMap<&str, Vec<u32>> = BTreeMap::new();

    for (gw, rows) in by_gameweek(records) {
        for r in &rows {
            *totals.entry(r.entry_name.as_str()).or_default() += r.points;
        }

        let mut table: Vec<(&str, i32)> = rows
            .iter()
            .map(|r| (r.entry_name.as_str(), totals[r.entry_name.as_str()]))
            .collect();
        table.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        for (idx, (name, cumulative)) in table.into_iter().enumerate() {
            let position = idx as u32 + 1;
            per_team.entry(name).or_default().push(position);
            history.push(PositionPoint {
                entry_name: name.to_string(),
                gw,
                cumulative_points: cumulative,
                position,
            });
        }
    }

    let summary = per_team
        .into_iter()
        .map(|(name, positions)| summarize(name, &positions))
        .collect();

    LeaguePositions { history, summary }
}

fn summarize(name: &str, positions: &[u32]) -> PositionSummary {
    let changes = positions.windows(2).filter(|w| w[0] != w[1]).count() as u32;
    let last = positions.last().copied().unwrap_or(0);
    let current_streak = positions.iter().rev().take_while(|p| **p == last).count() as u32;

    PositionSummary {
        entry_name: name.to_string(),
        highest_position: positions.iter().copied().min().unwrap_or(0),
        lowest_position: positions.iter().copied().max().unwrap_or(0),
        weeks_at_top: positions.iter().filter(|p| **p == 1).count() as u32,
        avg_position: positions.iter().map(|p| *p as f64).sum::<f64>() / positions.len().max(1) as f64,
        position_changes: changes,
        current_streak,
    }
}
