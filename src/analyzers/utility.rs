use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use crate::record::GameweekRecord;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n − 1) standard deviation. `None` for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation of two equally long series.
///
/// `None` when there are fewer than two pairs or either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// Intersection over union. Two empty sets score 0.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Groups records by team, teams in alphabetical order and each team's rows
/// in gameweek order.
pub fn by_team(records: &[GameweekRecord]) -> BTreeMap<&str, Vec<&GameweekRecord>> {
    let mut teams: BTreeMap<&str, Vec<&GameweekRecord>> = BTreeMap::new();
    for r in records {
        teams.entry(r.entry_name.as_str()).or_default().push(r);
    }
    for rows in teams.values_mut() {
        rows.sort_by_key(|r| r.gw);
    }
    teams
}

/// Groups records by gameweek; within a week rows are ordered by team name.
pub fn by_gameweek(records: &[GameweekRecord]) -> BTreeMap<u32, Vec<&GameweekRecord>> {
    let mut weeks: BTreeMap<u32, Vec<&GameweekRecord>> = BTreeMap::new();
    for r in records {
        weeks.entry(r.gw).or_default().push(r);
    }
    for rows in weeks.values_mut() {
        rows.sort_by(|a, b| a.entry_name.cmp(&b.entry_name));
    }
    weeks
}

/// Distinct gameweeks present anywhere in the season.
pub fn season_gameweeks(records: &[GameweekRecord]) -> BTreeSet<u32> {
    records.iter().map(|r| r.gw).collect()
}

/// A team's rows keyed by gameweek.
pub fn index_by_gw<'a>(rows: &[&'a GameweekRecord]) -> BTreeMap<u32, &'a GameweekRecord> {
    rows.iter().map(|r| (r.gw, *r)).collect()
}

/// Records for teams whose scores run from gameweek 1 in order.
#[cfg(test)]
pub(crate) fn season(scores: &[(&str, &[i32])]) -> Vec<GameweekRecord> {
    scores
        .iter()
        .flat_map(|(name, pts)| {
            pts.iter()
                .enumerate()
                .map(move |(i, p)| GameweekRecord::new(*name, i as u32 + 1, *p))
        })
        .collect()
}
