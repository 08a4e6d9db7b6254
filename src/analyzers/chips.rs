use crate::analyzers::types::{ChipTiming, ManagerChipPoints};
use crate::analyzers::utility::{by_team, mean};
use crate::record::{Chip, GameweekRecord};

/// Early vs late effectiveness of every chip that was played at least once.
///
/// The best gameweek is the highest-scoring week the chip was played in;
/// ties go to the earlier gameweek, then to the alphabetically first team.
pub fn analyze_chip_timing(records: &[GameweekRecord]) -> Vec<ChipTiming> {
    Chip::ALL
        .iter()
        .filter_map(|&chip| {
            let mut uses: Vec<&GameweekRecord> = records.iter().filter(|r| r.used(chip)).collect();
            if uses.is_empty() {
                return None;
            }
            uses.sort_by(|a, b| a.gw.cmp(&b.gw).then_with(|| a.entry_name.cmp(&b.entry_name)));

            let half_mean = |early: bool| {
                let pts: Vec<f64> = uses
                    .iter()
                    .filter(|r| r.first_half() == early)
                    .map(|r| r.points as f64)
                    .collect();
                (!pts.is_empty()).then(|| mean(&pts))
            };

            let mut best = uses[0];
            for r in &uses[1..] {
                if r.points > best.points {
                    best = *r;
                }
            }

            Some(ChipTiming {
                chip,
                uses: uses.len() as u32,
                avg_points_early: half_mean(true),
                avg_points_late: half_mean(false),
                best_gw: best.gw,
                best_entry: best.entry_name.clone(),
                best_points: best.points,
            })
        })
        .collect()
}

/// Points collected by the assistant manager, per team that played the chip.
///
/// The manager occupies the last squad slot in the weeks the chip is active.
pub fn manager_chip_points(records: &[GameweekRecord]) -> Vec<ManagerChipPoints> {
    by_team(records)
        .into_iter()
        .filter_map(|(name, rows)| {
            let weeks: Vec<_> = rows.iter().filter(|r| r.used(Chip::Manager)).collect();
            if weeks.is_empty() {
                return None;
            }
            Some(ManagerChipPoints {
                entry_name: name.to_string(),
                weeks: weeks.len() as u32,
                manager_points: weeks
                    .iter()
                    .filter_map(|r| r.team.last())
                    .map(|p| p.points)
                    .sum(),
            })
        })
        .collect()
}
