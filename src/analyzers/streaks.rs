use std::collections::BTreeMap;

use crate::analyzers::types::StreakRow;
use crate::analyzers::utility::{by_gameweek, by_team, mean};
use crate::record::GameweekRecord;

/// Runs of gameweeks spent above or below the league's weekly mean.
///
/// A score equal to the mean counts as below.
pub fn analyze_streaks(records: &[GameweekRecord]) -> Vec<StreakRow> {
    let weekly_mean: BTreeMap<u32, f64> = by_gameweek(records)
        .into_iter()
        .map(|(gw, rows)| {
            let pts: Vec<f64> = rows.iter().map(|r| r.points as f64).collect();
            (gw, mean(&pts))
        })
        .collect();

    by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let mut current: i32 = 0;
            let mut longest_good: i32 = 0;
            let mut longest_bad: i32 = 0;

            for r in rows {
                let above = (r.points as f64) > weekly_mean[&r.gw];
                if above {
                    current = if current >= 0 { current + 1 } else { 1 };
                    longest_good = longest_good.max(current);
                } else {
                    current = if current <= 0 { current - 1 } else { -1 };
                    longest_bad = longest_bad.max(-current);
                }
            }

            StreakRow {
                entry_name: name.to_string(),
                longest_good_streak: longest_good as u32,
                longest_bad_streak: longest_bad as u32,
                current_streak: current,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::utility::season;

    #[test]
    fn test_streak_runs() {
        // A: above, above, below, above, above, above
        let records = season(&[
            ("A", &[60, 60, 40, 60, 60, 60]),
            ("B", &[40, 40, 60, 40, 40, 40]),
        ]);
        let rows = analyze_streaks(&records);

        assert_eq!(rows[0].entry_name, "A");
        assert_eq!(rows[0].longest_good_streak, 3);
        assert_eq!(rows[0].longest_bad_streak, 1);
        assert_eq!(rows[0].current_streak, 3);

        assert_eq!(rows[1].longest_good_streak, 1);
        assert_eq!(rows[1].longest_bad_streak, 3);
        assert_eq!(rows[1].current_streak, -3);
    }

    #[test]
    fn test_equal_to_mean_counts_as_below() {
        let records = season(&[("A", &[50, 50]), ("B", &[50, 50])]);
        for row in analyze_streaks(&records) {
            assert_eq!(row.longest_good_streak, 0);
            assert_eq!(row.longest_bad_streak, 2);
            assert_eq!(row.current_streak, -2);
        }
    }

    #[test]
    fn test_rerun_is_identical() {
        let records = season(&[("A", &[10, 80, 55, 42]), ("B", &[70, 20, 55, 43]), ("C", &[33, 66, 12, 90])]);
        assert_eq!(analyze_streaks(&records), analyze_streaks(&records));
    }

    #[test]
    fn test_team_with_gap() {
        let mut records = season(&[("A", &[60, 60, 60]), ("B", &[40, 40, 40])]);
        records.retain(|r| !(r.entry_name == "A" && r.gw == 2));
        let rows = analyze_streaks(&records);
        // gw 2 only has B, which then equals the mean.
        assert_eq!(rows[0].longest_good_streak, 2);
        assert_eq!(rows[1].longest_bad_streak, 3);
    }
}
