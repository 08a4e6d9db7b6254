use std::collections::HashSet;

use crate::analyzers::types::TeamCorrelation;
use crate::analyzers::utility::{by_team, index_by_gw, jaccard, mean, pearson};
use crate::record::GameweekRecord;

/// Similarity of every pair of teams over the gameweeks both have data for.
///
/// Squad similarity is the mean weekly Jaccard index of the two 15-man
/// squads. Captain and chip similarity are the shares of shared weeks with
/// the same effective captain or the same chip. Transfer correlation is the
/// Pearson coefficient of weekly transfer counts.
pub fn analyze_team_correlation(records: &[GameweekRecord]) -> Vec<TeamCorrelation> {
    let teams: Vec<_> = by_team(records)
        .into_iter()
        .map(|(name, rows)| (name, index_by_gw(&rows)))
        .collect();

    let mut out = Vec::new();
    for (i, (name_1, weeks_1)) in teams.iter().enumerate() {
        for (name_2, weeks_2) in &teams[i + 1..] {
            let shared: Vec<(&GameweekRecord, &GameweekRecord)> = weeks_1
                .iter()
                .filter_map(|(gw, a)| weeks_2.get(gw).map(|b| (*a, *b)))
                .collect();

            let squads: Vec<f64> = shared
                .iter()
                .map(|(a, b)| {
                    let sa: HashSet<u32> = a.squad_ids().into_iter().collect();
                    let sb: HashSet<u32> = b.squad_ids().into_iter().collect();
                    jaccard(&sa, &sb)
                })
                .collect();
            let same_captain = shared
                .iter()
                .filter(|(a, b)| a.captain_id.is_some() && a.captain_id == b.captain_id)
                .count();
            let same_chip = shared
                .iter()
                .filter(|(a, b)| a.chip.is_some() && a.chip == b.chip)
                .count();

            let transfers_1: Vec<f64> = shared.iter().map(|(a, _)| a.event_transfers as f64).collect();
            let transfers_2: Vec<f64> = shared.iter().map(|(_, b)| b.event_transfers as f64).collect();

            let n = shared.len();
            let share = |count: usize| if n == 0 { 0.0 } else { count as f64 / n as f64 };

            out.push(TeamCorrelation {
                team_1: name_1.to_string(),
                team_2: name_2.to_string(),
                shared_gameweeks: n as u32,
                squad_similarity: mean(&squads),
                captain_similarity: share(same_captain),
                chip_similarity: share(same_chip),
                transfer_correlation: pearson(&transfers_1, &transfers_2),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Chip, Pick};

    fn week(name: &str, gw: u32, squad: &[u32], captain: u32, transfers: i32) -> GameweekRecord {
        GameweekRecord {
            team: squad
                .iter()
                .map(|&player_id| Pick { player_id, multiplier: 1, points: 0 })
                .collect(),
            captain_id: Some(captain),
            event_transfers: transfers,
            ..GameweekRecord::new(name, gw, 50)
        }
    }

    #[test]
    fn test_pair_similarity() {
        let mut a2 = week("A", 2, &[1, 2], 1, 2);
        a2.chip = Some(Chip::FreeHit);
        let mut b2 = week("B", 2, &[1, 2], 2, 4);
        b2.chip = Some(Chip::FreeHit);
        let records = vec![
            week("A", 1, &[1, 2, 3], 1, 1),
            week("B", 1, &[2, 3, 4], 1, 2),
            a2,
            b2,
            // Only A has gw 3; it is ignored.
            week("A", 3, &[9], 9, 0),
        ];

        let rows = analyze_team_correlation(&records);
        assert_eq!(rows.len(), 1);
        let c = &rows[0];
        assert_eq!((c.team_1.as_str(), c.team_2.as_str()), ("A", "B"));
        assert_eq!(c.shared_gameweeks, 2);
        assert_eq!(c.squad_similarity, 0.75);
        assert_eq!(c.captain_similarity, 0.5);
        assert_eq!(c.chip_similarity, 0.5);
        assert!((c.transfer_correlation.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_undefined_for_single_week() {
        let records = vec![week("A", 1, &[1], 1, 1), week("B", 1, &[1], 1, 3)];
        let c = &analyze_team_correlation(&records)[0];
        assert_eq!(c.transfer_correlation, None);
        assert_eq!(c.squad_similarity, 1.0);
    }

    #[test]
    fn test_no_shared_weeks() {
        let records = vec![week("A", 1, &[1], 1, 1), week("B", 2, &[1], 1, 1)];
        let c = &analyze_team_correlation(&records)[0];
        assert_eq!(c.shared_gameweeks, 0);
        assert_eq!(c.squad_similarity, 0.0);
        assert_eq!(c.captain_similarity, 0.0);
        assert_eq!(c.transfer_correlation, None);
    }

    #[test]
    fn test_every_unordered_pair_once() {
        let records = vec![
            week("A", 1, &[1], 1, 0),
            week("B", 1, &[1], 1, 0),
            week("C", 1, &[1], 1, 0),
        ];
        let pairs: Vec<_> = analyze_team_correlation(&records)
            .into_iter()
            .map(|c| (c.team_1, c.team_2))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string()),
                ("B".to_string(), "C".to_string()),
            ]
        );
    }
}
