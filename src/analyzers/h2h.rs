use crate::analyzers::types::{H2hRow, WinRatioMatrix};
use crate::analyzers::utility::{by_team, index_by_gw, mean};
use crate::record::GameweekRecord;

/// Gameweek-by-gameweek duels for every pair of teams.
///
/// Pairs are emitted with `team_1` alphabetically before `team_2`. Drawn
/// weeks count for neither side.
pub fn analyze_h2h(records: &[GameweekRecord]) -> Vec<H2hRow> {
    let teams: Vec<_> = by_team(records)
        .into_iter()
        .map(|(name, rows)| (name, index_by_gw(&rows)))
        .collect();

    let mut out = Vec::new();
    for (i, (name_1, weeks_1)) in teams.iter().enumerate() {
        for (name_2, weeks_2) in &teams[i + 1..] {
            let mut wins_1 = 0;
            let mut wins_2 = 0;
            let mut margins = Vec::new();

            for (gw, r1) in weeks_1 {
                let Some(r2) = weeks_2.get(gw) else { continue };
                if r1.points > r2.points {
                    wins_1 += 1;
                } else if r2.points > r1.points {
                    wins_2 += 1;
                }
                margins.push((r1.points - r2.points) as f64);
            }

            out.push(H2hRow {
                team_1: name_1.to_string(),
                team_2: name_2.to_string(),
                wins_1,
                wins_2,
                avg_margin: mean(&margins),
                shared_gameweeks: margins.len() as u32,
            });
        }
    }
    out
}

/// Square matrix of win ratios built from [`analyze_h2h`] rows.
///
/// Cell `(i, j)` is `wins_i / (wins_i + wins_j)`; pairs that never produced a
/// decisive week, and the diagonal, are 0.
pub fn win_ratio_matrix(rows: &[H2hRow]) -> WinRatioMatrix {
    let mut teams: Vec<String> = rows
        .iter()
        .flat_map(|r| [r.team_1.clone(), r.team_2.clone()])
        .collect();
    teams.sort();
    teams.dedup();

    let n = teams.len();
    let mut ratios = vec![vec![0.0; n]; n];
    let idx = |name: &str| teams.binary_search_by(|t| t.as_str().cmp(name)).ok();

    for row in rows {
        let (Some(i), Some(j)) = (idx(&row.team_1), idx(&row.team_2)) else {
            continue;
        };
        let games = row.wins_1 + row.wins_2;
        if games > 0 {
            let ratio = row.wins_1 as f64 / games as f64;
            ratios[i][j] = ratio;
            ratios[j][i] = 1.0 - ratio;
        }
    }

    WinRatioMatrix { teams, ratios }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::utility::season;

    #[test]
    fn test_two_team_scenario() {
        let records = season(&[("A", &[50, 60, 40]), ("B", &[40, 70, 50])]);
        let rows = analyze_h2h(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_1, "A");
        assert_eq!(rows[0].wins_1, 1);
        assert_eq!(rows[0].wins_2, 2);
        assert!((rows[0].avg_margin - (-10.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ties_count_for_neither() {
        let records = season(&[("A", &[50, 60, 40]), ("B", &[50, 60, 41])]);
        let row = &analyze_h2h(&records)[0];
        assert_eq!((row.wins_1, row.wins_2), (0, 1));
        assert!(row.wins_1 + row.wins_2 <= row.shared_gameweeks);
    }

    #[test]
    fn test_only_shared_weeks_compared() {
        let mut records = season(&[("A", &[50, 60, 40]), ("B", &[40, 70, 50])]);
        records.retain(|r| !(r.entry_name == "B" && r.gw == 3));
        let row = &analyze_h2h(&records)[0];
        assert_eq!(row.shared_gameweeks, 2);
        assert_eq!((row.wins_1, row.wins_2), (1, 1));
    }

    #[test]
    fn test_matrix_is_complementary() {
        let records = season(&[
            ("A", &[50, 60, 40, 80]),
            ("B", &[40, 70, 50, 20]),
            ("C", &[45, 65, 45, 80]),
        ]);
        let matrix = win_ratio_matrix(&analyze_h2h(&records));
        assert_eq!(matrix.teams, vec!["A", "B", "C"]);

        for row in analyze_h2h(&records) {
            if row.wins_1 + row.wins_2 == 0 {
                continue;
            }
            let ij = matrix.ratio(&row.team_1, &row.team_2).unwrap();
            let ji = matrix.ratio(&row.team_2, &row.team_1).unwrap();
            assert!((ij + ji - 1.0).abs() < 1e-12);
        }
        assert_eq!(matrix.ratio("A", "A"), Some(0.0));
    }

    #[test]
    fn test_matrix_no_decisive_weeks() {
        let records = season(&[("A", &[50]), ("B", &[50])]);
        let matrix = win_ratio_matrix(&analyze_h2h(&records));
        assert_eq!(matrix.ratios, vec![vec![0.0, 0.0], vec![0.0, 0.0]]);
    }
}
