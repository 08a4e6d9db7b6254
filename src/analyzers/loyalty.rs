use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::LoyalPlayer;
use crate::analyzers::utility::{by_team, mean};
use crate::players::PlayerIdentity;
use crate::record::GameweekRecord;

/// Consecutive weeks a player must be owned to count as loyal.
pub const LOYALTY_MIN_WEEKS: u32 = 5;

#[derive(Default)]
struct Ownership {
    longest: u32,
    current: u32,
    points: Vec<f64>,
}

/// Players each team kept for the longest unbroken runs.
///
/// A player's run resets when the player drops out of the 15-man squad; points from
/// earlier spells still count towards the average. Lists are ordered by run
/// length, longest first.
pub fn analyze_player_loyalty(
    records: &[GameweekRecord],
    identity: &PlayerIdentity,
) -> BTreeMap<String, Vec<LoyalPlayer>> {
    by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let mut history: HashMap<u32, Ownership> = HashMap::new();

            for r in rows {
                for pick in &r.team {
                    let own = history.entry(pick.player_id).or_default();
                    own.current += 1;
                    own.longest = own.longest.max(own.current);
                    own.points.push(pick.points as f64);
                }
                let squad = r.squad_ids();
                for (id, own) in history.iter_mut() {
                    if !squad.contains(id) {
                        own.current = 0;
                    }
                }
            }

            let mut loyal: Vec<LoyalPlayer> = history
                .into_iter()
                .filter(|(_, own)| own.longest >= LOYALTY_MIN_WEEKS)
                .map(|(id, own)| LoyalPlayer {
                    player_id: id,
                    player_name: identity.name(id),
                    weeks_owned: own.longest,
                    avg_points: mean(&own.points),
                })
                .collect();
            loyal.sort_by(|a, b| {
                b.weeks_owned
                    .cmp(&a.weeks_owned)
                    .then(a.player_id.cmp(&b.player_id))
            });

            (name.to_string(), loyal)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerName;
    use crate::record::Pick;

    fn week(gw: u32, squad: &[(u32, i32)]) -> GameweekRecord {
        GameweekRecord {
            team: squad
                .iter()
                .map(|&(player_id, points)| Pick { player_id, multiplier: 1, points })
                .collect(),
            ..GameweekRecord::new("A", gw, 50)
        }
    }

    #[test]
    fn test_run_resets_when_dropped() {
        // Player 1: gws 1-3, dropped in 4, back 5-10 (run of 6).
        // Player 2: gws 1-4 only (run of 4, not loyal).
        let mut records = Vec::new();
        for gw in 1..=10 {
            let mut squad = Vec::new();
            if gw != 4 {
                squad.push((1, 4));
            }
            if gw <= 4 {
                squad.push((2, 2));
            }
            records.push(week(gw, &squad));
        }

        let loyalty = analyze_player_loyalty(&records, &PlayerIdentity::default());
        let team = &loyalty["A"];
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].player_id, 1);
        assert_eq!(team[0].weeks_owned, 6);
        assert_eq!(team[0].avg_points, 4.0);
        assert_eq!(team[0].player_name, "1");
    }

    #[test]
    fn test_sorted_by_run_length() {
        let identity = PlayerIdentity::from_entries([PlayerName {
            id: 9,
            name: "Haaland".to_string(),
        }]);
        let records: Vec<_> = (1..=8)
            .map(|gw| {
                if gw <= 5 {
                    week(gw, &[(9, 10), (3, 1)])
                } else {
                    week(gw, &[(9, 2)])
                }
            })
            .collect();

        let team = &analyze_player_loyalty(&records, &identity)["A"];
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].player_name, "Haaland");
        assert_eq!(team[0].weeks_owned, 8);
        assert_eq!(team[1].weeks_owned, 5);
        assert!(team.iter().all(|p| p.weeks_owned >= LOYALTY_MIN_WEEKS));
    }

    #[test]
    fn test_team_without_loyal_players_has_empty_list() {
        let records = vec![week(1, &[(1, 2)]), week(2, &[(2, 2)])];
        let loyalty = analyze_player_loyalty(&records, &PlayerIdentity::default());
        assert!(loyalty["A"].is_empty());
    }
}
