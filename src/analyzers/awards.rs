//! End-of-season superlatives.
//!
//! Every award picks one winner. Ties go to the team whose name sorts first;
//! for single-week awards the earliest gameweek is preferred before that.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::analyzers::types::{Award, SeasonAggregate};
use crate::players::PlayerIdentity;
use crate::record::{Chip, GameweekRecord};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Goal {
    Max,
    Min,
}

impl Goal {
    /// Whether `candidate` strictly beats `held`.
    fn beats(self, candidate: f64, held: f64) -> bool {
        match self {
            Goal::Max => candidate > held,
            Goal::Min => candidate < held,
        }
    }
}

fn award(title: &str, team: &str, justification: impl Into<String>, value: impl Into<String>) -> Award {
    Award {
        title: title.to_string(),
        team: team.to_string(),
        justification: justification.into(),
        value: value.into(),
    }
}

fn pick_team<'a, F>(aggregates: &'a [SeasonAggregate], goal: Goal, key: F) -> Option<&'a SeasonAggregate>
where
    F: Fn(&SeasonAggregate) -> f64,
{
    let mut winner: Option<&SeasonAggregate> = None;
    for agg in aggregates {
        winner = match winner {
            None => Some(agg),
            Some(held) => {
                let (c, h) = (key(agg), key(held));
                if goal.beats(c, h) || (c == h && agg.entry_name < held.entry_name) {
                    Some(agg)
                } else {
                    Some(held)
                }
            }
        };
    }
    winner
}

fn pick_week<'a, I, F>(rows: I, goal: Goal, key: F) -> Option<&'a GameweekRecord>
where
    I: IntoIterator<Item = &'a GameweekRecord>,
    F: Fn(&GameweekRecord) -> i32,
{
    let mut winner: Option<&GameweekRecord> = None;
    for r in rows {
        winner = match winner {
            None => Some(r),
            Some(held) => {
                let (c, h) = (key(r) as f64, key(held) as f64);
                let earlier = (r.gw, &r.entry_name).cmp(&(held.gw, &held.entry_name)) == Ordering::Less;
                if goal.beats(c, h) || (c == h && earlier) {
                    Some(r)
                } else {
                    Some(held)
                }
            }
        };
    }
    winner
}

/// Selects the season's awards in presentation order.
///
/// Awards whose candidate set is empty, such as a chip nobody played, are
/// left out.
pub fn select_awards(
    aggregates: &[SeasonAggregate],
    records: &[GameweekRecord],
    identity: &PlayerIdentity,
) -> Vec<Award> {
    let mut awards = Vec::new();

    let team_awards: [(&str, &str, Goal, fn(&SeasonAggregate) -> i64); 8] = [
        ("Who's the captain?", "Most captain points", Goal::Max, |a| a.captain_points.into()),
        ("The bench was on fire", "Most points left on the bench", Goal::Max, |a| a.bench.into()),
        ("-4, -8 or -12, who's counting?", "Most points spent on hits", Goal::Max, |a| a.hits.into()),
        ("Trust me, I've got a hunch", "Most points gained from transfers", Goal::Max, |a| {
            a.transfer_gain.into()
        }),
        ("Everyone else is behind", "Most gameweeks as the top scorer", Goal::Max, |a| {
            a.best_gw_count.into()
        }),
        ("First seasons are like that", "Most gameweeks as the lowest scorer", Goal::Max, |a| {
            a.worst_gw_count.into()
        }),
        ("Waking up like City", "Biggest improvement from the first half to the second", Goal::Max, |a| {
            a.half_difference.into()
        }),
        ("Ran a sprint, not a marathon", "Biggest drop from the first half to the second", Goal::Min, |a| {
            a.half_difference.into()
        }),
    ];
    for (title, justification, goal, key) in team_awards {
        if let Some(w) = pick_team(aggregates, goal, |a| key(a) as f64) {
            awards.push(award(title, &w.entry_name, justification, key(w).to_string()));
        }
    }

    if let Some(w) = pick_team(aggregates, Goal::Max, |a| a.efficiency) {
        awards.push(award(
            "Manager of the Year",
            &w.entry_name,
            "Highest efficiency",
            format!("{:.2}", w.efficiency),
        ));
    }
    if let Some(w) = pick_team(aggregates, Goal::Max, |a| a.autosub_count as f64) {
        awards.push(award(
            "Super sub",
            &w.entry_name,
            "Most automatic substitutions",
            w.autosub_count.to_string(),
        ));
    }
    if let Some(w) = pick_team(aggregates, Goal::Max, |a| a.event_transfers as f64) {
        awards.push(award(
            "Just one more transfer...",
            &w.entry_name,
            "Most transfers made",
            w.event_transfers.to_string(),
        ));
    }

    let losers: Vec<SeasonAggregate> = aggregates
        .iter()
        .filter(|a| a.transfer_loss < 0)
        .cloned()
        .collect();
    if let Some(w) = pick_team(&losers, Goal::Min, |a| a.transfer_loss as f64) {
        awards.push(award(
            "Should have stayed on the bench",
            &w.entry_name,
            "Most points lost to automatic substitutions",
            w.transfer_loss.to_string(),
        ));
    }

    let chip_week = |chip: Chip| records.iter().filter(move |r| r.used(chip));
    if let Some(w) = pick_week(chip_week(Chip::BenchBoost), Goal::Max, |r| r.bench) {
        awards.push(award(
            "The bench finally delivers",
            &w.entry_name,
            format!("Most bench points with Bench Boost (GW {})", w.gw),
            format!("{} pts", w.bench),
        ));
    }
    if let Some(w) = pick_week(chip_week(Chip::TripleCaptain), Goal::Max, |r| r.captain_points) {
        awards.push(award(
            "Salah or not Salah?",
            &w.entry_name,
            format!("Most captain points with Triple Captain (GW {})", w.gw),
            format!("{} pts", w.captain_points * 3),
        ));
    }
    if let Some(w) = pick_week(chip_week(Chip::FreeHit), Goal::Max, |r| r.points) {
        awards.push(award(
            "Nailed it",
            &w.entry_name,
            format!("Most points with Free Hit (GW {})", w.gw),
            format!("{} pts", w.points),
        ));
    }

    if let Some((player_id, count)) = most_picked(records) {
        awards.push(award(
            "Can't live without him",
            &identity.name(player_id),
            "Most frequently picked player",
            format!("{count} times"),
        ));
    }

    if let Some(w) = pick_week(records, Goal::Min, |r| r.points) {
        awards.push(award(
            "Lowest score of the season",
            &w.entry_name,
            format!("GW {}", w.gw),
            format!("{} pts", w.points),
        ));
    }
    if let Some(w) = pick_week(records, Goal::Max, |r| r.points) {
        awards.push(award(
            "Highest score of the season",
            &w.entry_name,
            format!("GW {}", w.gw),
            format!("{} pts", w.points),
        ));
    }
    if let Some(w) = pick_week(records, Goal::Max, |r| r.bench) {
        awards.push(award(
            "Highest bench score of the season",
            &w.entry_name,
            format!("GW {}", w.gw),
            format!("{} pts", w.bench),
        ));
    }

    awards
}

/// Player found in the most squads across all teams and weeks; lowest id on a tie.
fn most_picked(records: &[GameweekRecord]) -> Option<(u32, u32)> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for r in records {
        for id in r.squad_ids() {
            *counts.entry(id).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
}
