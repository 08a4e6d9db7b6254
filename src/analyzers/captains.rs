use std::collections::BTreeMap;

use crate::analyzers::types::CaptainPick;
use crate::players::PlayerIdentity;
use crate::record::GameweekRecord;

pub const DEFAULT_CAPTAIN_LIMIT: usize = 30;

/// Best captain hauls in the league.
///
/// Each (team, captain) pair appears once, with the week that captain scored
/// most for that team; the earliest such week wins a tie. Ordered by points,
/// highest first, then by team name and gameweek.
pub fn top_captain_picks(
    records: &[GameweekRecord],
    identity: &PlayerIdentity,
    limit: usize,
) -> Vec<CaptainPick> {
    let mut best: BTreeMap<(&str, u32), &GameweekRecord> = BTreeMap::new();
    for r in records {
        let Some(captain) = r.captain_id else { continue };
        best.entry((r.entry_name.as_str(), captain))
            .and_modify(|held| {
                let better = r.captain_points > held.captain_points
                    || (r.captain_points == held.captain_points && r.gw < held.gw);
                if better {
                    *held = r;
                }
            })
            .or_insert(r);
    }

    let mut picks: Vec<CaptainPick> = best
        .into_iter()
        .map(|((name, captain_id), r)| CaptainPick {
            entry_name: name.to_string(),
            captain_id,
            captain_name: identity.name(captain_id),
            captain_points: r.captain_points,
            gw: r.gw,
        })
        .collect();
    picks.sort_by(|a, b| {
        b.captain_points
            .cmp(&a.captain_points)
            .then_with(|| a.entry_name.cmp(&b.entry_name))
            .then(a.gw.cmp(&b.gw))
    });
    picks.truncate(limit);
    picks
}
