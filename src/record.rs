//! Per-gameweek season records.
//!
//! A [`GameweekRecord`] is one row of the persisted season table: one team in
//! one gameweek. Nested fields (the squad and the autosub id lists) are stored
//! as JSON arrays inside a single CSV cell; see [`parse_team`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownChip;

/// Number of gameweeks in a full season.
pub const SEASON_GAMEWEEKS: u32 = 38;

/// Last gameweek of the first half of the season.
pub const HALFWAY_GAMEWEEK: u32 = 19;

/// A one-off special rule a team can play in a gameweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chip {
    #[serde(rename = "3xc")]
    TripleCaptain,
    #[serde(rename = "bboost")]
    BenchBoost,
    #[serde(rename = "freehit")]
    FreeHit,
    #[serde(rename = "manager")]
    Manager,
    #[serde(rename = "wildcard1")]
    Wildcard1,
    #[serde(rename = "wildcard2")]
    Wildcard2,
}

impl Chip {
    pub const ALL: [Chip; 6] = [
        Chip::TripleCaptain,
        Chip::BenchBoost,
        Chip::FreeHit,
        Chip::Manager,
        Chip::Wildcard1,
        Chip::Wildcard2,
    ];

    /// Parses a chip as it appears in the feed or in the season table.
    ///
    /// The feed only knows a single `wildcard`; it is split into
    /// [`Chip::Wildcard1`] and [`Chip::Wildcard2`] by which half of the
    /// season `gw` falls in. Empty cells and pandas' `None`/`nan` mean no chip.
    pub fn from_raw(raw: &str, gw: u32) -> Result<Option<Chip>, UnknownChip> {
        let chip = match raw.trim() {
            "" | "None" | "none" | "nan" | "NaN" => return Ok(None),
            "3xc" => Chip::TripleCaptain,
            "bboost" => Chip::BenchBoost,
            "freehit" => Chip::FreeHit,
            "manager" => Chip::Manager,
            "wildcard" if gw <= HALFWAY_GAMEWEEK => Chip::Wildcard1,
            "wildcard" => Chip::Wildcard2,
            "wildcard1" => Chip::Wildcard1,
            "wildcard2" => Chip::Wildcard2,
            other => return Err(UnknownChip(other.to_string())),
        };
        Ok(Some(chip))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chip::TripleCaptain => "3xc",
            Chip::BenchBoost => "bboost",
            Chip::FreeHit => "freehit",
            Chip::Manager => "manager",
            Chip::Wildcard1 => "wildcard1",
            Chip::Wildcard2 => "wildcard2",
        }
    }

    /// Human readable name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Chip::TripleCaptain => "Triple Captain",
            Chip::BenchBoost => "Bench Boost",
            Chip::FreeHit => "Free Hit",
            Chip::Manager => "Assistant Manager",
            Chip::Wildcard1 => "Wildcard - 1st Round",
            Chip::Wildcard2 => "Wildcard - 2nd Round",
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One squad slot in a gameweek.
///
/// `multiplier` is 0 for benched players, 1 for starters, 2 for the captain
/// and 3 for a triple captain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub player_id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multiplier: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i32,
}

/// Legacy literals write `None` for a missing score; read it as zero.
fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One team in one gameweek.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameweekRecord {
    pub gw: u32,
    pub entry_name: String,
    pub player_name: String,
    pub points: i32,
    pub bench: i32,
    pub hits: i32,
    pub event_transfers: i32,
    pub chip: Option<Chip>,
    pub autosub_count: u32,
    pub captain_id: Option<u32>,
    pub captain_points: i32,
    #[serde(serialize_with = "serialize_cell")]
    pub team: Vec<Pick>,
    #[serde(serialize_with = "serialize_cell")]
    pub transfer_in_ids: Vec<u32>,
    #[serde(serialize_with = "serialize_cell")]
    pub transfer_out_ids: Vec<u32>,
    pub transfer_gain: i32,
}

impl GameweekRecord {
    /// A record with the given identity and score and every other field zeroed.
    pub fn new(entry_name: impl Into<String>, gw: u32, points: i32) -> Self {
        Self {
            gw,
            entry_name: entry_name.into(),
            points,
            ..Default::default()
        }
    }

    pub fn used(&self, chip: Chip) -> bool {
        self.chip == Some(chip)
    }

    /// Player ids of the full squad, starters and bench alike.
    pub fn squad_ids(&self) -> BTreeSet<u32> {
        self.team.iter().map(|p| p.player_id).collect()
    }

    pub fn first_half(&self) -> bool {
        self.gw <= HALFWAY_GAMEWEEK
    }
}

fn serialize_cell<T: Serialize, S: Serializer>(items: &[T], serializer: S) -> Result<S::Ok, S::Error> {
    let text = serde_json::to_string(items).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

/// Legacy tables stored the squad as a bare list of player ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum PickCell {
    Id(u32),
    Full(Pick),
}

/// Parses the `team` column.
///
/// Accepts the JSON written by this crate, Python literal lists
/// (`[{'player_id': 1, ...}]`) and bare id lists (`[1, 2, 3]`, loaded with
/// multiplier and points set to 0). An empty cell is an empty squad.
pub fn parse_team(cell: &str) -> Result<Vec<Pick>, serde_json::Error> {
    let cells: Vec<PickCell> = serde_json::from_str(&normalize_literal(cell))?;
    Ok(cells
        .into_iter()
        .map(|c| match c {
            PickCell::Id(player_id) => Pick {
                player_id,
                multiplier: 0,
                points: 0,
            },
            PickCell::Full(pick) => pick,
        })
        .collect())
}

/// Parses an id list column such as `transfer_in_ids`.
pub fn parse_ids(cell: &str) -> Result<Vec<u32>, serde_json::Error> {
    serde_json::from_str(&normalize_literal(cell))
}

/// Rewrites a Python list literal into JSON. The lists only hold numbers and
/// fixed keys, so a plain token swap is enough.
fn normalize_literal(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        return "[]".to_string();
    }
    trimmed
        .replace('\'', "\"")
        .replace("None", "null")
        .replace("True", "true")
        .replace("False", "false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_split_by_half() {
        assert_eq!(Chip::from_raw("wildcard", 10).unwrap(), Some(Chip::Wildcard1));
        assert_eq!(Chip::from_raw("wildcard", 19).unwrap(), Some(Chip::Wildcard1));
        assert_eq!(Chip::from_raw("wildcard", 20).unwrap(), Some(Chip::Wildcard2));
        assert_eq!(Chip::from_raw("wildcard", 25).unwrap(), Some(Chip::Wildcard2));
    }

    #[test]
    fn test_chip_empty_values() {
        for raw in ["", "None", "nan", "  "] {
            assert_eq!(Chip::from_raw(raw, 3).unwrap(), None);
        }
    }

    #[test]
    fn test_chip_unknown_value() {
        let err = Chip::from_raw("quadcaptain", 3).unwrap_err();
        assert_eq!(err.0, "quadcaptain");
    }

    #[test]
    fn test_chip_names_round_trip() {
        for chip in Chip::ALL {
            assert_eq!(Chip::from_raw(chip.as_str(), 30).unwrap(), Some(chip));
        }
    }

    #[test]
    fn test_team_text_round_trip() {
        let team = vec![
            Pick { player_id: 1, multiplier: 1, points: 2 },
            Pick { player_id: 351, multiplier: 2, points: 13 },
            Pick { player_id: 77, multiplier: 0, points: -1 },
        ];
        let text = serde_json::to_string(&team).unwrap();
        assert_eq!(parse_team(&text).unwrap(), team);
    }

    #[test]
    fn test_parse_python_literal_team() {
        let cell = "[{'player_id': 5, 'multiplier': 3, 'points': 8}, {'player_id': 6, 'multiplier': 0, 'points': 1}]";
        let team = parse_team(cell).unwrap();
        assert_eq!(team.len(), 2);
        assert_eq!(team[0], Pick { player_id: 5, multiplier: 3, points: 8 });
    }

    #[test]
    fn test_parse_python_literal_with_none() {
        let team = parse_team("[{'player_id': 1, 'multiplier': None, 'points': 2}, {'player_id': 4, 'multiplier': 1, 'points': None}]").unwrap();
        assert_eq!(team[0], Pick { player_id: 1, multiplier: 0, points: 2 });
        assert_eq!(team[1], Pick { player_id: 4, multiplier: 1, points: 0 });
    }

    #[test]
    fn test_parse_bare_id_team() {
        let team = parse_team("[10, 11, 12]").unwrap();
        assert_eq!(team.iter().map(|p| p.player_id).collect::<Vec<_>>(), vec![10, 11, 12]);
        assert!(team.iter().all(|p| p.multiplier == 0 && p.points == 0));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("[4, 9]").unwrap(), vec![4, 9]);
        assert!(parse_ids("").unwrap().is_empty());
        assert!(parse_ids("[x]").is_err());
    }

    #[test]
    fn test_squad_ids() {
        let mut r = GameweekRecord::new("A", 1, 50);
        r.team = vec![
            Pick { player_id: 3, multiplier: 1, points: 0 },
            Pick { player_id: 1, multiplier: 1, points: 0 },
        ];
        assert_eq!(r.squad_ids().into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }
}
