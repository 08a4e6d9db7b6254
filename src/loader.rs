//! Season table and player identity loading.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::LoadError;
use crate::players::{PlayerIdentity, PlayerName};
use crate::record::{Chip, GameweekRecord, parse_ids, parse_team};

/// Columns every season table must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "points",
    "bench",
    "hits",
    "captain_points",
    "team",
    "chip",
    "gw",
    "entry_name",
    "captain_id",
    "transfer_gain",
];

/// Loads the season table and the player identity mapping.
///
/// The identity file is optional: when it is missing or unreadable a warning
/// is logged and every lookup falls back to the raw player id.
pub fn load_data(
    season_path: &Path,
    players_path: &Path,
) -> Result<(Vec<GameweekRecord>, PlayerIdentity), LoadError> {
    let records = load_season(season_path)?;

    let identity = if players_path.exists() {
        match load_player_identity(players_path) {
            Ok(identity) => {
                info!(players = identity.len(), "Loaded player mapping");
                identity
            }
            Err(e) => {
                warn!(path = %players_path.display(), error = %e, "Continuing without player mapping");
                PlayerIdentity::default()
            }
        }
    } else {
        warn!(path = %players_path.display(), "Player mapping file not found");
        PlayerIdentity::default()
    };

    Ok((records, identity))
}

/// Reads the identity file: a JSON array of `{id, name}` objects.
pub fn load_player_identity(path: &Path) -> anyhow::Result<PlayerIdentity> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let entries: Vec<PlayerName> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(PlayerIdentity::from_entries(entries))
}

/// A season table row as it sits in the CSV, before nested cells are parsed.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(deserialize_with = "lenient::int")]
    gw: i64,
    entry_name: String,
    #[serde(default)]
    player_name: String,
    #[serde(deserialize_with = "lenient::int")]
    points: i64,
    #[serde(deserialize_with = "lenient::int")]
    bench: i64,
    #[serde(deserialize_with = "lenient::int")]
    hits: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    event_transfers: i64,
    #[serde(default)]
    chip: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    autosub_count: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_int")]
    captain_id: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    captain_points: i64,
    team: String,
    #[serde(default)]
    transfer_in_ids: String,
    #[serde(default)]
    transfer_out_ids: String,
    #[serde(deserialize_with = "lenient::int")]
    transfer_gain: i64,
}

/// Reads the season table at `path`. Paths ending in `.gz` are decompressed.
pub fn load_season(path: &Path) -> Result<Vec<GameweekRecord>, LoadError> {
    let path_str = path.display().to_string();
    info!(path = %path_str, "Loading season data");

    if !path.exists() {
        error!(path = %path_str, "Season data file not found");
        return Err(LoadError::MissingFile { path: path_str });
    }

    let reader = open_reader(path).map_err(|source| LoadError::Io {
        path: path_str.clone(),
        source,
    })?;
    let mut rdr = csv::Reader::from_reader(reader);
    let csv_err = |source| LoadError::Csv {
        path: path_str.clone(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    if headers.is_empty() || rows.is_empty() {
        error!(path = %path_str, "Season data file is empty");
        return Err(LoadError::EmptyData { path: path_str.clone() });
    }

    let present: BTreeSet<&str> = headers.iter().map(str::trim).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !missing.is_empty() {
        error!(path = %path_str, ?missing, "Season data is missing required columns");
        return Err(LoadError::Schema {
            path: path_str.clone(),
            missing,
        });
    }

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let raw: RawRow = row.deserialize(Some(&headers)).map_err(csv_err)?;
        records.push(into_record(raw, &path_str, idx + 1)?);
    }

    info!(path = %path_str, rows = records.len(), "Loaded season data");
    Ok(records)
}

fn open_reader(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn into_record(raw: RawRow, path: &str, row: usize) -> Result<GameweekRecord, LoadError> {
    let field_err = |field: &'static str, reason: String| LoadError::Field {
        path: path.to_string(),
        row,
        field,
        reason,
    };

    let gw = u32::try_from(raw.gw)
        .ok()
        .filter(|gw| *gw >= 1)
        .ok_or_else(|| field_err("gw", format!("{} is not a gameweek", raw.gw)))?;
    let chip = Chip::from_raw(raw.chip.as_deref().unwrap_or(""), gw)
        .map_err(|e| field_err("chip", e.to_string()))?;
    let team = parse_team(&raw.team).map_err(|e| field_err("team", e.to_string()))?;
    let transfer_in_ids =
        parse_ids(&raw.transfer_in_ids).map_err(|e| field_err("transfer_in_ids", e.to_string()))?;
    let transfer_out_ids = parse_ids(&raw.transfer_out_ids)
        .map_err(|e| field_err("transfer_out_ids", e.to_string()))?;
    let captain_id = raw
        .captain_id
        .map(|id| u32::try_from(id).map_err(|_| field_err("captain_id", format!("{id} is not a player id"))))
        .transpose()?;

    let narrow = |field: &'static str, value: i64| {
        i32::try_from(value).map_err(|_| field_err(field, format!("{value} is out of range")))
    };

    let autosub_count = match raw.autosub_count {
        Some(n) => u32::try_from(n).map_err(|_| field_err("autosub_count", format!("{n} is negative")))?,
        None => transfer_in_ids.len() as u32,
    };

    Ok(GameweekRecord {
        gw,
        entry_name: raw.entry_name,
        player_name: raw.player_name,
        points: narrow("points", raw.points)?,
        bench: narrow("bench", raw.bench)?,
        hits: narrow("hits", raw.hits)?,
        event_transfers: narrow("event_transfers", raw.event_transfers)?,
        chip,
        autosub_count,
        captain_id,
        captain_points: narrow("captain_points", raw.captain_points)?,
        team,
        transfer_in_ids,
        transfer_out_ids,
        transfer_gain: narrow("transfer_gain", raw.transfer_gain)?,
    })
}

/// Integer cells written by pandas may carry a trailing `.0`, and gaps are
/// written as empty cells. Empty counts load as 0 the way a pandas sum
/// skips them.
mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    fn parse(cell: &str) -> Result<Option<i64>, String> {
        let cell = cell.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        if let Ok(v) = cell.parse::<i64>() {
            return Ok(Some(v));
        }
        match cell.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && v.is_finite() => Ok(Some(v as i64)),
            _ => Err(format!("'{cell}' is not an integer")),
        }
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let cell = String::deserialize(d)?;
        parse(&cell).map(|v| v.unwrap_or(0)).map_err(D::Error::custom)
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let cell = String::deserialize(d)?;
        parse(&cell).map_err(D::Error::custom)
    }
}
