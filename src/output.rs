//! Output formatting and persistence for season data and derived tables.
//!
//! Supports JSON logging of summaries, writing the season table as CSV
//! (optionally gzipped), and writing analysis tables as JSON files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::record::GameweekRecord;

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes the full season table to `path`, replacing any existing file.
///
/// A `.gz` extension gzips the output.
pub fn write_season_csv(path: &Path, records: &[GameweekRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let encoder = write_rows(encoder, records)?;
        encoder.finish()?;
    } else {
        write_rows(file, records)?;
    }

    info!(path = %path.display(), rows = records.len(), "Wrote season data");
    Ok(())
}

fn write_rows<W: Write>(out: W, records: &[GameweekRecord]) -> Result<W> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for r in records {
        writer.serialize(r)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing season table: {}", e.error()))
}

/// Serializes `value` as pretty JSON to `dir/name` and returns the path.
pub fn write_json(dir: &Path, name: &str, value: &impl Serialize) -> Result<PathBuf> {
    let path = dir.join(name);
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "Wrote JSON");
    Ok(path)
}
