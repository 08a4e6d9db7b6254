//! Awards ceremony document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::info;

use crate::analyzers::types::Award;

/// First month of a new season.
const SEASON_START_MONTH: u32 = 8;

/// Season label such as `2025/2026` for the season running on `date`.
pub fn season_label(date: NaiveDate) -> String {
    let start = if date.month() >= SEASON_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}/{}", start, start + 1)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the awards as a standalone HTML page, one card per award in the
/// order given.
pub fn render_awards_html(awards: &[Award], season: &str, generated_at: DateTime<Utc>) -> String {
    let season = escape(season);
    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>League Awards {season}</title>
<style>
body {{ font-family: Georgia, serif; background: #f7f3e8; color: #333; }}
.cover {{ text-align: center; padding: 48px 0; }}
.award {{ background: #fff; border: 2px solid #c9a227; margin: 24px auto; padding: 24px; max-width: 640px; }}
.award .title {{ font-size: 1.6em; font-weight: bold; text-align: center; }}
.award .label {{ margin-top: 8px; }}
.footer {{ text-align: right; font-size: 0.8em; color: #888; }}
</style>
</head>
<body>
<div class="cover">
<h1>League Awards</h1>
<h2>Season {season}</h2>
</div>
"#
    );

    for award in awards {
        html.push_str(&format!(
            r#"<div class="award">
<div class="title">{}</div>
<div class="label"><strong>Team:</strong> {}</div>
<div class="label"><strong>For:</strong> {}</div>
<div class="label"><strong>Value:</strong> {}</div>
<div class="footer">Season {season}</div>
</div>
"#,
            escape(&award.title),
            escape(&award.team),
            escape(&award.justification),
            escape(&award.value),
        ));
    }

    html.push_str(&format!(
        "<p class=\"footer\">Generated {}</p>\n</body>\n</html>\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html
}

/// Renders the awards and writes them to `path`.
pub fn write_awards_document(path: &Path, awards: &[Award], season: &str) -> Result<()> {
    let html = render_awards_html(awards, season, Utc::now());
    fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), awards = awards.len(), "Saved awards document");
    Ok(())
}
