use tracing::debug;

use crate::analyzers::types::{FormTrend, Forecast};
use crate::analyzers::utility::{by_team, mean, sample_stddev};
use crate::record::{GameweekRecord, SEASON_GAMEWEEKS};

pub const DEFAULT_WEEKS_AHEAD: u32 = 5;

/// Rows that make up a team's recent form.
const FORM_WINDOW: usize = 5;

const RECENT_WEIGHT: f64 = 0.5;
const SEASON_WEIGHT: f64 = 0.3;
const HISTORICAL_WEIGHT: f64 = 0.2;

/// Projects each team's points over the next `weeks_ahead` gameweeks.
///
/// The estimate blends recent form, the season average and the team's own
/// scores in the upcoming gameweek numbers, wrapped onto 1..=38. Confidence
/// falls as weekly scores get more erratic.
pub fn predict_performance(records: &[GameweekRecord], weeks_ahead: u32) -> Vec<Forecast> {
    let current = records.iter().map(|r| r.gw).max().unwrap_or(0);
    let upcoming: Vec<u32> = (current + 1..=current + weeks_ahead)
        .map(|w| (w - 1) % SEASON_GAMEWEEKS + 1)
        .collect();
    debug!(current, ?upcoming, "Forecasting");

    by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let points: Vec<f64> = rows.iter().map(|r| r.points as f64).collect();
            let season = mean(&points);
            let recent = mean(&points[points.len().saturating_sub(FORM_WINDOW)..]);

            let matching: Vec<f64> = rows
                .iter()
                .filter(|r| upcoming.contains(&r.gw))
                .map(|r| r.points as f64)
                .collect();
            let historical = if matching.is_empty() { season } else { mean(&matching) };

            let predicted =
                RECENT_WEIGHT * recent + SEASON_WEIGHT * season + HISTORICAL_WEIGHT * historical;

            Forecast {
                entry_name: name.to_string(),
                predicted_points: predicted,
                predicted_total: predicted * weeks_ahead as f64,
                form_trend: if recent > season {
                    FormTrend::Positive
                } else {
                    FormTrend::Negative
                },
                confidence: confidence(&points, season),
            }
        })
        .collect()
}

fn confidence(points: &[f64], season: f64) -> f64 {
    if season <= 0.0 {
        return 0.0;
    }
    match sample_stddev(points, season) {
        Some(std) => ((1.0 - std / season) * 100.0).clamp(0.0, 100.0),
        None => 0.0,
    }
}
