use crate::analyzers::types::TransferTiming;
use crate::analyzers::utility::by_team;
use crate::record::GameweekRecord;

/// Transfers made and autosub points gained per transfer, per team.
///
/// A team that never transferred divides by one instead of zero.
pub fn analyze_transfer_timing(records: &[GameweekRecord]) -> Vec<TransferTiming> {
    by_team(records)
        .into_iter()
        .map(|(name, rows)| {
            let total_transfers: i32 = rows.iter().map(|r| r.event_transfers).sum();
            let gain: i32 = rows.iter().map(|r| r.transfer_gain).sum();
            TransferTiming {
                entry_name: name.to_string(),
                total_transfers,
                avg_points_per_transfer: gain as f64 / total_transfers.max(1) as f64,
            }
        })
        .collect()
}
