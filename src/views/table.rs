//! Recent readings table

use serde::Serialize;

use crate::reading::TemperatureUnit;
use crate::store::Snapshot;

/// One row of the "Most Recent Readings" table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableRow {
    pub temp: f64,
    pub timestamp: String,
}

/// Rows oldest first, values converted to `unit`
pub fn recent_readings(snapshot: &Snapshot, unit: TemperatureUnit) -> Vec<TableRow> {
    snapshot
        .history
        .iter()
        .map(|reading| TableRow {
            temp: reading.value_in(unit),
            timestamp: reading.formatted_timestamp(),
        })
        .collect()
}

/// Plain-text rendering used by the terminal watcher
pub fn render_table(rows: &[TableRow], unit: TemperatureUnit) -> String {
    let mut out = format!("{:>10}  {}\n", format!("temp ({})", unit.symbol()), "timestamp");
    for row in rows {
        out.push_str(&format!(
            "{:>10}  {}\n",
            super::text::format_value(row.temp),
            row.timestamp
        ));
    }
    out
}
