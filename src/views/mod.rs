//! Dashboard Views
//!
//! Pure functions from a [`Snapshot`] to what the dashboard displays. Each
//! view recomputes from scratch on every store notification.
//!
//! - **text**: current temperature, capture date/time
//! - **table**: most recent readings
//! - **trend**: regression line over the window

pub mod table;
pub mod text;
pub mod trend;

pub use table::{recent_readings, render_table, TableRow};
pub use text::{current_temperature, date_time, DISPLAY_DECIMALS, PLACEHOLDER};
pub use trend::{trend, Trend};

use serde::Serialize;

use crate::reading::TemperatureUnit;
use crate::store::{Snapshot, StoreState};

/// Everything one dashboard page shows, rendered from a single snapshot
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub state: StoreState,
    pub unit: TemperatureUnit,
    pub current_temperature: String,
    pub date_time: String,
    pub readings: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_label: Option<String>,
    pub capacity: usize,
    pub total_recorded: u64,
}

impl DashboardView {
    pub fn render(snapshot: &Snapshot, unit: TemperatureUnit) -> Self {
        let trend = trend(snapshot, unit);
        let trend_label = trend.as_ref().map(Trend::label);

        Self {
            state: snapshot.state(),
            unit,
            current_temperature: current_temperature(snapshot, unit),
            date_time: date_time(snapshot),
            readings: recent_readings(snapshot, unit),
            trend,
            trend_label,
            capacity: snapshot.capacity,
            total_recorded: snapshot.total_recorded,
        }
    }
}
