//! Text views: current temperature and capture date/time

use crate::reading::TemperatureUnit;
use crate::store::Snapshot;

/// Shown while no reading has been recorded
pub const PLACEHOLDER: &str = "--";

/// Latest value with its unit suffix, e.g. `"35.6 F"`
pub fn current_temperature(snapshot: &Snapshot, unit: TemperatureUnit) -> String {
    match &snapshot.latest {
        Some(reading) => format!("{} {}", format_value(reading.value_in(unit)), unit.symbol()),
        None => PLACEHOLDER.to_string(),
    }
}

/// Capture time of the latest reading as `"Date: ...\nTime: ..."`
pub fn date_time(snapshot: &Snapshot) -> String {
    match &snapshot.latest {
        Some(reading) => {
            let ts = reading.timestamp();
            format!(
                "Date: {}\nTime: {}",
                ts.format("%Y-%m-%d"),
                ts.format("%H:%M:%S")
            )
        }
        None => format!("Date: {}\nTime: {}", PLACEHOLDER, PLACEHOLDER),
    }
}

/// Decimal places kept when a value is displayed
///
/// Independent of the generator's `decimals`, which rounds the stored
/// Celsius value. Converting to Fahrenheit multiplies by 9/5, so each
/// Celsius decimal needs one more place on display (0.1 C is 0.18 F).
/// Two places show the default one-decimal readings exactly in either
/// unit; readings generated with more decimals are rounded here.
pub const DISPLAY_DECIMALS: i32 = 2;

/// Round for display, trimming float noise from unit conversion (35.599999 -> 35.6)
pub(crate) fn format_value(value: f64) -> String {
    let factor = 10f64.powi(DISPLAY_DECIMALS);
    let rounded = (value * factor).round() / factor;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use crate::store::ReactiveStore;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_placeholders_when_empty() {
        let snapshot = ReactiveStore::new(3).snapshot();
        assert_eq!(current_temperature(&snapshot, TemperatureUnit::Fahrenheit), "--");
        assert_eq!(date_time(&snapshot), "Date: --\nTime: --");
    }

    #[test]
    fn test_current_temperature() {
        let mut store = ReactiveStore::new(3);
        store.record(Reading::new(2.0));
        let snapshot = store.snapshot();

        assert_eq!(current_temperature(&snapshot, TemperatureUnit::Fahrenheit), "35.6 F");
        assert_eq!(current_temperature(&snapshot, TemperatureUnit::Celsius), "2 C");
    }

    #[test]
    fn test_one_decimal_celsius_shows_exactly_in_fahrenheit() {
        let mut store = ReactiveStore::new(3);
        store.record(Reading::new(0.1));
        let snapshot = store.snapshot();

        assert_eq!(current_temperature(&snapshot, TemperatureUnit::Fahrenheit), "32.18 F");
        assert_eq!(current_temperature(&snapshot, TemperatureUnit::Celsius), "0.1 C");
    }

    #[test]
    fn test_extra_generator_decimals_rounded_on_display() {
        let mut store = ReactiveStore::new(3);
        store.record(Reading::new(1.234));

        assert_eq!(
            current_temperature(&store.snapshot(), TemperatureUnit::Celsius),
            "1.23 C"
        );
    }

    #[test]
    fn test_date_time() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        let mut store = ReactiveStore::new(3);
        store.record(Reading::with_timestamp(1.0, ts));

        assert_eq!(date_time(&store.snapshot()), "Date: 2024-03-09\nTime: 14:05:59");
    }
}
