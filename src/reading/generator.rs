//! Reading Generator
//!
//! Produces one synthetic reading per call. The generator owns its random
//! number source and never touches shared state; the caller decides what
//! to do with each reading.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use super::error::GeneratorError;
use super::types::{Reading, ValueRange};

/// Most decimal places a generated value may be rounded to
pub const MAX_DECIMALS: u32 = 15;

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Closed interval values are drawn from (Celsius)
    pub range: ValueRange,
    /// Decimal places values are rounded to (`None` keeps full precision)
    pub decimals: Option<u32>,
    /// Fixed seed for reproducible sequences
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            range: ValueRange::default(),
            decimals: Some(1),
            seed: None,
        }
    }
}

/// Draws uniformly distributed readings from a closed range
pub struct ReadingGenerator {
    rng: StdRng,
    range: ValueRange,
    decimals: Option<u32>,
    produced: u64,
}

impl ReadingGenerator {
    /// Create a generator, seeding from the OS unless a seed is configured
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        if !config.range.is_valid() {
            return Err(GeneratorError::InvalidRange {
                min: config.range.min,
                max: config.range.max,
            });
        }

        if let Some(decimals) = config.decimals {
            if decimals > MAX_DECIMALS {
                return Err(GeneratorError::InvalidDecimals {
                    decimals,
                    max: MAX_DECIMALS,
                });
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(OsRng)?,
        };

        Ok(Self {
            rng,
            range: config.range,
            decimals: config.decimals,
            produced: 0,
        })
    }

    /// Produce a new reading timestamped now
    pub fn produce_reading(&mut self) -> Reading {
        self.produced += 1;
        Reading::new(self.next_value())
    }

    /// Number of readings produced so far
    pub fn produced(&self) -> u64 {
        self.produced
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    fn next_value(&mut self) -> f64 {
        let raw = self.rng.gen_range(self.range.min..=self.range.max);
        match self.decimals {
            // Rounding may step past a bound that has more decimals than we keep
            Some(places) => round_to(raw, places).clamp(self.range.min, self.range.max),
            None => raw,
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(range: ValueRange, decimals: Option<u32>) -> ReadingGenerator {
        ReadingGenerator::new(GeneratorConfig {
            range,
            decimals,
            seed: Some(42),
        })
        .unwrap()
    }

    #[test]
    fn test_values_stay_in_range() {
        let range = ValueRange::new(0.0, 5.0);
        let mut generator = seeded(range, None);

        for _ in 0..10_000 {
            let reading = generator.produce_reading();
            assert!(range.contains(reading.value()), "{} out of {}", reading.value(), range);
        }
        assert_eq!(generator.produced(), 10_000);
    }

    #[test]
    fn test_rounded_values_stay_in_range() {
        let range = ValueRange::new(0.05, 0.25);
        let mut generator = seeded(range, Some(1));

        for _ in 0..2_000 {
            let value = generator.produce_reading().value();
            assert!(range.contains(value), "{} out of {}", value, range);
        }
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let mut generator = seeded(ValueRange::new(0.0, 5.0), Some(1));

        for _ in 0..1_000 {
            let value = generator.produce_reading().value();
            let scaled = value * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_values_spread_across_range() {
        let range = ValueRange::new(0.0, 5.0);
        let mut generator = seeded(range, None);

        let values: Vec<f64> = (0..1_000).map(|_| generator.produce_reading().value()).collect();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        assert!(min < 0.5);
        assert!(max > 4.5);
        assert!((mean - 2.5).abs() < 0.3);
    }

    #[test]
    fn test_degenerate_range() {
        let mut generator = seeded(ValueRange::new(3.0, 3.0), Some(1));
        assert_eq!(generator.produce_reading().value(), 3.0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = seeded(ValueRange::default(), Some(1));
        let mut b = seeded(ValueRange::default(), Some(1));

        for _ in 0..50 {
            assert_eq!(a.produce_reading().value(), b.produce_reading().value());
        }
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = ReadingGenerator::new(GeneratorConfig {
            range: ValueRange::new(10.0, 1.0),
            ..Default::default()
        });
        assert!(matches!(result, Err(GeneratorError::InvalidRange { .. })));
    }

    #[test]
    fn test_overflowing_range_rejected() {
        let result = ReadingGenerator::new(GeneratorConfig {
            range: ValueRange::new(-1e308, 1e308),
            ..Default::default()
        });
        assert!(matches!(result, Err(GeneratorError::InvalidRange { .. })));
    }

    #[test]
    fn test_too_many_decimals_rejected() {
        for decimals in [MAX_DECIMALS + 1, 400, u32::MAX] {
            let result = ReadingGenerator::new(GeneratorConfig {
                decimals: Some(decimals),
                ..Default::default()
            });
            assert!(matches!(
                result,
                Err(GeneratorError::InvalidDecimals { max: MAX_DECIMALS, .. })
            ));
        }
    }

    #[test]
    fn test_max_decimals_stays_in_range() {
        let range = ValueRange::new(0.0, 5.0);
        let mut generator = seeded(range, Some(MAX_DECIMALS));

        for _ in 0..1_000 {
            let value = generator.produce_reading().value();
            assert!(range.contains(value), "{} out of {}", value, range);
        }
    }

    #[test]
    fn test_entropy_seeded_generator() {
        let mut generator = ReadingGenerator::new(GeneratorConfig::default()).unwrap();
        let reading = generator.produce_reading();
        assert!(ValueRange::default().contains(reading.value()));
    }
}
